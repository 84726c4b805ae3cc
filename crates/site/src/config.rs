//! Site configuration read from `zyflo.yaml`.
//!
//! ```yaml
//! content_root: contents/docs
//! extension: .mdx
//! base_url: https://zyflo.co
//! docs_prefix: /docs
//! og_image: /og.png
//! toc_mode: textual
//! allow_raw_html: false
//! routes:
//!   - title: Components
//!     path: components
//!     pages:
//!       - { title: Alert, path: /alert }
//! ```
//!
//! Every key is optional. Without `routes` the built-in navigation is used.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zyflo_core::TocMode;

use crate::content::{DEFAULT_CONTENT_ROOT, DEFAULT_EXTENSION};
use crate::routes::RouteTable;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "zyflo.yaml";

mod defaults {
    use std::path::PathBuf;

    pub fn content_root() -> PathBuf {
        PathBuf::from(super::DEFAULT_CONTENT_ROOT)
    }

    pub fn extension() -> String {
        super::DEFAULT_EXTENSION.to_string()
    }

    pub fn base_url() -> String {
        "https://zyflo.co".to_string()
    }

    pub fn docs_prefix() -> String {
        "/docs".to_string()
    }

    pub fn og_image() -> String {
        "/og.png".to_string()
    }
}

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The YAML is malformed or the route table is invalid.
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A value is out of range.
    #[error("invalid config value for '{field}': {message}")]
    Validation {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Everything the docs site needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding the docs sources.
    #[serde(default = "defaults::content_root")]
    pub content_root: PathBuf,
    /// Source file extension, including the dot.
    #[serde(default = "defaults::extension")]
    pub extension: String,
    /// Public origin of the site.
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
    /// URL prefix the docs are mounted under.
    #[serde(default = "defaults::docs_prefix")]
    pub docs_prefix: String,
    /// Open Graph image, absolute or relative to `base_url`.
    #[serde(default = "defaults::og_image")]
    pub og_image: String,
    /// Page outline extractor.
    #[serde(default)]
    pub toc_mode: TocMode,
    /// Emit raw HTML from Markdown sources verbatim.
    #[serde(default)]
    pub allow_raw_html: bool,
    /// Navigation.
    #[serde(default)]
    pub routes: RouteTable,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_root: defaults::content_root(),
            extension: defaults::extension(),
            base_url: defaults::base_url(),
            docs_prefix: defaults::docs_prefix(),
            og_image: defaults::og_image(),
            toc_mode: TocMode::default(),
            allow_raw_html: false,
            routes: RouteTable::default(),
        }
    }
}

impl SiteConfig {
    /// Parses and validates YAML configuration text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file. A relative `content_root` is resolved
    /// against the file's directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&content)?;
        if config.content_root.is_relative() {
            if let Some(dir) = path.parent() {
                config.content_root = dir.join(&config.content_root);
            }
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.extension.starts_with('.') || self.extension.len() < 2 {
            return Err(ConfigError::Validation {
                field: "extension",
                message: format!("'{}' must start with a dot", self.extension),
            });
        }
        if !self.docs_prefix.is_empty() && !self.docs_prefix.starts_with('/') {
            return Err(ConfigError::Validation {
                field: "docs_prefix",
                message: format!("'{}' must be empty or start with '/'", self.docs_prefix),
            });
        }
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "base_url",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Public URL of a docs page.
    pub fn page_url(&self, canonical_path: &str) -> String {
        format!(
            "{}{}/{canonical_path}",
            self.base_url.trim_end_matches('/'),
            self.docs_prefix.trim_end_matches('/')
        )
    }

    /// Absolute Open Graph image URL.
    pub fn og_image_url(&self) -> String {
        if self.og_image.starts_with("http://") || self.og_image.starts_with("https://") {
            return self.og_image.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.og_image.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SiteConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.content_root, PathBuf::from("contents/docs"));
        assert_eq!(config.routes.pages().len(), 6);
    }

    #[test]
    fn urls() {
        let config = SiteConfig::default();
        assert_eq!(
            config.page_url("components/alert"),
            "https://zyflo.co/docs/components/alert"
        );
        assert_eq!(config.og_image_url(), "https://zyflo.co/og.png");

        let config = SiteConfig {
            base_url: "https://example.com/".into(),
            docs_prefix: String::new(),
            og_image: "https://cdn.example.com/card.png".into(),
            ..SiteConfig::default()
        };
        assert_eq!(config.page_url("a/b"), "https://example.com/a/b");
        assert_eq!(config.og_image_url(), "https://cdn.example.com/card.png");
    }

    #[test]
    fn overrides_and_routes() {
        let config = SiteConfig::from_yaml_str(
            r#"
content_root: docs
extension: .md
toc_mode: structural
routes:
  - title: Guides
    path: guides
    pages:
      - { title: Theming, path: /theming }
"#,
        )
        .unwrap();
        assert_eq!(config.extension, ".md");
        assert_eq!(config.toc_mode, TocMode::Structural);
        assert_eq!(config.routes.pages()[0].canonical_path, "guides/theming");
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            SiteConfig::from_yaml_str("colour: red"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            SiteConfig::from_yaml_str("extension: mdx"),
            Err(ConfigError::Validation { field: "extension", .. })
        ));
        assert!(matches!(
            SiteConfig::from_yaml_str("docs_prefix: docs"),
            Err(ConfigError::Validation { field: "docs_prefix", .. })
        ));
    }

    #[test]
    fn missing_file() {
        let err = SiteConfig::from_path(Path::new("/nonexistent/zyflo.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
