//! Maps canonical paths to documents on disk and compiles them.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zyflo_core::slug::SEPARATOR;
use zyflo_render::{CompileError, CompiledDocument, DocumentCompiler};

/// Default directory holding the docs sources.
pub const DEFAULT_CONTENT_ROOT: &str = "contents/docs";
/// Default source file extension.
pub const DEFAULT_EXTENSION: &str = ".mdx";

/// Why a page could not be produced.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No readable document exists for the path.
    #[error("no document for '{path}'")]
    NotFound {
        /// Canonical path that was requested.
        path: String,
    },
    /// The document exists but the compiler rejected it.
    #[error("failed to compile '{path}': {source}")]
    Compile {
        /// Canonical path of the document.
        path: String,
        /// Compiler failure.
        source: CompileError,
    },
}

impl LoadError {
    /// Whether the page should render as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }

    /// Canonical path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            LoadError::NotFound { path } | LoadError::Compile { path, .. } => path,
        }
    }
}

/// Docs sources under one root directory.
#[derive(Debug)]
pub struct ContentStore {
    root: PathBuf,
    extension: String,
    compiler: DocumentCompiler,
}

impl ContentStore {
    /// Store using the docs compiler.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self::with_compiler(root, extension, DocumentCompiler::new())
    }

    /// Store using a custom compiler.
    pub fn with_compiler(
        root: impl Into<PathBuf>,
        extension: impl Into<String>,
        compiler: DocumentCompiler,
    ) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            compiler,
        }
    }

    /// Content root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The compiler documents are handed to.
    pub fn compiler(&self) -> &DocumentCompiler {
        &self.compiler
    }

    /// File backing `canonical_path`, or `None` when the path would leave the root.
    pub fn path_for(&self, canonical_path: &str) -> Option<PathBuf> {
        if !is_contained(canonical_path) {
            return None;
        }
        Some(
            self.root
                .join(format!("{canonical_path}{}", self.extension)),
        )
    }

    /// Reads the raw source of a document.
    pub fn read_raw(&self, canonical_path: &str) -> Result<String, LoadError> {
        let not_found = || LoadError::NotFound {
            path: canonical_path.to_string(),
        };
        let Some(file) = self.path_for(canonical_path) else {
            log::debug!("rejecting canonical path '{canonical_path}'");
            return Err(not_found());
        };
        fs::read_to_string(&file).map_err(|err| {
            log::debug!("cannot read {}: {err}", file.display());
            not_found()
        })
    }

    /// Compiles already-read source for `canonical_path`.
    pub fn compile(&self, canonical_path: &str, raw: &str) -> Result<CompiledDocument, LoadError> {
        match self.compiler.compile(raw) {
            Ok(document) => {
                log::debug!("compiled '{canonical_path}'");
                Ok(document)
            }
            Err(source) => {
                log::warn!("failed to compile '{canonical_path}': {source}");
                Err(LoadError::Compile {
                    path: canonical_path.to_string(),
                    source,
                })
            }
        }
    }

    /// Reads and compiles the document at `canonical_path`.
    pub fn load(&self, canonical_path: &str) -> Result<CompiledDocument, LoadError> {
        let raw = self.read_raw(canonical_path)?;
        self.compile(canonical_path, &raw)
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_ROOT, DEFAULT_EXTENSION)
    }
}

/// Rejects `..`, `.`, empty inner segments, absolute paths and backslashes.
fn is_contained(canonical_path: &str) -> bool {
    if canonical_path.is_empty() {
        return true;
    }
    if canonical_path.contains(['\\', '\0', ':']) {
        return false;
    }
    canonical_path
        .split(SEPARATOR)
        .all(|segment| !matches!(segment, "" | "." | ".."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment() {
        assert!(is_contained(""));
        assert!(is_contained("components/alert"));
        assert!(is_contained("getting-started/command-line-interface"));
        assert!(!is_contained("../secrets"));
        assert!(!is_contained("components/../../etc/passwd"));
        assert!(!is_contained("/etc/passwd"));
        assert!(!is_contained("components//alert"));
        assert!(!is_contained("components\\alert"));
        assert!(!is_contained("C:/docs"));
    }

    #[test]
    fn path_for_joins_root_and_extension() {
        let store = ContentStore::new("contents/docs", ".mdx");
        assert_eq!(
            store.path_for("components/alert"),
            Some(PathBuf::from("contents/docs/components/alert.mdx"))
        );
        assert_eq!(store.path_for("../x"), None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let store = ContentStore::new("/nonexistent-zyflo-root", ".mdx");
        let err = store.load("nonexistent/path").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.path(), "nonexistent/path");
    }
}
