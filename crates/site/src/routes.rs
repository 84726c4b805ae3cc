//! The docs navigation: sections of pages, in sidebar order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zyflo_core::slug::SEPARATOR;

/// One page inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutePage {
    /// Sidebar label.
    pub title: String,
    /// Segment appended to the section path. Begins with `/`.
    pub path: String,
    /// Short summary shown in search results.
    #[serde(default)]
    pub description: String,
}

/// A sidebar section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSection {
    /// Section heading.
    pub title: String,
    /// First canonical path segment, e.g. `getting-started`.
    pub path: String,
    /// Optional icon name for the sidebar.
    #[serde(default)]
    pub icon: Option<String>,
    /// Short summary of the section.
    #[serde(default)]
    pub description: String,
    /// Pages in display order.
    #[serde(default)]
    pub pages: Vec<RoutePage>,
}

/// A routed page with its full canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatPageEntry {
    /// Page title.
    pub title: String,
    /// Section path + page path, e.g. `components/navbar`.
    pub canonical_path: String,
    /// Page description from the route table.
    pub description: String,
    /// Title of the owning section.
    pub section: String,
}

/// Rejections raised while building a [`RouteTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// Section path is empty or contains a separator.
    #[error("section '{title}' has an invalid path '{path}'")]
    InvalidSectionPath {
        /// Section title.
        title: String,
        /// Offending path.
        path: String,
    },
    /// Two sections share a path.
    #[error("section path '{0}' is declared more than once")]
    DuplicateSection(String),
    /// Page path does not begin with `/` or has nothing after it.
    #[error("page '{title}' has an invalid path '{path}' (expected '/segment')")]
    InvalidPagePath {
        /// Page title.
        title: String,
        /// Offending path.
        path: String,
    },
    /// Two pages resolve to the same canonical path.
    #[error("canonical path '{0}' is routed more than once")]
    DuplicatePage(String),
}

/// Flattens sections into one list in section-then-page declaration order.
pub fn flatten(sections: &[RouteSection]) -> Vec<FlatPageEntry> {
    sections
        .iter()
        .flat_map(|section| {
            section.pages.iter().map(move |page| FlatPageEntry {
                title: page.title.clone(),
                canonical_path: format!("{}{}", section.path, page.path),
                description: page.description.clone(),
                section: section.title.clone(),
            })
        })
        .collect()
}

/// Validated, immutable route table with its flattened page list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<RouteSection>")]
pub struct RouteTable {
    sections: Vec<RouteSection>,
    pages: Vec<FlatPageEntry>,
}

impl RouteTable {
    /// Validates `sections` and derives the flat page list.
    pub fn new(sections: Vec<RouteSection>) -> Result<Self, RouteError> {
        let mut section_paths = HashSet::new();
        for section in &sections {
            if section.path.is_empty() || section.path.contains(SEPARATOR) {
                return Err(RouteError::InvalidSectionPath {
                    title: section.title.clone(),
                    path: section.path.clone(),
                });
            }
            if !section_paths.insert(section.path.as_str()) {
                return Err(RouteError::DuplicateSection(section.path.clone()));
            }
            for page in &section.pages {
                if page.path.len() < 2 || !page.path.starts_with(SEPARATOR) {
                    return Err(RouteError::InvalidPagePath {
                        title: page.title.clone(),
                        path: page.path.clone(),
                    });
                }
            }
        }

        let pages = flatten(&sections);
        let mut seen = HashSet::new();
        if let Some(dup) = pages.iter().find(|page| !seen.insert(page.canonical_path.as_str())) {
            return Err(RouteError::DuplicatePage(dup.canonical_path.clone()));
        }

        Ok(Self { sections, pages })
    }

    /// Parses a YAML list of sections.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Sections in declaration order.
    pub fn sections(&self) -> &[RouteSection] {
        &self.sections
    }

    /// Every routed page in navigation order.
    pub fn pages(&self) -> &[FlatPageEntry] {
        &self.pages
    }

    /// Looks up a routed page.
    pub fn page(&self, canonical_path: &str) -> Option<&FlatPageEntry> {
        self.pages
            .iter()
            .find(|page| page.canonical_path == canonical_path)
    }

    /// Looks up a section by its path segment.
    pub fn section(&self, path: &str) -> Option<&RouteSection> {
        self.sections.iter().find(|section| section.path == path)
    }

    /// The navigation shipped with the Zyflo site.
    pub fn zyflo() -> Self {
        fn page(title: &str, path: &str, description: &str) -> RoutePage {
            RoutePage {
                title: title.into(),
                path: path.into(),
                description: description.into(),
            }
        }

        let sections = vec![
            RouteSection {
                title: "Getting Started".into(),
                path: "getting-started".into(),
                icon: Some("rocket".into()),
                description: "Set up Zyflo in a project.".into(),
                pages: vec![
                    page("Introduction", "/introduction", "What Zyflo is and how it works."),
                    page("Installation", "/installation", "Add Zyflo to a Tailwind project."),
                    page(
                        "CLI",
                        "/command-line-interface",
                        "Scaffold components from the terminal.",
                    ),
                ],
            },
            RouteSection {
                title: "Components".into(),
                path: "components".into(),
                icon: Some("blocks".into()),
                description: "Ready-made UI building blocks.".into(),
                pages: vec![
                    page("Navbar", "/navbar", "Responsive top navigation bar."),
                    page("Drawer", "/drawer", "Slide-in side panel."),
                    page("Alert", "/alert", "Inline status messages."),
                ],
            },
        ];

        let pages = flatten(&sections);
        Self { sections, pages }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::zyflo()
    }
}

impl TryFrom<Vec<RouteSection>> for RouteTable {
    type Error = RouteError;

    fn try_from(sections: Vec<RouteSection>) -> Result<Self, Self::Error> {
        Self::new(sections)
    }
}

impl Serialize for RouteTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sections.serialize(serializer)
    }
}
