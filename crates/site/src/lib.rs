#![deny(missing_docs)]
//! Zyflo site: navigation, content loading, pagination, and the static build.

/// Site configuration.
pub mod config;
/// Content store and load errors.
pub mod content;
/// Per-request memoization.
pub mod memo;
/// Previous/next resolution.
pub mod pagination;
/// Route table and flattening.
pub mod routes;
/// The site facade.
pub mod site;

pub use config::{ConfigError, DEFAULT_CONFIG_FILE, SiteConfig};
pub use content::{ContentStore, LoadError};
pub use memo::PageMemo;
pub use pagination::{Adjacent, adjacent};
pub use routes::{FlatPageEntry, RouteError, RoutePage, RouteSection, RouteTable, flatten};
pub use site::{
    BuildOptions, BuildReport, BuildStats, BuiltPage, Breadcrumb, DocPage, DocsSite, OgImage,
    OpenGraph, PageCache, PageMetadata,
};
