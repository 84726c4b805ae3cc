#![deny(missing_docs)]
//! Zyflo docs core: frontmatter, markdown parsing, slugs, and table-of-contents extraction.

/// Error and source location types.
pub mod error;
/// YAML frontmatter extraction.
pub mod frontmatter;
/// markdown-rs parsing adapter.
pub mod parse;
/// Canonical paths and heading slugs.
pub mod slug;
/// Table-of-contents extraction.
pub mod toc;

pub use error::{MarkdownError, SourceLocation};
pub use frontmatter::{
    Frontmatter, FrontmatterError, FrontmatterExtraction, REQUIRED_KEYS, extract_frontmatter,
};
pub use parse::{ParseOptions, parse_mdast};
pub use slug::{Slugger, anchor_slug, resolve_path, split_path};
pub use toc::{
    HeadingRecord, TocMode, extract_headings, extract_headings_from_mdast,
    extract_headings_structural, inner_text,
};
