use thiserror::Error;

use crate::frontmatter::FrontmatterError;

/// Position inside a content document, used in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path (canonical path or on-disk path).
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Attach a file name to this location.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// Errors raised while turning document text into a syntax tree.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// markdown-rs rejected the document (usually malformed MDX).
    #[error("parse error at {location}: {message}")]
    Parse {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// The frontmatter block could not be read.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

impl MarkdownError {
    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }

    /// Location of the failure, when the parser reported one.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse { location, .. } => Some(location),
            Self::Frontmatter(_) => None,
        }
    }
}
