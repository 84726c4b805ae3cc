//! Frontmatter + MDX body to a transformed element tree.

use serde::Serialize;
use thiserror::Error;
use zyflo_core::{
    Frontmatter, FrontmatterError, MarkdownError, ParseOptions, REQUIRED_KEYS, extract_frontmatter,
    parse_mdast,
};

use crate::convert::{ConvertOptions, mdast_to_body};
use crate::transform::{TransformChain, TreeTransform};
use crate::tree::Body;

/// Compiler switches.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Constructs accepted by the parser. Frontmatter is always stripped
    /// before parsing, so `parse.frontmatter` is ignored.
    pub parse: ParseOptions,
    /// Emit raw HTML verbatim.
    pub allow_raw_html: bool,
    /// Prepend self-links to headings.
    pub heading_autolinks: bool,
    /// Fail when `title` or `description` is missing.
    pub require_frontmatter: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::mdx(),
            allow_raw_html: false,
            heading_autolinks: true,
            require_frontmatter: true,
        }
    }
}

/// A compiled docs page.
#[derive(Debug, Clone, Serialize)]
pub struct CompiledDocument {
    /// Frontmatter values as strings.
    pub frontmatter: Frontmatter,
    /// Renderable body.
    pub body: Body,
}

impl CompiledDocument {
    /// Page title from the frontmatter.
    pub fn title(&self) -> &str {
        self.frontmatter.title()
    }

    /// Page description from the frontmatter.
    pub fn description(&self) -> &str {
        self.frontmatter.description()
    }

    /// Serializes the body to HTML.
    pub fn to_html(&self) -> String {
        self.body.to_html()
    }
}

/// Reasons a document cannot be compiled.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The frontmatter block is malformed.
    #[error(transparent)]
    Frontmatter(FrontmatterError),
    /// `title` or `description` is absent or blank.
    #[error("frontmatter is missing required key '{key}'")]
    MissingFrontmatter {
        /// The missing key.
        key: String,
    },
    /// The body is not valid MDX.
    #[error(transparent)]
    Parse(#[from] MarkdownError),
}

impl From<FrontmatterError> for CompileError {
    fn from(err: FrontmatterError) -> Self {
        match err {
            FrontmatterError::MissingKey(key) => CompileError::MissingFrontmatter { key },
            other => CompileError::Frontmatter(other),
        }
    }
}

/// Parses, converts and transforms docs pages.
///
/// ```
/// use zyflo_render::DocumentCompiler;
///
/// let doc = DocumentCompiler::new()
///     .compile("---\ntitle: Alert\ndescription: Callouts\n---\n## Usage\n")
///     .unwrap();
/// assert_eq!(doc.title(), "Alert");
/// assert!(doc.to_html().contains(r#"<h2 id="usage">"#));
/// ```
#[derive(Debug)]
pub struct DocumentCompiler {
    options: CompileOptions,
    transforms: TransformChain,
}

impl Default for DocumentCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCompiler {
    /// Compiler with default options and the docs transform chain.
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    /// Compiler with the docs transform chain configured by `options`.
    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            options,
            transforms: TransformChain::docs(options.heading_autolinks),
        }
    }

    /// Compiler that runs no transforms.
    pub fn bare(options: CompileOptions) -> Self {
        Self {
            options,
            transforms: TransformChain::new(),
        }
    }

    /// Appends a transform after the existing ones.
    pub fn with_transform<T: TreeTransform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Inserts a transform before the line highlighter.
    pub fn before_highlight<T: TreeTransform + 'static>(mut self, transform: T) -> Self {
        self.transforms.insert_before("line-highlighter", transform);
        self
    }

    /// Active options.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Transform names in execution order.
    pub fn transform_names(&self) -> Vec<&str> {
        self.transforms.names()
    }

    /// Compiles one document.
    pub fn compile(&self, source: &str) -> Result<CompiledDocument, CompileError> {
        let extraction = extract_frontmatter(source)?;
        if self.options.require_frontmatter {
            extraction.frontmatter.require(&REQUIRED_KEYS)?;
        }

        let body_text = &source[extraction.body_start..];
        let parse = ParseOptions {
            frontmatter: false,
            ..self.options.parse
        };
        let root = parse_mdast(body_text, parse)
            .map_err(|err| shift_lines(err, line_count(&source[..extraction.body_start])))?;

        let mut body = mdast_to_body(
            &root,
            ConvertOptions {
                allow_raw_html: self.options.allow_raw_html,
            },
        );
        self.transforms.apply(&mut body);

        Ok(CompiledDocument {
            frontmatter: extraction.frontmatter,
            body,
        })
    }
}

fn line_count(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// Maps a body-relative error location back onto the whole document.
fn shift_lines(err: MarkdownError, offset: usize) -> MarkdownError {
    match err {
        MarkdownError::Parse {
            message,
            mut location,
        } => {
            location.line += offset;
            MarkdownError::Parse { message, location }
        }
        other => other,
    }
}
