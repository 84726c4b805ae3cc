//! Thin adapter over markdown-rs.

use crate::{MarkdownError, SourceLocation};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Which constructs the parser accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// MDX constructs (JSX, ESM, expressions).
    pub mdx: bool,
    /// GitHub Flavored Markdown (tables, task lists, footnotes, strikethrough, autolinks).
    pub gfm: bool,
    /// Keep a YAML frontmatter node in the tree.
    pub frontmatter: bool,
    /// Indented code blocks. Off for MDX because component children are indented.
    pub code_indented: bool,
    /// Raw HTML nodes. Mutually exclusive with MDX JSX in markdown-rs.
    pub raw_html: bool,
}

impl ParseOptions {
    /// Plain Markdown with GFM.
    pub const fn markdown() -> Self {
        Self {
            mdx: false,
            gfm: true,
            frontmatter: true,
            code_indented: true,
            raw_html: true,
        }
    }

    /// MDX with GFM. This is what docs pages are written in.
    pub const fn mdx() -> Self {
        Self {
            mdx: true,
            gfm: true,
            frontmatter: true,
            code_indented: false,
            raw_html: false,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: self.frontmatter,
            code_indented: self.code_indented,
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.mdx {
            constructs.mdx_esm = true;
            constructs.mdx_expression_flow = true;
            constructs.mdx_expression_text = true;
            constructs.mdx_jsx_flow = true;
            constructs.mdx_jsx_text = true;
        }

        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::mdx()
    }
}

/// Parse document text into an mdast tree.
pub fn parse_mdast(input: &str, options: ParseOptions) -> Result<Node, MarkdownError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| MarkdownError::Parse {
        message: err.reason.clone(),
        location: message_location(&err),
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match message.place.as_deref() {
        Some(Place::Point(point)) => SourceLocation::new(point.line, point.column),
        Some(Place::Position(position)) => {
            SourceLocation::new(position.start.line, position.start.column)
        }
        None => SourceLocation::new(1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mdx_components() {
        let root = parse_mdast("<Note>Hi</Note>\n", ParseOptions::mdx()).unwrap();
        let Node::Root(root) = root else {
            panic!("expected root");
        };
        assert!(matches!(root.children[0], Node::MdxJsxFlowElement(_)));
    }

    #[test]
    fn unclosed_jsx_reports_location() {
        let err = parse_mdast("## Title\n\n<Tabs>\n", ParseOptions::mdx()).unwrap_err();
        assert!(err.location().is_some(), "{err}");
    }

    #[test]
    fn markdown_mode_keeps_html() {
        let root = parse_mdast("<div>raw</div>\n", ParseOptions::markdown()).unwrap();
        let Node::Root(root) = root else {
            panic!("expected root");
        };
        assert!(matches!(root.children[0], Node::Html(_)));
    }
}
