#![deny(missing_docs)]
//! Zyflo render: compiles MDX docs pages into an HTML element tree.

/// Frontmatter + body compilation.
pub mod compiler;
/// mdast to element tree conversion.
pub mod convert;
/// Ordered tree transforms.
pub mod transform;
/// The element tree and its HTML serializer.
pub mod tree;

pub use compiler::{CompileError, CompileOptions, CompiledDocument, DocumentCompiler};
pub use convert::{ConvertOptions, mdast_to_body};
pub use transform::{
    AutolinkHeadings, CaptureRawCode, CodeTitles, ExposeRawCode, HeadingIds, LineHighlighter,
    TransformChain, TreeTransform,
};
pub use tree::{Body, Element, HtmlNode};
