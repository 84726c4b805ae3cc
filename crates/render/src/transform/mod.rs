//! Tree transforms run by the compiler after conversion.
//!
//! - `raw_code`: captures code text before highlighting and exposes it afterwards.
//! - `code_titles`: `lang:title` fences get a title bar.
//! - `headings`: slug ids and self-links on headings.
//! - `highlight`: per-line spans with highlighted ranges and line numbers.

/// Code block title bars.
pub mod code_titles;
/// Heading ids and autolinks.
pub mod headings;
/// Line-level code highlighting.
pub mod highlight;
/// Raw code capture for copy buttons.
pub mod raw_code;

use crate::tree::Body;

pub use code_titles::CodeTitles;
pub use headings::{AutolinkHeadings, HeadingIds};
pub use highlight::LineHighlighter;
pub use raw_code::{CaptureRawCode, ExposeRawCode};

/// A visit-and-mutate pass over the compiled body.
pub trait TreeTransform: Send + Sync {
    /// Name used to position other transforms relative to this one.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Mutate the body in place.
    fn transform(&self, body: &mut Body);
}

impl<F> TreeTransform for F
where
    F: Fn(&mut Body) + Send + Sync,
{
    fn transform(&self, body: &mut Body) {
        (self)(body)
    }
}

/// Ordered list of transforms.
#[derive(Default)]
pub struct TransformChain {
    transforms: Vec<Box<dyn TreeTransform>>,
}

impl TransformChain {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// The docs chain. `CaptureRawCode` runs first so it sees code before
    /// `LineHighlighter` splits it into spans; `ExposeRawCode` runs after
    /// the capture and before highlighting.
    pub fn docs(heading_autolinks: bool) -> Self {
        let mut chain = Self::new();
        chain.push(CaptureRawCode);
        chain.push(CodeTitles);
        chain.push(HeadingIds);
        if heading_autolinks {
            chain.push(AutolinkHeadings);
        }
        chain.push(ExposeRawCode);
        chain.push(LineHighlighter);
        chain
    }

    /// Appends a transform.
    pub fn push<T: TreeTransform + 'static>(&mut self, transform: T) {
        self.transforms.push(Box::new(transform));
    }

    /// Inserts a transform right before the first one named `anchor`, or at
    /// the end when no transform has that name.
    pub fn insert_before<T: TreeTransform + 'static>(&mut self, anchor: &str, transform: T) {
        let index = self
            .transforms
            .iter()
            .position(|existing| existing.name() == anchor)
            .unwrap_or(self.transforms.len());
        self.transforms.insert(index, Box::new(transform));
    }

    /// Names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Runs every transform in order.
    pub fn apply(&self, body: &mut Body) {
        for transform in &self.transforms {
            transform.transform(body);
        }
    }
}

impl std::fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Element, HtmlNode};

    #[test]
    fn docs_chain_order() {
        assert_eq!(
            TransformChain::docs(true).names(),
            [
                "capture-raw-code",
                "code-titles",
                "heading-ids",
                "autolink-headings",
                "expose-raw-code",
                "line-highlighter",
            ]
        );
        assert!(!TransformChain::docs(false).names().contains(&"autolink-headings"));
    }

    #[test]
    fn insert_before_anchor_or_append() {
        let mut chain = TransformChain::docs(false);
        chain.insert_before("line-highlighter", |body: &mut Body| body.children.clear());
        chain.insert_before("missing", |_: &mut Body| {});
        let names = chain.names();
        assert_eq!(names[names.len() - 3], "anonymous");
        assert_eq!(names[names.len() - 2], "line-highlighter");
        assert_eq!(names[names.len() - 1], "anonymous");
    }

    #[test]
    fn closures_run_in_order() {
        let mut chain = TransformChain::new();
        chain.push(|body: &mut Body| body.children.push(Element::new("a").into()));
        chain.push(|body: &mut Body| body.children.push(HtmlNode::text("b")));
        let mut body = Body::default();
        chain.apply(&mut body);
        assert_eq!(body.to_html(), "<a></a>b");
    }
}
