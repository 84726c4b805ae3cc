use super::TreeTransform;
use crate::tree::{Body, HtmlNode};

/// Property the copy button reads on `pre` elements.
pub const RAW_PROPERTY: &str = "raw";

/// Stores the literal text of every `pre > code` block on the `pre` node.
///
/// Blocks whose first child is not a `code` element are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureRawCode;

impl TreeTransform for CaptureRawCode {
    fn name(&self) -> &str {
        "capture-raw-code"
    }

    fn transform(&self, body: &mut Body) {
        body.visit_tag_mut("pre", &mut |pre| {
            let Some(HtmlNode::Element(code)) = pre.children.first() else {
                return;
            };
            if code.tag != "code" {
                return;
            }
            pre.raw = Some(code.text_content());
        });
    }
}

/// Copies text captured by [`CaptureRawCode`] into the rendered `raw` property.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExposeRawCode;

impl TreeTransform for ExposeRawCode {
    fn name(&self) -> &str {
        "expose-raw-code"
    }

    fn transform(&self, body: &mut Body) {
        body.visit_tag_mut("pre", &mut |pre| {
            if let Some(raw) = pre.raw.clone() {
                pre.set_property(RAW_PROPERTY, raw);
            }
        });
    }
}
