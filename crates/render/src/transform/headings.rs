use super::TreeTransform;
use crate::tree::{Body, Element, HtmlNode};
use zyflo_core::Slugger;

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

fn is_heading(element: &Element) -> bool {
    HEADING_TAGS.contains(&element.tag.as_str())
}

/// Gives every heading without an `id` a unique slug of its text.
///
/// Ids already present in the document are reserved first so generated
/// slugs never collide with them.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingIds;

impl TreeTransform for HeadingIds {
    fn name(&self) -> &str {
        "heading-ids"
    }

    fn transform(&self, body: &mut Body) {
        let mut slugger = Slugger::new();
        body.visit_elements_mut(&mut |element| {
            if let Some(id) = element.property("id") {
                slugger.reserve(id);
            }
        });

        body.visit_elements_mut(&mut |element| {
            if !is_heading(element) || element.property("id").is_some() {
                return;
            }
            let id = slugger.slug(&element.text_content());
            element.set_property("id", id);
        });
    }
}

/// Prepends a self-link to every heading that has an `id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutolinkHeadings;

impl TreeTransform for AutolinkHeadings {
    fn name(&self) -> &str {
        "autolink-headings"
    }

    fn transform(&self, body: &mut Body) {
        body.visit_elements_mut(&mut |element| {
            if !is_heading(element) {
                return;
            }
            let Some(id) = element.property("id") else {
                return;
            };
            let link = Element::new("a")
                .with_property("aria-hidden", "true")
                .with_property("tabindex", "-1")
                .with_property("href", format!("#{id}"))
                .with_children(vec![
                    Element::new("span")
                        .with_property("class", "icon icon-link")
                        .into(),
                ]);
            element.children.insert(0, HtmlNode::from(link));
        });
    }
}
