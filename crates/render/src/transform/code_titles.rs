use super::TreeTransform;
use crate::tree::{Body, Element, HtmlNode};

/// Class of the inserted title bar.
pub const TITLE_CLASS: &str = "rehype-code-title";

/// Turns ```` ```tsx:navbar.tsx ```` into a `language-tsx` block preceded by a
/// `div.rehype-code-title` holding `navbar.tsx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeTitles;

impl TreeTransform for CodeTitles {
    fn name(&self) -> &str {
        "code-titles"
    }

    fn transform(&self, body: &mut Body) {
        body.visit_child_lists_mut(&mut |nodes| {
            let mut i = 0;
            while i < nodes.len() {
                if let Some(title) = split_title(&mut nodes[i]) {
                    let bar = Element::new("div")
                        .with_property("class", TITLE_CLASS)
                        .with_children(vec![HtmlNode::text(title)]);
                    nodes.insert(i, bar.into());
                    i += 1;
                }
                i += 1;
            }
        });
    }
}

/// Strips `:title` from the language class of a `pre > code` node and returns it.
fn split_title(node: &mut HtmlNode) -> Option<String> {
    let pre = node.as_element_mut_with_tag("pre")?;
    let code = pre.children.first_mut()?.as_element_mut_with_tag("code")?;
    let class = code.property("class")?;

    let mut title = None;
    let classes: Vec<String> = class
        .split_whitespace()
        .map(|name| match name.strip_prefix("language-").and_then(|l| l.split_once(':')) {
            Some((lang, found)) if title.is_none() && !found.is_empty() => {
                title = Some(found.to_string());
                format!("language-{lang}")
            }
            _ => name.to_string(),
        })
        .collect();

    let title = title?;
    code.set_property("class", classes.join(" "));
    Some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(class: &str) -> HtmlNode {
        let code = Element::new("code")
            .with_property("class", class)
            .with_children(vec![HtmlNode::text("x")]);
        Element::new("pre").with_children(vec![code.into()]).into()
    }

    #[test]
    fn inserts_title_before_block() {
        let mut body = Body::new(vec![block("language-tsx:components/navbar.tsx")]);
        CodeTitles.transform(&mut body);
        assert_eq!(
            body.to_html(),
            r#"<div class="rehype-code-title">components/navbar.tsx</div><pre><code class="language-tsx">x</code></pre>"#
        );
    }

    #[test]
    fn nested_blocks_and_plain_languages() {
        let tab = Element::new("TabsContent")
            .with_children(vec![block("language-bash:install"), block("language-js")]);
        let mut body = Body::new(vec![tab.into()]);
        CodeTitles.transform(&mut body);
        assert_eq!(
            body.to_html(),
            r#"<TabsContent><div class="rehype-code-title">install</div><pre><code class="language-bash">x</code></pre><pre><code class="language-js">x</code></pre></TabsContent>"#
        );
    }
}
