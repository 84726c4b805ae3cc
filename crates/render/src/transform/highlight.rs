use super::TreeTransform;
use crate::tree::{Body, Element, HtmlNode};

/// Property the converter stores the fence meta string in.
pub const META_PROPERTY: &str = "data-meta";

/// Splits code blocks into one `span.code-line` per line.
///
/// The fence meta string drives two options: `{1,3-5}` marks lines with
/// `highlight-line`, and `showLineNumbers` (optionally `showLineNumbers=10`)
/// adds `line-number` and a `line` property. Blocks whose `code` already
/// has element children are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineHighlighter;

impl TreeTransform for LineHighlighter {
    fn name(&self) -> &str {
        "line-highlighter"
    }

    fn transform(&self, body: &mut Body) {
        body.visit_tag_mut("pre", &mut |pre| {
            let Some(code) = pre
                .children
                .first_mut()
                .and_then(|node| node.as_element_mut_with_tag("code"))
            else {
                return;
            };
            if code
                .children
                .iter()
                .any(|child| matches!(child, HtmlNode::Element(_)))
            {
                return;
            }

            let language = code
                .class_names()
                .find(|name| name.starts_with("language-"))
                .map(str::to_string);
            let meta = LineOptions::parse(code.property(META_PROPERTY).unwrap_or_default());
            code.children = split_lines(&code.text_content(), &meta);
            code.add_class("code-highlight");

            if let Some(language) = language {
                pre.add_class(&language);
            }
        });
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct LineOptions {
    highlighted: Vec<(usize, usize)>,
    numbers_from: Option<usize>,
}

impl LineOptions {
    fn parse(meta: &str) -> Self {
        let mut options = LineOptions::default();
        for token in meta.split_whitespace() {
            if let Some(ranges) = token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
                options.highlighted.extend(ranges.split(',').filter_map(parse_range));
            } else if token == "showLineNumbers" {
                options.numbers_from = Some(1);
            } else if let Some(start) = token.strip_prefix("showLineNumbers=") {
                options.numbers_from = Some(start.parse().unwrap_or(1));
            }
        }
        options
    }

    fn is_highlighted(&self, line: usize) -> bool {
        self.highlighted
            .iter()
            .any(|&(start, end)| (start..=end).contains(&line))
    }
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    let range = range.trim();
    match range.split_once('-') {
        Some((start, end)) => Some((start.trim().parse().ok()?, end.trim().parse().ok()?)),
        None => {
            let line = range.parse().ok()?;
            Some((line, line))
        }
    }
}

fn split_lines(text: &str, options: &LineOptions) -> Vec<HtmlNode> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let mut nodes = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            nodes.push(HtmlNode::text("\n"));
        }
        let mut span = Element::new("span").with_property("class", "code-line");
        if options.is_highlighted(index + 1) {
            span.add_class("highlight-line");
        }
        if let Some(first) = options.numbers_from {
            span.add_class("line-number");
            span.set_property("line", first.saturating_add(index).to_string());
        }
        if !line.is_empty() {
            span.children.push(HtmlNode::text(line));
        }
        nodes.push(span.into());
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(meta: Option<&str>, text: &str) -> Body {
        let mut code = Element::new("code")
            .with_property("class", "language-tsx")
            .with_children(vec![HtmlNode::text(text)]);
        if let Some(meta) = meta {
            code.set_property(META_PROPERTY, meta);
        }
        Body::new(vec![Element::new("pre").with_children(vec![code.into()]).into()])
    }

    #[test]
    fn parses_meta() {
        assert_eq!(
            LineOptions::parse("{1,3-4} showLineNumbers=5 title=x"),
            LineOptions {
                highlighted: vec![(1, 1), (3, 4)],
                numbers_from: Some(5),
            }
        );
        assert_eq!(LineOptions::parse(""), LineOptions::default());
        assert!(LineOptions::parse("{2-x}").highlighted.is_empty());
    }

    #[test]
    fn splits_lines_with_highlight() {
        let mut body = block(Some("{2}"), "a\nb");
        LineHighlighter.transform(&mut body);
        assert_eq!(
            body.to_html(),
            concat!(
                r#"<pre class="language-tsx"><code class="language-tsx code-highlight" data-meta="{2}">"#,
                r#"<span class="code-line">a</span>"#,
                "\n",
                r#"<span class="code-line highlight-line">b</span></code></pre>"#,
            )
        );
    }

    #[test]
    fn numbers_lines() {
        let mut body = block(Some("showLineNumbers"), "x\n\ny");
        LineHighlighter.transform(&mut body);
        let html = body.to_html();
        assert!(html.contains(r#"<span class="code-line line-number" line="1">x</span>"#));
        assert!(html.contains(r#"<span class="code-line line-number" line="2"></span>"#));
        assert!(html.contains(r#"<span class="code-line line-number" line="3">y</span>"#));
    }

    #[test]
    fn huge_line_number_start_saturates() {
        let meta = format!("showLineNumbers={}", usize::MAX);
        let mut body = block(Some(&meta), "a\nb");
        LineHighlighter.transform(&mut body);
        let html = body.to_html();
        let last = format!(
            r#"<span class="code-line line-number" line="{}">b</span>"#,
            usize::MAX
        );
        assert!(html.contains(&last), "{html}");
    }

    #[test]
    fn already_highlighted_code_is_skipped() {
        let code = Element::new("code").with_children(vec![Element::new("span").into()]);
        let mut body = Body::new(vec![Element::new("pre").with_children(vec![code.into()]).into()]);
        let before = body.clone();
        LineHighlighter.transform(&mut body);
        assert_eq!(body, before);
    }
}
