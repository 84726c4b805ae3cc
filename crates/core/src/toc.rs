//! Table-of-contents extraction.
//!
//! The default extractor is a line-anchored text scan over the raw document.
//! It does not know about fenced code, so a `## comment` line inside a code
//! block is reported as a heading. [`extract_headings_structural`] walks the
//! parsed tree instead and does not have that problem.

use markdown::mdast::Node;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::frontmatter::extract_frontmatter;
use crate::parse::{ParseOptions, parse_mdast};
use crate::slug::anchor_slug;

/// Shallowest heading level collected. Level 1 is the page title.
pub const MIN_LEVEL: u8 = 2;
/// Deepest heading level collected.
pub const MAX_LEVEL: u8 = 4;

static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{2,4})[ \t](.+)$").expect("heading pattern is valid"));

static WRAPPING_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<([A-Za-z][\w.:-]*)(?:\s[^>]*)?>(.*)</([A-Za-z][\w.:-]*)\s*>$")
        .expect("inline tag pattern is valid")
});

/// One entry of a page outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    /// Heading level, 2 to 4.
    pub level: u8,
    /// Visible text with wrapping inline markup removed.
    pub text: String,
    /// In-page link target, `#` followed by the anchor slug.
    pub anchor: String,
}

impl HeadingRecord {
    fn new(level: u8, text: String) -> Self {
        let anchor = format!("#{}", anchor_slug(&text));
        Self {
            level,
            text,
            anchor,
        }
    }
}

/// How the outline of a page is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocMode {
    /// Line scan over the raw text, see [`extract_headings`].
    #[default]
    Textual,
    /// Walk of the parsed syntax tree, see [`extract_headings_structural`].
    Structural,
}

impl TocMode {
    /// Runs the extractor selected by this mode. `options` only matters for
    /// [`TocMode::Structural`] and should be what the page is compiled with.
    pub fn extract(self, raw: &str, options: ParseOptions) -> Vec<HeadingRecord> {
        match self {
            TocMode::Textual => extract_headings(raw),
            TocMode::Structural => extract_headings_structural(raw, options),
        }
    }
}

/// Scans raw document text for level 2-4 ATX headings, in document order.
///
/// Headings whose text is empty after trimming are skipped.
pub fn extract_headings(raw: &str) -> Vec<HeadingRecord> {
    HEADING_LINE
        .captures_iter(raw)
        .filter_map(|caps| {
            let level = caps[1].len() as u8;
            let text = inner_text(caps[2].trim());
            (!text.is_empty()).then(|| HeadingRecord::new(level, text.to_string()))
        })
        .collect()
}

/// Unwraps heading text authored as a single inline element.
///
/// `<span>Intro</span>` yields `Intro`; nested wrappers are peeled one by one.
/// Anything that is not exactly one element with matching open and close
/// tags is returned unchanged.
pub fn inner_text(text: &str) -> &str {
    let mut current = text;
    while let Some(caps) = WRAPPING_TAG.captures(current) {
        if caps[1] != caps[3] {
            break;
        }
        let Some(inner) = caps.get(2) else {
            break;
        };
        if closes_early(inner.as_str(), &caps[1]) {
            break;
        }
        current = inner.as_str().trim();
    }
    current
}

/// True when `inner` closes a `name` element it never opened, meaning the
/// outer tags belong to two sibling elements.
fn closes_early(inner: &str, name: &str) -> bool {
    let mut depth = 0usize;
    let mut rest = inner;
    while let Some(pos) = rest.find('<') {
        rest = &rest[pos + 1..];
        let (closing, tag) = match rest.strip_prefix('/') {
            Some(tag) => (true, tag),
            None => (false, rest),
        };
        let Some(after) = tag.strip_prefix(name) else {
            continue;
        };
        if after.starts_with(|c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')) {
            continue;
        }
        if closing {
            if depth == 0 {
                return true;
            }
            depth -= 1;
        } else if !after.split('>').next().is_some_and(|attrs| attrs.ends_with('/')) {
            depth += 1;
        }
    }
    false
}

/// Outline computed from the parsed tree, so code blocks never contribute.
///
/// Frontmatter is skipped. A document that fails to parse under `options`
/// has no outline.
pub fn extract_headings_structural(raw: &str, options: ParseOptions) -> Vec<HeadingRecord> {
    let body = match extract_frontmatter(raw) {
        Ok(extraction) => &raw[extraction.body_start..],
        Err(_) => raw,
    };

    let options = ParseOptions {
        frontmatter: false,
        ..options
    };
    match parse_mdast(body, options) {
        Ok(root) => extract_headings_from_mdast(&root),
        Err(err) => {
            log::debug!("no outline, document does not parse: {err}");
            Vec::new()
        }
    }
}

/// Collects level 2-4 headings from an mdast tree in document order.
pub fn extract_headings_from_mdast(root: &Node) -> Vec<HeadingRecord> {
    let mut headings = Vec::new();
    collect_headings(root, &mut headings);
    headings
}

fn collect_headings(node: &Node, out: &mut Vec<HeadingRecord>) {
    if let Node::Heading(heading) = node {
        if (MIN_LEVEL..=MAX_LEVEL).contains(&heading.depth) {
            let mut text = String::new();
            for child in &heading.children {
                push_text(child, &mut text);
            }
            let text = text.trim();
            if !text.is_empty() {
                out.push(HeadingRecord::new(heading.depth, text.to_string()));
            }
        }
        return;
    }

    if let Some(children) = node.children() {
        for child in children {
            collect_headings(child, out);
        }
    }
}

fn push_text(node: &Node, buffer: &mut String) {
    match node {
        Node::Text(text) => buffer.push_str(&text.value),
        Node::InlineCode(code) => buffer.push_str(&code.value),
        Node::Html(html) => buffer.push_str(inner_text(&html.value)),
        _ => {
            if let Some(children) = node.children() {
                for child in children {
                    push_text(child, buffer);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: u8, text: &str, anchor: &str) -> HeadingRecord {
        HeadingRecord {
            level,
            text: text.into(),
            anchor: anchor.into(),
        }
    }

    const PAGE: &str = "---
title: Navbar
description: A sticky navbar
---

# Navbar

Intro paragraph.

## Getting Started!

### <span>Intro</span>

#### Props

##### Too deep

## Usage <code>sticky</code>

```tsx
## inside a fence
```
";

    #[test]
    fn textual_scan_keeps_order_and_levels() {
        let headings = extract_headings(PAGE);
        assert_eq!(
            headings,
            vec![
                record(2, "Getting Started!", "#getting-started"),
                record(3, "Intro", "#intro"),
                record(4, "Props", "#props"),
                record(2, "Usage <code>sticky</code>", "#usage-codestickycode"),
                record(2, "inside a fence", "#inside-a-fence"),
            ]
        );
        assert!(headings.iter().all(|h| (2..=4).contains(&h.level)));
    }

    #[test]
    fn textual_scan_is_idempotent() {
        assert_eq!(extract_headings(PAGE), extract_headings(PAGE));
    }

    #[test]
    fn requires_space_after_hashes() {
        assert!(extract_headings("##NoSpace\n#hashtag\n").is_empty());
        assert!(extract_headings("##   \n").is_empty());
        assert_eq!(
            extract_headings("##\tTabbed\r\n"),
            vec![record(2, "Tabbed", "#tabbed")]
        );
    }

    #[test]
    fn inner_text_unwraps_single_elements_only() {
        assert_eq!(inner_text("<span>Intro</span>"), "Intro");
        assert_eq!(inner_text(r#"<span class="x">Intro</span>"#), "Intro");
        assert_eq!(inner_text("<span><b>Deep</b></span>"), "Deep");
        assert_eq!(inner_text("<span><span>x</span></span>"), "x");
        assert_eq!(inner_text("<a>One</a> and <b>two</b>"), "<a>One</a> and <b>two</b>");
        assert_eq!(
            inner_text("<span>a</span> and <span>b</span>"),
            "<span>a</span> and <span>b</span>"
        );
        assert_eq!(
            inner_text("<code>a</code> vs <code>b</code>"),
            "<code>a</code> vs <code>b</code>"
        );
        assert_eq!(inner_text("Plain"), "Plain");
    }

    #[test]
    fn sibling_elements_keep_their_markup() {
        assert_eq!(
            extract_headings("## <span>a</span> and <span>b</span>\n"),
            vec![record(
                2,
                "<span>a</span> and <span>b</span>",
                "#spanaspan-and-spanbspan"
            )]
        );
    }

    #[test]
    fn structural_outline_skips_code_fences() {
        let headings = extract_headings_structural(PAGE, ParseOptions::mdx());
        let texts: Vec<_> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, ["Getting Started!", "Intro", "Props", "Usage sticky"]);
        assert_eq!(headings[1], record(3, "Intro", "#intro"));
    }

    #[test]
    fn structural_outline_of_broken_document_is_empty() {
        assert!(extract_headings_structural("## Ok\n\n<Tabs>\n", ParseOptions::mdx()).is_empty());
    }

    #[test]
    fn structural_outline_follows_parse_mode() {
        let raw = "## Usage\n\nline one<br>\n";
        assert!(extract_headings_structural(raw, ParseOptions::mdx()).is_empty());
        assert_eq!(
            extract_headings_structural(raw, ParseOptions::markdown()),
            vec![record(2, "Usage", "#usage")]
        );
    }

    #[test]
    fn mode_dispatch() {
        assert_eq!(TocMode::default(), TocMode::Textual);
        assert_eq!(TocMode::Textual.extract(PAGE, ParseOptions::mdx()).len(), 5);
        assert_eq!(TocMode::Structural.extract(PAGE, ParseOptions::mdx()).len(), 4);
    }
}
