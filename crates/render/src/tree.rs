//! HTML-shaped element tree produced by the compiler and mutated by transforms.

use serde::Serialize;
use std::collections::BTreeMap;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A node in the renderable body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HtmlNode {
    /// An element or a named MDX component.
    Element(Element),
    /// Text, escaped on output.
    Text {
        /// Unescaped text.
        value: String,
    },
    /// Trusted HTML emitted verbatim.
    Raw {
        /// HTML source.
        value: String,
    },
}

impl HtmlNode {
    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        HtmlNode::Text {
            value: value.into(),
        }
    }

    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            HtmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the element if this node is one with the given tag.
    pub fn as_element_mut_with_tag(&mut self, tag: &str) -> Option<&mut Element> {
        match self {
            HtmlNode::Element(element) if element.tag == tag => Some(element),
            _ => None,
        }
    }

    fn push_text_content(&self, buffer: &mut String) {
        match self {
            HtmlNode::Element(element) => {
                for child in &element.children {
                    child.push_text_content(buffer);
                }
            }
            HtmlNode::Text { value } => buffer.push_str(value),
            HtmlNode::Raw { .. } => {}
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            HtmlNode::Element(element) => element.write_html(out),
            HtmlNode::Text { value } => out.push_str(&html_escape::encode_text(value)),
            HtmlNode::Raw { value } => out.push_str(value),
        }
    }
}

impl From<Element> for HtmlNode {
    fn from(element: Element) -> Self {
        HtmlNode::Element(element)
    }
}

/// An element with ordered properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Tag or component name.
    pub tag: String,
    /// Rendered attributes. An empty value renders as a bare attribute.
    pub properties: BTreeMap<String, String>,
    /// Child nodes.
    pub children: Vec<HtmlNode>,
    /// Source text captured by a transform for later stages. Never rendered by itself.
    #[serde(skip)]
    pub raw: Option<String>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Builder-style children setter.
    pub fn with_children(mut self, children: Vec<HtmlNode>) -> Self {
        self.children = children;
        self
    }

    /// Sets or replaces a property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Looks up a property.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Whitespace-separated class names.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.property("class").unwrap_or_default().split_whitespace()
    }

    /// Appends a class name unless already present.
    pub fn add_class(&mut self, class: &str) {
        if self.class_names().any(|existing| existing == class) {
            return;
        }
        let entry = self.properties.entry("class".to_string()).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(class);
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        for child in &self.children {
            child.push_text_content(&mut buffer);
        }
        buffer
    }

    /// Serializes this element and its subtree.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.properties {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
        }

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            out.push_str(" />");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// The renderable body of a compiled document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Body {
    /// Top-level nodes.
    pub children: Vec<HtmlNode>,
}

impl Body {
    /// Wraps top-level nodes.
    pub fn new(children: Vec<HtmlNode>) -> Self {
        Self { children }
    }

    /// Visits every element in document order, parents before children.
    ///
    /// Children are visited after the callback returns, so a callback may
    /// replace them and the replacements are visited too.
    pub fn visit_elements_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        visit_nodes(&mut self.children, f);
    }

    /// Visits every element with the given tag.
    pub fn visit_tag_mut(&mut self, tag: &str, f: &mut dyn FnMut(&mut Element)) {
        self.visit_elements_mut(&mut |element| {
            if element.tag == tag {
                f(element);
            }
        });
    }

    /// Visits every child list (the top level first), for transforms that
    /// insert or remove siblings.
    pub fn visit_child_lists_mut(&mut self, f: &mut dyn FnMut(&mut Vec<HtmlNode>)) {
        visit_lists(&mut self.children, f);
    }

    /// Serializes the body to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            node.write_html(&mut out);
        }
        out
    }
}

fn visit_nodes(nodes: &mut [HtmlNode], f: &mut dyn FnMut(&mut Element)) {
    for node in nodes {
        if let HtmlNode::Element(element) = node {
            f(element);
            visit_nodes(&mut element.children, f);
        }
    }
}

fn visit_lists(nodes: &mut Vec<HtmlNode>, f: &mut dyn FnMut(&mut Vec<HtmlNode>)) {
    f(nodes);
    for node in nodes.iter_mut() {
        if let HtmlNode::Element(element) = node {
            visit_lists(&mut element.children, f);
        }
    }
}
