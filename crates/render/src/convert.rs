//! mdast to element tree conversion.

use std::collections::HashMap;

use markdown::mdast::{
    AlignKind, AttributeContent, AttributeValue, Definition, FootnoteDefinition, List, ListItem,
    Node, Table,
};

use crate::tree::{Body, Element, HtmlNode};

/// Conversion switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Emit raw HTML nodes verbatim instead of escaping them as text.
    pub allow_raw_html: bool,
}

/// Converts a parsed document into a renderable body.
pub fn mdast_to_body(root: &Node, options: ConvertOptions) -> Body {
    let mut converter = Converter::new(options);
    converter.collect_definitions(root);

    let mut children = Vec::new();
    converter.convert(root, &mut children);
    if let Some(section) = converter.footnote_section() {
        children.push(section.into());
    }

    Body::new(children)
}

struct Converter<'a> {
    options: ConvertOptions,
    definitions: HashMap<&'a str, &'a Definition>,
    footnotes: HashMap<&'a str, &'a FootnoteDefinition>,
    /// Footnote identifiers in order of first reference.
    footnote_order: Vec<&'a str>,
}

impl<'a> Converter<'a> {
    fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            definitions: HashMap::new(),
            footnotes: HashMap::new(),
            footnote_order: Vec::new(),
        }
    }

    fn collect_definitions(&mut self, node: &'a Node) {
        match node {
            Node::Definition(definition) => {
                self.definitions
                    .entry(definition.identifier.as_str())
                    .or_insert(definition);
            }
            Node::FootnoteDefinition(footnote) => {
                self.footnotes
                    .entry(footnote.identifier.as_str())
                    .or_insert(footnote);
            }
            _ => {}
        }
        if let Some(children) = node.children() {
            for child in children {
                self.collect_definitions(child);
            }
        }
    }

    fn children(&mut self, nodes: &'a [Node]) -> Vec<HtmlNode> {
        let mut out = Vec::new();
        for node in nodes {
            self.convert(node, &mut out);
        }
        out
    }

    fn wrap(&mut self, tag: &str, nodes: &'a [Node]) -> Element {
        Element::new(tag).with_children(self.children(nodes))
    }

    fn convert(&mut self, node: &'a Node, out: &mut Vec<HtmlNode>) {
        let element = match node {
            Node::Root(root) => {
                for child in &root.children {
                    self.convert(child, out);
                }
                return;
            }
            Node::Text(text) => {
                out.push(HtmlNode::text(&text.value));
                return;
            }
            Node::Paragraph(para) => self.wrap("p", &para.children),
            Node::Heading(heading) => self.wrap(&format!("h{}", heading.depth), &heading.children),
            Node::Strong(strong) => self.wrap("strong", &strong.children),
            Node::Emphasis(emphasis) => self.wrap("em", &emphasis.children),
            Node::Delete(delete) => self.wrap("del", &delete.children),
            Node::Blockquote(quote) => self.wrap("blockquote", &quote.children),
            Node::InlineCode(code) => {
                Element::new("code").with_children(vec![HtmlNode::text(&code.value)])
            }
            Node::Code(code) => {
                let mut inner =
                    Element::new("code").with_children(vec![HtmlNode::text(&code.value)]);
                if let Some(lang) = &code.lang {
                    inner.set_property("class", format!("language-{lang}"));
                }
                if let Some(meta) = &code.meta {
                    inner.set_property("data-meta", meta.as_str());
                }
                Element::new("pre").with_children(vec![inner.into()])
            }
            Node::Break(_) => Element::new("br"),
            Node::ThematicBreak(_) => Element::new("hr"),
            Node::Link(link) => {
                let mut anchor = self.wrap("a", &link.children).with_property("href", &link.url);
                if let Some(title) = &link.title {
                    anchor.set_property("title", title.as_str());
                }
                anchor
            }
            Node::Image(image) => image_element(&image.url, &image.alt, image.title.as_deref()),
            Node::LinkReference(reference) => {
                match self.definitions.get(reference.identifier.as_str()).copied() {
                    Some(definition) => {
                        let mut anchor = self
                            .wrap("a", &reference.children)
                            .with_property("href", &definition.url);
                        if let Some(title) = &definition.title {
                            anchor.set_property("title", title.as_str());
                        }
                        anchor
                    }
                    None => {
                        out.extend(self.children(&reference.children));
                        return;
                    }
                }
            }
            Node::ImageReference(reference) => {
                match self.definitions.get(reference.identifier.as_str()).copied() {
                    Some(definition) => image_element(
                        &definition.url,
                        &reference.alt,
                        definition.title.as_deref(),
                    ),
                    None => {
                        out.push(HtmlNode::text(&reference.alt));
                        return;
                    }
                }
            }
            Node::List(list) => self.list(list),
            Node::Table(table) => self.table(table),
            Node::Html(html) => {
                if self.options.allow_raw_html {
                    out.push(HtmlNode::Raw {
                        value: html.value.clone(),
                    });
                } else {
                    log::debug!("escaping raw HTML in document: {}", html.value);
                    out.push(HtmlNode::text(&html.value));
                }
                return;
            }
            Node::MdxJsxFlowElement(element) => {
                self.jsx(element.name.as_deref(), &element.attributes, &element.children, out);
                return;
            }
            Node::MdxJsxTextElement(element) => {
                self.jsx(element.name.as_deref(), &element.attributes, &element.children, out);
                return;
            }
            Node::FootnoteReference(reference) => self.footnote_reference(&reference.identifier),
            Node::Definition(_) | Node::FootnoteDefinition(_) | Node::Yaml(_) | Node::Toml(_) => {
                return;
            }
            Node::MdxjsEsm(_) | Node::MdxFlowExpression(_) | Node::MdxTextExpression(_) => {
                log::debug!("dropping MDX script node: {node:?}");
                return;
            }
            _ => {
                log::warn!("Unhandled markdown node type: {node:?}");
                return;
            }
        };
        out.push(element.into());
    }

    fn list(&mut self, list: &'a List) -> Element {
        let mut element = Element::new(if list.ordered { "ol" } else { "ul" });
        if let Some(start) = list.start.filter(|start| list.ordered && *start != 1) {
            element.set_property("start", start.to_string());
        }
        if list.children.iter().any(is_task_item) {
            element.add_class("contains-task-list");
        }

        for child in &list.children {
            match child {
                Node::ListItem(item) => {
                    let item = self.list_item(item, list.spread);
                    element.children.push(item.into());
                }
                other => self.convert(other, &mut element.children),
            }
        }
        element
    }

    fn list_item(&mut self, item: &'a ListItem, list_spread: bool) -> Element {
        let tight = !list_spread && !item.spread;
        let mut li = Element::new("li");
        let mut children = Vec::new();

        if let Some(checked) = item.checked {
            li.add_class("task-list-item");
            let mut checkbox = Element::new("input")
                .with_property("type", "checkbox")
                .with_property("disabled", "");
            if checked {
                checkbox.set_property("checked", "");
            }
            children.push(checkbox.into());
            children.push(HtmlNode::text(" "));
        }

        for child in &item.children {
            match child {
                Node::Paragraph(para) if tight => children.extend(self.children(&para.children)),
                other => self.convert(other, &mut children),
            }
        }

        li.children = children;
        li
    }

    fn table(&mut self, table: &'a Table) -> Element {
        let mut rows = table.children.iter().filter_map(|row| match row {
            Node::TableRow(row) => Some(row),
            _ => None,
        });

        let mut element = Element::new("table");
        if let Some(head) = rows.next() {
            let tr = self.table_row(&head.children, "th", &table.align);
            element
                .children
                .push(Element::new("thead").with_children(vec![tr.into()]).into());
        }

        let body: Vec<HtmlNode> = rows
            .map(|row| self.table_row(&row.children, "td", &table.align).into())
            .collect();
        if !body.is_empty() {
            element
                .children
                .push(Element::new("tbody").with_children(body).into());
        }
        element
    }

    fn table_row(&mut self, cells: &'a [Node], tag: &str, align: &[AlignKind]) -> Element {
        let mut tr = Element::new("tr");
        for (i, cell) in cells.iter().enumerate() {
            let Node::TableCell(cell) = cell else {
                continue;
            };
            let mut td = self.wrap(tag, &cell.children);
            match align.get(i) {
                Some(AlignKind::Left) => td.set_property("align", "left"),
                Some(AlignKind::Right) => td.set_property("align", "right"),
                Some(AlignKind::Center) => td.set_property("align", "center"),
                Some(AlignKind::None) | None => {}
            }
            tr.children.push(td.into());
        }
        tr
    }

    fn jsx(
        &mut self,
        name: Option<&str>,
        attributes: &'a [AttributeContent],
        children: &'a [Node],
        out: &mut Vec<HtmlNode>,
    ) {
        // Fragments (`<>...</>`) have no element of their own.
        let Some(name) = name else {
            out.extend(self.children(children));
            return;
        };

        let mut element = Element::new(name);
        for attribute in attributes {
            match attribute {
                AttributeContent::Property(property) => {
                    let value = match &property.value {
                        Some(AttributeValue::Literal(value)) => value.clone(),
                        Some(AttributeValue::Expression(expression)) => {
                            format!("{{{}}}", expression.value)
                        }
                        None => String::new(),
                    };
                    element.set_property(property.name.as_str(), value);
                }
                AttributeContent::Expression(spread) => {
                    log::debug!("dropping spread attribute on <{name}>: {}", spread.value);
                }
            }
        }
        element.children = self.children(children);
        out.push(element.into());
    }

    fn footnote_reference(&mut self, identifier: &'a str) -> Element {
        let ordinal = match self.footnote_order.iter().position(|id| *id == identifier) {
            Some(index) => index + 1,
            None => {
                self.footnote_order.push(identifier);
                self.footnote_order.len()
            }
        };

        let link = Element::new("a")
            .with_property("href", format!("#user-content-fn-{identifier}"))
            .with_property("id", format!("user-content-fnref-{identifier}"))
            .with_property("data-footnote-ref", "")
            .with_property("aria-describedby", "footnote-label")
            .with_children(vec![HtmlNode::text(ordinal.to_string())]);
        Element::new("sup").with_children(vec![link.into()])
    }

    fn footnote_section(&mut self) -> Option<Element> {
        if self.footnote_order.is_empty() {
            return None;
        }

        let mut items = Vec::new();
        for identifier in self.footnote_order.clone() {
            let Some(definition) = self.footnotes.get(identifier).copied() else {
                log::warn!("footnote [^{identifier}] is referenced but never defined");
                continue;
            };
            let mut children = self.children(&definition.children);
            let backref = Element::new("a")
                .with_property("href", format!("#user-content-fnref-{identifier}"))
                .with_property("data-footnote-backref", "")
                .with_property("aria-label", "Back to reference")
                .with_children(vec![HtmlNode::text("↩")]);
            children.push(backref.into());
            items.push(
                Element::new("li")
                    .with_property("id", format!("user-content-fn-{identifier}"))
                    .with_children(children)
                    .into(),
            );
        }

        let heading = Element::new("h2")
            .with_property("id", "footnote-label")
            .with_property("class", "sr-only")
            .with_children(vec![HtmlNode::text("Footnotes")]);
        Some(
            Element::new("section")
                .with_property("class", "footnotes")
                .with_property("data-footnotes", "")
                .with_children(vec![
                    heading.into(),
                    Element::new("ol").with_children(items).into(),
                ]),
        )
    }
}

fn is_task_item(node: &Node) -> bool {
    matches!(node, Node::ListItem(item) if item.checked.is_some())
}

fn image_element(url: &str, alt: &str, title: Option<&str>) -> Element {
    let mut image = Element::new("img")
        .with_property("src", url)
        .with_property("alt", alt);
    if let Some(title) = title {
        image.set_property("title", title);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use zyflo_core::{ParseOptions, parse_mdast};

    fn html(source: &str) -> String {
        let root = parse_mdast(source, ParseOptions::mdx()).expect("parse");
        mdast_to_body(&root, ConvertOptions::default()).to_html()
    }

    #[test]
    fn inline_formatting() {
        assert_eq!(
            html("Some **bold**, *em*, ~~gone~~ and `code`."),
            "<p>Some <strong>bold</strong>, <em>em</em>, <del>gone</del> and <code>code</code>.</p>"
        );
    }

    #[test]
    fn fenced_code_keeps_language_and_meta() {
        assert_eq!(
            html("```tsx {2} showLineNumbers\nconst a = <A />\n```"),
            r#"<pre><code class="language-tsx" data-meta="{2} showLineNumbers">const a = &lt;A /&gt;</code></pre>"#
        );
    }

    #[test]
    fn tight_and_task_lists() {
        assert_eq!(
            html("- one\n- two\n"),
            "<ul><li>one</li><li>two</li></ul>"
        );
        assert_eq!(
            html("- [x] done\n- [ ] todo\n"),
            r#"<ul class="contains-task-list"><li class="task-list-item"><input checked disabled type="checkbox" /> done</li><li class="task-list-item"><input disabled type="checkbox" /> todo</li></ul>"#
        );
        assert_eq!(
            html("3. three\n4. four\n"),
            r#"<ol start="3"><li>three</li><li>four</li></ol>"#
        );
    }

    #[test]
    fn references_resolve_against_definitions() {
        assert_eq!(
            html("See [the repo][gh].\n\n[gh]: https://github.com/zyflo \"Source\"\n"),
            r#"<p>See <a href="https://github.com/zyflo" title="Source">the repo</a>.</p>"#
        );
    }

    #[test]
    fn jsx_components_become_elements() {
        assert_eq!(
            html("<Note type=\"info\" open>\n  Hello\n</Note>\n"),
            r#"<Note open type="info"><p>Hello</p></Note>"#
        );
        assert_eq!(
            html("<ZyfloAlert variant={\"success\"} />\n"),
            r#"<ZyfloAlert variant="{&quot;success&quot;}"></ZyfloAlert>"#
        );
    }

    #[test]
    fn expressions_are_dropped() {
        assert_eq!(html("Hi {1 + 1}\n"), "<p>Hi </p>");
    }

    #[test]
    fn tables_carry_alignment() {
        assert_eq!(
            html("| Prop | Default |\n| :--- | ---: |\n| sticky | false |\n"),
            r#"<table><thead><tr><th align="left">Prop</th><th align="right">Default</th></tr></thead><tbody><tr><td align="left">sticky</td><td align="right">false</td></tr></tbody></table>"#
        );
    }

    #[test]
    fn footnotes_are_collected_at_the_end() {
        let out = html("Claim[^a].\n\n[^a]: Source.\n");
        assert!(out.starts_with(
            r##"<p>Claim<sup><a aria-describedby="footnote-label" data-footnote-ref href="#user-content-fn-a" id="user-content-fnref-a">1</a></sup>.</p>"##
        ));
        assert!(out.contains(r#"<li id="user-content-fn-a"><p>Source.</p>"#));
        assert!(out.ends_with("</li></ol></section>"));
    }

    #[test]
    fn raw_html_is_escaped_unless_allowed() {
        let root = parse_mdast("<b>x</b>\n", ParseOptions::markdown()).unwrap();
        assert_eq!(
            mdast_to_body(&root, ConvertOptions::default()).to_html(),
            "<p>&lt;b&gt;x&lt;/b&gt;</p>"
        );
        let allowed = ConvertOptions {
            allow_raw_html: true,
        };
        assert_eq!(mdast_to_body(&root, allowed).to_html(), "<p><b>x</b></p>");
    }
}
