//! Markup tree
//!
//! Components render to [`Element`] trees. An element carries a tag, a class
//! list, an inline style and plain attributes, and can be serialized to HTML
//! or (through serde) to JSON.

use indexmap::IndexMap;
use serde::Serialize;

use crate::class::{ClassFragment, ClassList};
use crate::style::Style;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "source", "wbr"];

/// A child of an element
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_html(out),
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// A rendered element
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Element {
    tag: String,
    #[serde(skip_serializing_if = "ClassList::is_empty")]
    classes: ClassList,
    #[serde(skip_serializing_if = "Style::is_empty")]
    style: Style,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: ClassList::new(),
            style: Style::new(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Add class fragments
    pub fn class(mut self, fragment: impl ClassFragment) -> Self {
        fragment.append_to(&mut self.classes);
        self
    }

    /// Overlay inline style declarations
    pub fn style(mut self, style: &Style) -> Self {
        self.style.merge(style);
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn inline_style(&self) -> &Style {
        &self.style
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Serialize to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);

        if !self.classes.is_empty() {
            write_attribute(out, "class", &self.classes.to_string());
        }
        if !self.style.is_empty() {
            write_attribute(out, "style", &self.style.to_css());
        }
        for (name, value) in &self.attributes {
            write_attribute(out, name, value);
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_attributes() {
        let el = Element::new("section")
            .class("reveal overflow-hidden")
            .style(&Style::transform("translateY(100%)"))
            .attr("data-state", "hidden")
            .text("Hi");
        assert_eq!(
            el.to_html(),
            r#"<section class="reveal overflow-hidden" style="transform: translateY(100%)" data-state="hidden">Hi</section>"#
        );
    }

    #[test]
    fn test_to_html_escapes() {
        let el = Element::new("p")
            .attr("title", "say \"hi\"")
            .text("<b> & co");
        assert_eq!(
            el.to_html(),
            r#"<p title="say &quot;hi&quot;">&lt;b&gt; &amp; co</p>"#
        );
    }

    #[test]
    fn test_void_and_nested() {
        let el = Element::new("div")
            .child(Element::new("img").attr("src", "a.png"))
            .child(Element::new("span").text("x"));
        assert_eq!(
            el.to_html(),
            r#"<div><img src="a.png"><span>x</span></div>"#
        );
    }

    #[test]
    fn test_empty_container() {
        assert_eq!(Element::new("div").to_html(), "<div></div>");
    }

    #[test]
    fn test_json_shape() {
        let el = Element::new("div").class("a").child("t");
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["tag"], "div");
        assert_eq!(json["classes"], "a");
        assert_eq!(json["children"][0], "t");
        assert!(json.get("style").is_none());
    }
}
