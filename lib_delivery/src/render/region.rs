//! # Regions
//!
//! A region is the named subtree a widget fills. It is modelled as a small
//! element tree so reconciliation, carousel markers and the final markup can all
//! be inspected without a browser.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use crate::model::Item;

/// Shared handle to a region, written only by the loader that claimed it.
pub type RegionHandle = Arc<Mutex<Region>>;

const VOID_TAGS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

/// # Node
///
/// One element with classes, attributes, optional text and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    /// Creates an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Builder: adds a class.
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Builder: sets an attribute.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: sets the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: appends a child.
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Element name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Classes in insertion order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Adds `class` unless already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Removes `class` if present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// True when `class` is present.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    /// Attribute value.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Child elements.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Depth-first search for the first element carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&Node> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_class(class))
    }

    /// Concatenated text of this element and its descendants, space separated.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        if let Some(text) = self.text.as_deref() {
            if !text.is_empty() {
                parts.push(text);
            }
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }

    /// Serializes the element to escaped HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Items currently rendered into a region, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    items: Vec<Item>,
}

impl RenderState {
    /// Rendered items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of rendered items (zero for the placeholder state).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing but the placeholder is rendered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// # Region
///
/// A named subtree plus the render state bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    id: String,
    children: Vec<Node>,
    state: RenderState,
    generation: u64,
}

impl Region {
    /// Creates an empty, never rendered region.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            state: RenderState::default(),
            generation: 0,
        }
    }

    /// Creates a region already wrapped in a shared handle.
    pub fn shared(id: impl Into<String>) -> RegionHandle {
        Arc::new(Mutex::new(Self::new(id)))
    }

    /// Region identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current children.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Render state bound to the region.
    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    /// Number of reconciliations performed so far. Zero means never rendered.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when the region shows its "no results" placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.generation > 0 && self.state.is_empty()
    }

    /// Clears every child, then installs `children` bound to `items`.
    pub(crate) fn replace_children(&mut self, children: Vec<Node>, items: Vec<Item>) {
        self.children.clear();
        self.children.extend(children);
        self.state = RenderState { items };
        self.generation += 1;
    }

    /// Text of every child, one entry per child.
    pub fn child_texts(&self) -> Vec<String> {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Serializes all children to HTML.
    pub fn to_html(&self) -> String {
        self.children.iter().map(Node::to_html).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escapes_text_and_attributes() {
        let node = Node::new("div")
            .class("ex-tag")
            .attr("data-name", "Tom & \"Jerry\"")
            .text("<b>SOLD</b>");
        assert_eq!(
            node.to_html(),
            "<div class=\"ex-tag\" data-name=\"Tom &amp; &quot;Jerry&quot;\">&lt;b&gt;SOLD&lt;/b&gt;</div>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node = Node::new("img").attr("src", "a.webp");
        assert_eq!(node.to_html(), "<img src=\"a.webp\">");
    }

    #[test]
    fn classes_are_unique() {
        let mut node = Node::new("div").class("active");
        node.add_class("active");
        assert_eq!(node.classes(), ["active"]);
        node.remove_class("active");
        assert!(!node.has_class("active"));
    }

    #[test]
    fn text_content_walks_descendants() {
        let node = Node::new("div")
            .child(Node::new("h3").text("Villa"))
            .child(Node::new("div").text("85,000,000 AED"));
        assert_eq!(node.text_content(), "Villa 85,000,000 AED");
    }

    #[test]
    fn fresh_region_is_not_a_placeholder() {
        let region = Region::new("notable-transactions");
        assert_eq!(region.generation(), 0);
        assert!(!region.is_placeholder());
    }
}
