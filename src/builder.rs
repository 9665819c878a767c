//! Builder pattern API for node trees and templates
//!
//! This module provides a fluent API for writing element nodes without
//! spelling out the [`Node`] variants, and for freezing batches of nodes into
//! one [`Template`] under a [`TemplateConfig`].
//!
//! ```rust,ignore
//! use dom_template::{Node, TemplateBuilder, TemplateConfig};
//!
//! let article = Node::element("article")
//!     .attribute("class", "post")
//!     .child(Node::element("h1").anchor("title").build())
//!     .child(Node::void_element("img").anchor_attribute("src", "cover").build())
//!     .build();
//!
//! let template = TemplateBuilder::new()
//!     .with_config(TemplateConfig::default().with_doctype(true))
//!     .node(article)
//!     .build();
//! ```

use std::borrow::Cow;

use crate::node::{Attribute, Element, Node};
use crate::template::Template;

/// `<!DOCTYPE html>`
pub const HTML_DOCTYPE: &[u8] = b"<!DOCTYPE html>";

/// Fluent builder for a single element node
///
/// Elements built with children become [`Node::Container`]; childless
/// elements become [`Node::Container`] too (`<p></p>`) unless
/// [`leaf`](ElementBuilder::leaf) is called or the element is void.
#[derive(Debug, Clone)]
pub struct ElementBuilder<K> {
    element: Element,
    attributes: Vec<Attribute<K>>,
    children: Vec<Node<K>>,
    leaf: bool,
}

impl<K> ElementBuilder<K> {
    pub fn new(element: Element) -> Self {
        let leaf = element.is_void();
        Self {
            element,
            attributes: Vec::new(),
            children: Vec::new(),
            leaf,
        }
    }

    /// Add an attribute with literal, already-escaped text
    pub fn attribute<N: Into<Cow<'static, str>>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.attributes.push(Attribute::text(name, value));
        self
    }

    /// Add a valueless attribute
    pub fn flag<N: Into<Cow<'static, str>>>(mut self, name: N) -> Self {
        self.attributes.push(Attribute::flag(name));
        self
    }

    /// Add an attribute whose value is a placeholder
    pub fn anchor_attribute<N: Into<Cow<'static, str>>>(mut self, name: N, key: K) -> Self {
        self.attributes.push(Attribute::anchor(name, key));
        self
    }

    pub fn child(mut self, node: Node<K>) -> Self {
        self.children.push(node);
        self
    }

    pub fn children<I: IntoIterator<Item = Node<K>>>(mut self, nodes: I) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Add an escaped text child
    pub fn text<T: Into<String>>(self, escaped: T) -> Self {
        self.child(Node::text(escaped))
    }

    /// Add a raw bytes child
    pub fn bytes<B: Into<Vec<u8>>>(self, bytes: B) -> Self {
        self.child(Node::bytes(bytes))
    }

    /// Add a placeholder child
    pub fn anchor(self, key: K) -> Self {
        self.child(Node::anchor(key))
    }

    /// Build a leaf instead of a container; any children are dropped
    pub fn leaf(mut self) -> Self {
        self.leaf = true;
        self
    }

    pub fn build(self) -> Node<K> {
        if self.leaf {
            Node::leaf(self.element, self.attributes)
        } else {
            Node::container(self.element, self.attributes, self.children)
        }
    }
}

impl<K> From<ElementBuilder<K>> for Node<K> {
    fn from(builder: ElementBuilder<K>) -> Self {
        builder.build()
    }
}

impl<K> Node<K> {
    /// Start building an ordinary element
    pub fn element<N: Into<Cow<'static, str>>>(name: N) -> ElementBuilder<K> {
        ElementBuilder::new(Element::new(name))
    }

    /// Start building an HTML void element, written as `<name ...>`
    pub fn void_element<N: Into<Cow<'static, str>>>(name: N) -> ElementBuilder<K> {
        ElementBuilder::new(Element::void(name))
    }
}

/// Options applied when a [`TemplateBuilder`] freezes its nodes
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateConfig {
    pub(crate) literal_capacity: usize,
    pub(crate) anchor_capacity: usize,
    pub(crate) doctype: bool,
}

impl TemplateConfig {
    /// Create a new template configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes to reserve for the literal buffer up front
    pub fn with_literal_capacity(mut self, capacity: usize) -> Self {
        self.literal_capacity = capacity;
        self
    }

    /// Anchors to reserve room for up front
    pub fn with_anchor_capacity(mut self, capacity: usize) -> Self {
        self.anchor_capacity = capacity;
        self
    }

    /// Start the literal buffer with `<!DOCTYPE html>`
    pub fn with_doctype(mut self, enabled: bool) -> Self {
        self.doctype = enabled;
        self
    }

    // Accessors
    pub fn literal_capacity(&self) -> usize {
        self.literal_capacity
    }
    pub fn anchor_capacity(&self) -> usize {
        self.anchor_capacity
    }
    pub fn doctype(&self) -> bool {
        self.doctype
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            literal_capacity: 1024,
            anchor_capacity: 16,
            doctype: false,
        }
    }
}

/// Builder that freezes a batch of nodes into one template
#[derive(Debug, Clone)]
pub struct TemplateBuilder<K> {
    config: TemplateConfig,
    nodes: Vec<Node<K>>,
}

impl<K: Clone> TemplateBuilder<K> {
    pub fn new() -> Self {
        Self {
            config: TemplateConfig::default(),
            nodes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: TemplateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn node<N: Into<Node<K>>>(mut self, node: N) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn nodes<I: IntoIterator<Item = Node<K>>>(mut self, nodes: I) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn build(self) -> Template<K> {
        let mut template = Template::with_capacity(self.config.literal_capacity, self.config.anchor_capacity);
        if self.config.doctype {
            template.freeze(&Node::bytes(HTML_DOCTYPE));
        }
        template.freeze_all(&self.nodes);
        template
    }
}

impl<K: Clone> Default for TemplateBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Anchor;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_element_builder_container() {
        let node = Node::element("a")
            .attribute("class", "nav")
            .anchor_attribute("href", "url")
            .anchor("label")
            .build();

        let template = Template::freezing(&node);
        assert_eq!(template.literals(), b"<a class=\"nav\" href=\"\"></a>");
        assert_eq!(
            template.anchors(),
            &[Anchor::new("url", 21), Anchor::new("label", 23)]
        );
    }

    #[test]
    fn test_void_element_builds_leaf() {
        let node: Node<&str> = Node::void_element("input").flag("checked").build();
        assert!(matches!(node, Node::Leaf { .. }));
        assert_eq!(Template::freezing(&node).literals(), b"<input checked>");
    }

    #[test]
    fn test_explicit_leaf() {
        let node: Node<&str> = Node::element("circle").attribute("r", "4").leaf().build();
        assert_eq!(Template::freezing(&node).literals(), b"<circle r=\"4\"/>");
    }

    #[test]
    fn test_empty_container() {
        let node: Node<&str> = Node::element("p").build();
        assert_eq!(Template::freezing(&node).literals(), b"<p></p>");
    }

    #[test]
    fn test_template_config_default() {
        let config = TemplateConfig::default();
        assert_eq!(config.doctype(), false);
        assert_eq!(config.literal_capacity(), 1024);

        let config = TemplateConfig::new().with_doctype(true).with_anchor_capacity(2);
        assert!(config.doctype());
        assert_eq!(config.anchor_capacity(), 2);
    }

    #[test]
    fn test_template_builder_with_doctype() {
        let template = TemplateBuilder::new()
            .with_config(TemplateConfig::new().with_doctype(true))
            .node(Node::element("html").anchor("body"))
            .build();

        assert_eq!(template.literals(), b"<!DOCTYPE html><html></html>");
        assert_eq!(template.anchors(), &[Anchor::new("body", 21)]);
    }

    #[test]
    fn test_template_builder_matches_batch_freezing() {
        let nodes = vec![
            Node::element("h1").anchor("title").build(),
            Node::element("p").anchor("body").build(),
        ];
        let built = TemplateBuilder::new().nodes(nodes.clone()).build();
        assert_eq!(built, Template::freezing_all(&nodes));
    }
}
