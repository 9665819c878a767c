//! Markup node tree and its serializer
//!
//! A [`Node`] is a closed set of markup variants: raw bytes, pre-escaped text,
//! leaf and container elements, and anchors. Serialization walks the tree
//! depth-first, left to right, and writes into a [`Sink`]. The freezing sink
//! records every anchor as `(key, offset)` against one shared growing buffer,
//! which is how a [`Template`] is built; the resolving sink inlines each
//! placeholder immediately, which gives the direct serialization of the same
//! tree.
//!
//! ```rust,ignore
//! use dom_template::{Node, Template};
//!
//! let link = Node::element("a")
//!     .anchor_attribute("href", "url")
//!     .anchor("label")
//!     .build();
//!
//! let template = Template::freezing(&link);
//! assert_eq!(template.literals(), b"<a href=\"\"></a>");
//! ```
//!
//! [`Template`]: crate::Template

use std::borrow::Cow;
use std::convert::Infallible;

use crate::template::Anchor;

/// Tag name of an element, plus whether it is an HTML void element
///
/// Void elements (`br`, `img`, `input`, ...) are written as `<br>` when used
/// as a leaf; every other leaf is written self-closing, as `<tag/>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    pub(crate) name: Cow<'static, str>,
    pub(crate) void: bool,
}

impl Element {
    /// An ordinary element
    pub fn new<N: Into<Cow<'static, str>>>(name: N) -> Self {
        Self {
            name: name.into(),
            void: false,
        }
    }

    /// An HTML void element
    pub fn void<N: Into<Cow<'static, str>>>(name: N) -> Self {
        Self {
            name: name.into(),
            void: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_void(&self) -> bool {
        self.void
    }
}

/// Value of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue<K> {
    /// Attribute without a value, e.g. `disabled`
    Void,
    /// Literal, already-escaped attribute text
    Text(String),
    /// Placeholder between the quotes, resolved when the template is rendered
    Anchor(K),
}

/// A `name` / value pair on an element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute<K> {
    pub name: Cow<'static, str>,
    pub value: AttributeValue<K>,
}

impl<K> Attribute<K> {
    pub fn text<N: Into<Cow<'static, str>>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Text(value.into()),
        }
    }

    pub fn flag<N: Into<Cow<'static, str>>>(name: N) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Void,
        }
    }

    pub fn anchor<N: Into<Cow<'static, str>>>(name: N, key: K) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Anchor(key),
        }
    }
}

/// A markup node whose placeholders are keyed by `K`
///
/// `Bytes` and `Text` are both copied verbatim: escaping is the caller's
/// decision, and the two variants only record whether the caller considered
/// the payload markup or text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node<K> {
    Bytes(Vec<u8>),
    Text(String),
    Leaf {
        element: Element,
        attributes: Vec<Attribute<K>>,
    },
    Container {
        element: Element,
        attributes: Vec<Attribute<K>>,
        children: Vec<Node<K>>,
    },
    Anchor(K),
}

/// Destination of a node serialization
pub trait Sink<K> {
    /// Append literal markup bytes
    fn push(&mut self, bytes: &[u8]);

    /// A placeholder for `key` belongs at the current position
    fn anchor(&mut self, key: &K);
}

/// Sink that records anchors as offsets into a shared buffer
pub(crate) struct Freezer<'a, K> {
    pub(crate) output: &'a mut Vec<u8>,
    pub(crate) anchors: &'a mut Vec<Anchor<K>>,
}

impl<K: Clone> Sink<K> for Freezer<'_, K> {
    fn push(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    fn anchor(&mut self, key: &K) {
        self.anchors.push(Anchor::new(key.clone(), self.output.len()));
    }
}

/// Sink that inlines each placeholder as soon as it is reached
struct Inliner<'a, F> {
    output: &'a mut Vec<u8>,
    resolve: F,
}

impl<K, S, F> Sink<K> for Inliner<'_, F>
where
    F: FnMut(&K) -> Option<S>,
    S: AsRef<[u8]>,
{
    fn push(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    fn anchor(&mut self, key: &K) {
        if let Some(segment) = (self.resolve)(key) {
            self.output.extend_from_slice(segment.as_ref());
        }
    }
}

impl<K> Node<K> {
    /// Raw markup bytes, copied verbatim
    pub fn bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Node::Bytes(bytes.into())
    }

    /// Text the caller has already escaped
    pub fn text<T: Into<String>>(escaped: T) -> Self {
        Node::Text(escaped.into())
    }

    pub fn anchor(key: K) -> Self {
        Node::Anchor(key)
    }

    pub fn leaf(element: Element, attributes: Vec<Attribute<K>>) -> Self {
        Node::Leaf {
            element,
            attributes,
        }
    }

    pub fn container(element: Element, attributes: Vec<Attribute<K>>, children: Vec<Node<K>>) -> Self {
        Node::Container {
            element,
            attributes,
            children,
        }
    }

    /// Serialize this node into `sink`
    pub fn emit<S: Sink<K>>(&self, sink: &mut S) {
        let (element, attributes, children) = match self {
            Node::Bytes(bytes) => {
                sink.push(bytes);
                return;
            }
            Node::Text(text) => {
                sink.push(text.as_bytes());
                return;
            }
            Node::Anchor(key) => {
                sink.anchor(key);
                return;
            }
            Node::Leaf {
                element,
                attributes,
            } => (element, attributes, None),
            Node::Container {
                element,
                attributes,
                children,
            } => (element, attributes, Some(children)),
        };

        sink.push(b"<");
        sink.push(element.name.as_bytes());
        for attribute in attributes {
            sink.push(b" ");
            sink.push(attribute.name.as_bytes());
            match &attribute.value {
                AttributeValue::Void => {}
                AttributeValue::Text(value) => {
                    sink.push(b"=\"");
                    sink.push(value.as_bytes());
                    sink.push(b"\"");
                }
                AttributeValue::Anchor(key) => {
                    sink.push(b"=\"");
                    sink.anchor(key);
                    sink.push(b"\"");
                }
            }
        }

        let Some(children) = children else {
            let close: &[u8] = if element.void { b">" } else { b"/>" };
            sink.push(close);
            return;
        };

        sink.push(b">");
        for child in children {
            child.emit(sink);
        }
        sink.push(b"</");
        sink.push(element.name.as_bytes());
        sink.push(b">");
    }

    /// Serialize into `output`, appending one anchor per placeholder
    ///
    /// Offsets are measured against `output` as a whole, so several nodes can
    /// be written one after another into the same buffer.
    pub fn render_into(&self, output: &mut Vec<u8>, anchors: &mut Vec<Anchor<K>>)
    where
        K: Clone,
    {
        self.emit(&mut Freezer { output, anchors });
    }

    /// Serialize with every placeholder inlined through `resolve`
    ///
    /// Placeholders that resolve to `None` contribute no bytes.
    pub fn rendered_with<S, F>(&self, resolve: F) -> Vec<u8>
    where
        F: FnMut(&K) -> Option<S>,
        S: AsRef<[u8]>,
    {
        let mut output = Vec::new();
        self.emit(&mut Inliner {
            output: &mut output,
            resolve,
        });
        output
    }

    /// Number of placeholders in this subtree, attribute anchors included
    pub fn anchor_count(&self) -> usize {
        fn attribute_anchors<K>(attributes: &[Attribute<K>]) -> usize {
            attributes
                .iter()
                .filter(|attribute| matches!(attribute.value, AttributeValue::Anchor(_)))
                .count()
        }

        match self {
            Node::Bytes(_) | Node::Text(_) => 0,
            Node::Anchor(_) => 1,
            Node::Leaf { attributes, .. } => attribute_anchors(attributes),
            Node::Container {
                attributes,
                children,
                ..
            } => attribute_anchors(attributes) + children.iter().map(Node::anchor_count).sum::<usize>(),
        }
    }
}

impl Node<Infallible> {
    /// Serialize a tree that cannot contain placeholders
    pub fn rendered(&self) -> Vec<u8> {
        self.rendered_with(|never: &Infallible| -> Option<&'static [u8]> { match *never {} })
    }
}
