//! Frozen templates and their transformations
//!
//! A [`Template`] is a partially rendered document: every byte that does not
//! depend on substitution data lives in one literal buffer, and every
//! placeholder is an [`Anchor`] recording the key it stands for and the byte
//! offset it belongs in front of. Templates are frozen once from a node tree
//! and then rendered many times with different data.
//!
//! # Operations
//!
//! - [`Template::rendered`] - splice resolved segments into a fresh buffer
//! - [`Template::map`] - rename every key, keeping literals and offsets
//! - [`Template::transform`] - rename some keys and inline others, shifting
//!   the offsets of everything after an inlined segment
//!
//! ```rust,ignore
//! use dom_template::{Node, Substitution, Template};
//!
//! let page = Node::element("p")
//!     .anchor("greeting")
//!     .text(", ")
//!     .anchor("name")
//!     .build();
//! let template = Template::freezing(&page);
//!
//! // Fix the greeting once, keep the name open
//! let partial = template.transform(|key| match *key {
//!     "greeting" => Substitution::Segment("Hello"),
//!     other => Substitution::Key(other),
//! });
//!
//! let html = partial.rendered(|_| Some("World"));
//! assert_eq!(html, b"<p>Hello, World</p>");
//! ```

use std::convert::Infallible;
use std::io::Write;
use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::{Freezer, Node};
use crate::segments::Segments;

/// A placeholder for `key`, positioned in front of byte `offset` of the
/// literal buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor<K> {
    pub key: K,
    pub offset: usize,
}

impl<K> Anchor<K> {
    pub fn new(key: K, offset: usize) -> Self {
        Self { key, offset }
    }
}

impl<K> From<(K, usize)> for Anchor<K> {
    fn from((key, offset): (K, usize)) -> Self {
        Self { key, offset }
    }
}

/// Result of a [`Template::transform`] callback
///
/// `Key` keeps the placeholder open under a new key; `Segment` resolves it
/// now, merging the bytes into the literal buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Substitution<K, S> {
    Key(K),
    Segment(S),
}

/// Immutable literal buffer plus ordered anchors
///
/// Anchor offsets never decrease and never exceed the literal buffer's
/// length. Two templates are equal when their literals are byte-equal and
/// their anchors match element by element, in order.
///
/// The literal buffer is reference-counted, so cloning a template, calling
/// [`map`](Template::map), or a [`transform`](Template::transform) that only
/// renames keys never copies literal bytes.
///
/// # Thread Safety
///
/// Rendering takes `&self` and never mutates, so a template behind an `Arc`
/// can be rendered from many threads at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTemplate<K>")]
pub struct Template<K> {
    literals: Arc<Vec<u8>>,
    anchors: Vec<Anchor<K>>,
}

/// Unvalidated serde shape of a [`Template`]
#[derive(Deserialize)]
struct RawTemplate<K> {
    literals: Vec<u8>,
    anchors: Vec<Anchor<K>>,
}

impl<K> TryFrom<RawTemplate<K>> for Template<K> {
    type Error = Error;

    fn try_from(raw: RawTemplate<K>) -> Result<Self> {
        Template::from_parts(raw.literals, raw.anchors)
    }
}

impl<K> Default for Template<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Template<K> {
    /// An empty template
    pub fn new() -> Self {
        Self {
            literals: Arc::new(Vec::new()),
            anchors: Vec::new(),
        }
    }

    /// An empty template with room for `literals` bytes and `anchors` anchors
    pub fn with_capacity(literals: usize, anchors: usize) -> Self {
        Self {
            literals: Arc::new(Vec::with_capacity(literals)),
            anchors: Vec::with_capacity(anchors),
        }
    }

    /// Assemble a template from raw parts, checking anchor order and bounds
    pub fn from_parts(literals: Vec<u8>, anchors: Vec<Anchor<K>>) -> Result<Self> {
        let mut previous = 0;
        for (index, anchor) in anchors.iter().enumerate() {
            if anchor.offset > literals.len() {
                return Err(Error::anchor_owned(format!(
                    "anchor {} at offset {} is past the end of {} literal bytes",
                    index,
                    anchor.offset,
                    literals.len()
                )));
            }
            if anchor.offset < previous {
                return Err(Error::anchor_owned(format!(
                    "anchor {} at offset {} precedes the previous anchor at offset {}",
                    index, anchor.offset, previous
                )));
            }
            previous = anchor.offset;
        }
        Ok(Self {
            literals: Arc::new(literals),
            anchors,
        })
    }

    /// Freeze a single node tree
    pub fn freezing(node: &Node<K>) -> Self
    where
        K: Clone,
    {
        let mut template = Self::new();
        template.freeze(node);
        template
    }

    /// Freeze a sequence of node trees into one buffer
    pub fn freezing_all<'a, I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a Node<K>>,
        K: Clone + 'a,
    {
        let mut template = Self::new();
        template.freeze_all(nodes);
        template
    }

    /// Append a node tree to this template
    ///
    /// If the literal buffer is shared with another template it is copied
    /// first; the other template is unaffected.
    pub fn freeze(&mut self, node: &Node<K>)
    where
        K: Clone,
    {
        let before = self.anchors.len();
        node.render_into(Arc::make_mut(&mut self.literals), &mut self.anchors);
        trace!(
            "froze node: {} literal bytes, {} new anchors",
            self.literals.len(),
            self.anchors.len() - before
        );
    }

    /// Append several node trees to this template, in order
    pub fn freeze_all<'a, I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = &'a Node<K>>,
        K: Clone + 'a,
    {
        let mut sink = Freezer {
            output: Arc::make_mut(&mut self.literals),
            anchors: &mut self.anchors,
        };
        let mut count = 0usize;
        for node in nodes {
            node.emit(&mut sink);
            count += 1;
        }
        trace!(
            "froze {} nodes: {} literal bytes, {} anchors",
            count,
            self.literals.len(),
            self.anchors.len()
        );
    }

    pub fn literals(&self) -> &[u8] {
        &self.literals
    }

    pub fn anchors(&self) -> &[Anchor<K>] {
        &self.anchors
    }

    /// Anchor keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.anchors.iter().map(|anchor| &anchor.key)
    }

    /// Length of the literal buffer in bytes
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// True when there are neither literal bytes nor anchors
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty() && self.literals.is_empty()
    }

    /// True when both templates point at the same literal allocation
    pub fn shares_literals<T>(&self, other: &Template<T>) -> bool {
        Arc::ptr_eq(&self.literals, &other.literals)
    }

    /// Split into the literal buffer and the anchors
    pub fn into_parts(self) -> (Vec<u8>, Vec<Anchor<K>>) {
        let literals = Arc::try_unwrap(self.literals).unwrap_or_else(|shared| (*shared).clone());
        (literals, self.anchors)
    }

    /// Render, resolving each key through `resolve`
    ///
    /// Anchors whose key resolves to `None` are skipped: nothing is written
    /// for them and the literal bytes around them are untouched. Segments for
    /// anchors sharing an offset are written in anchor order.
    pub fn rendered<S, F>(&self, mut resolve: F) -> Vec<u8>
    where
        F: FnMut(&K) -> Option<S>,
        S: AsRef<[u8]>,
    {
        match self.try_rendered(|key| Ok::<_, Infallible>(resolve(key))) {
            Ok(output) => output,
            Err(never) => match never {},
        }
    }

    /// Render with a fallible resolver, returning its first error
    pub fn try_rendered<S, E, F>(&self, resolve: F) -> std::result::Result<Vec<u8>, E>
    where
        F: FnMut(&K) -> std::result::Result<Option<S>, E>,
        S: AsRef<[u8]>,
    {
        let mut output = Vec::with_capacity(self.literals.len());
        self.try_rendered_into(&mut output, resolve)?;
        Ok(output)
    }

    /// Render onto the end of `output`
    pub fn rendered_into<S, F>(&self, output: &mut Vec<u8>, mut resolve: F)
    where
        F: FnMut(&K) -> Option<S>,
        S: AsRef<[u8]>,
    {
        match self.try_rendered_into(output, |key| Ok::<_, Infallible>(resolve(key))) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn try_rendered_into<S, E, F>(&self, output: &mut Vec<u8>, mut resolve: F) -> std::result::Result<(), E>
    where
        F: FnMut(&K) -> std::result::Result<Option<S>, E>,
        S: AsRef<[u8]>,
    {
        let mut start = 0;
        for anchor in &self.anchors {
            let Some(segment) = resolve(&anchor.key)? else {
                continue;
            };
            if start < anchor.offset {
                output.extend_from_slice(&self.literals[start..anchor.offset]);
                start = anchor.offset;
            }
            output.extend_from_slice(segment.as_ref());
        }
        if start < self.literals.len() {
            output.extend_from_slice(&self.literals[start..]);
        }
        Ok(())
    }

    /// Render by looking every key up in `segments`
    pub fn render<V>(&self, segments: &V) -> Vec<u8>
    where
        V: Segments<K> + ?Sized,
    {
        self.rendered(|key| segments.segment(key))
    }

    /// Render by lookup and decode the result as UTF-8
    pub fn render_to_string<V>(&self, segments: &V) -> Result<String>
    where
        V: Segments<K> + ?Sized,
    {
        Ok(String::from_utf8(self.render(segments))?)
    }

    /// Render by lookup straight into a writer
    pub fn write_to<W, V>(&self, writer: &mut W, segments: &V) -> Result<()>
    where
        W: Write + ?Sized,
        V: Segments<K> + ?Sized,
    {
        let mut start = 0;
        for anchor in &self.anchors {
            let Some(segment) = segments.segment(&anchor.key) else {
                continue;
            };
            if start < anchor.offset {
                writer.write_all(&self.literals[start..anchor.offset])?;
                start = anchor.offset;
            }
            writer.write_all(&segment)?;
        }
        if start < self.literals.len() {
            writer.write_all(&self.literals[start..])?;
        }
        Ok(())
    }

    /// Rename every key; literals and offsets are unchanged
    pub fn map<T, F>(&self, mut transform: F) -> Template<T>
    where
        F: FnMut(&K) -> T,
    {
        Template {
            literals: Arc::clone(&self.literals),
            anchors: self
                .anchors
                .iter()
                .map(|anchor| Anchor::new(transform(&anchor.key), anchor.offset))
                .collect(),
        }
    }

    /// Rename every key with a fallible function, returning its first error
    pub fn try_map<T, E, F>(&self, mut transform: F) -> std::result::Result<Template<T>, E>
    where
        F: FnMut(&K) -> std::result::Result<T, E>,
    {
        let anchors = self
            .anchors
            .iter()
            .map(|anchor| Ok(Anchor::new(transform(&anchor.key)?, anchor.offset)))
            .collect::<std::result::Result<Vec<_>, E>>()?;
        Ok(Template {
            literals: Arc::clone(&self.literals),
            anchors,
        })
    }

    /// Rename some keys and inline segments for the others
    ///
    /// While `transform` only returns [`Substitution::Key`], the literal
    /// buffer is shared with `self`. The first [`Substitution::Segment`]
    /// switches to building a new buffer; every later anchor is then placed
    /// at the new buffer's length at the time it is reached. Consecutive
    /// segments at the same offset are concatenated in anchor order.
    pub fn transform<T, S, F>(&self, mut transform: F) -> Template<T>
    where
        F: FnMut(&K) -> Substitution<T, S>,
        S: AsRef<[u8]>,
    {
        match self.try_transform(|key| Ok::<_, Infallible>(transform(key))) {
            Ok(template) => template,
            Err(never) => match never {},
        }
    }

    /// [`transform`](Template::transform) with a fallible function
    pub fn try_transform<T, S, E, F>(&self, mut transform: F) -> std::result::Result<Template<T>, E>
    where
        F: FnMut(&K) -> std::result::Result<Substitution<T, S>, E>,
        S: AsRef<[u8]>,
    {
        let mut iterator = self.anchors.iter();
        let mut anchors: Vec<Anchor<T>> = Vec::with_capacity(self.anchors.len());
        while let Some(anchor) = iterator.next() {
            let segment = match transform(&anchor.key)? {
                Substitution::Key(key) => {
                    anchors.push(Anchor::new(key, anchor.offset));
                    continue;
                }
                Substitution::Segment(segment) => segment,
            };

            debug!(
                "inlining segment at offset {}, rebuilding {} literal bytes",
                anchor.offset,
                self.literals.len()
            );
            let mut literals = Vec::with_capacity(self.literals.len() + segment.as_ref().len());
            let mut source = anchor.offset;
            literals.extend_from_slice(&self.literals[..source]);
            literals.extend_from_slice(segment.as_ref());

            for anchor in iterator.by_ref() {
                if source < anchor.offset {
                    literals.extend_from_slice(&self.literals[source..anchor.offset]);
                    source = anchor.offset;
                }
                match transform(&anchor.key)? {
                    Substitution::Key(key) => anchors.push(Anchor::new(key, literals.len())),
                    Substitution::Segment(segment) => literals.extend_from_slice(segment.as_ref()),
                }
            }
            if source < self.literals.len() {
                literals.extend_from_slice(&self.literals[source..]);
            }
            return Ok(Template {
                literals: Arc::new(literals),
                anchors,
            });
        }

        Ok(Template {
            literals: Arc::clone(&self.literals),
            anchors,
        })
    }
}
