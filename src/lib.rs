//! Anchor-tracking markup templates
//!
//! This crate renders a tree of markup nodes into bytes while leaving some
//! pieces of the output open as placeholders ("anchors"). A tree is frozen
//! once into a [`Template`], a literal byte buffer plus the offsets where
//! each placeholder belongs, and the template is then rendered as many times
//! as needed with different substitution data. Templates can also be
//! partially resolved with [`Template::transform`], which inlines some
//! placeholders and renames the rest.
//!
//! # Examples
//!
//! ```rust,ignore
//! use dom_template::{Node, Template};
//! use serde_json::json;
//!
//! let card = Node::element("div")
//!     .attribute("class", "card")
//!     .child(Node::element("h2").anchor("title").build())
//!     .child(Node::void_element("img").anchor_attribute("src", "image").build())
//!     .build();
//!
//! let template = Template::freezing(&card);
//!
//! let html = template.render_to_string(&json!({
//!     "title": "Hello World",
//!     "image": "/hello.png"
//! }))?;
//! assert_eq!(html, r#"<div class="card"><h2>Hello World</h2><img src="/hello.png"></div>"#);
//! ```
//!
//! No escaping is ever applied: [`Node::Text`] and substituted segments are
//! written as given.

pub mod builder;
pub mod cache;
pub mod document;
pub mod error;
pub mod node;
pub mod segments;
pub mod template;

// Re-export commonly used types
pub use builder::{ElementBuilder, TemplateBuilder, TemplateConfig, HTML_DOCTYPE};
pub use cache::{CacheConfig, CacheStats, EvictionStrategy, TemplateCache};
pub use document::{ContentType, Document};
pub use error::{Error, Result};
pub use node::{Attribute, AttributeValue, Element, Node, Sink};
pub use segments::{ByStr, FnSegments, Segments, Serialized, ToSegment};
pub use template::{Anchor, Substitution, Template};

#[cfg(feature = "derive")]
pub use dom_template_macros::Segments;
