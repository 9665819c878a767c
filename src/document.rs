//! Rendered documents
//!
//! A [`Document`] is a finished byte payload tagged with its content type and
//! an optional caller-defined tag (a version, an etag, a route name).
//! [`Document::html`] prefixes the payload with `<!DOCTYPE html>`.

use std::borrow::Cow;
use std::fmt;

use crate::builder::HTML_DOCTYPE;
use crate::segments::Segments;
use crate::template::Template;

/// Content type of a rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Html,
    Svg,
    Xml,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html; charset=utf-8",
            ContentType::Svg => "image/svg+xml",
            ContentType::Xml => "application/xml",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered byte payload with its content type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    bytes: Vec<u8>,
    content_type: ContentType,
    tag: Option<String>,
}

impl Document {
    /// Wrap `bytes` without any prefix
    pub fn new<B: Into<Vec<u8>>>(bytes: B, content_type: ContentType, tag: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
            tag,
        }
    }

    /// An HTML document: `<!DOCTYPE html>` followed by `payload`
    pub fn html<B: AsRef<[u8]>>(payload: B, tag: Option<String>) -> Self {
        let payload = payload.as_ref();
        let mut bytes = Vec::with_capacity(HTML_DOCTYPE.len() + payload.len());
        bytes.extend_from_slice(HTML_DOCTYPE);
        bytes.extend_from_slice(payload);
        Self::new(bytes, ContentType::Html, tag)
    }

    /// Render `template` from `segments` and wrap it as an HTML document
    pub fn html_template<K, V>(template: &Template<K>, segments: &V, tag: Option<String>) -> Self
    where
        V: Segments<K> + ?Sized,
    {
        let mut bytes = Vec::with_capacity(HTML_DOCTYPE.len() + template.len());
        bytes.extend_from_slice(HTML_DOCTYPE);
        template.rendered_into(&mut bytes, |key| segments.segment(key));
        Self::new(bytes, ContentType::Html, tag)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use serde_json::json;

    #[test]
    fn test_html_prefixes_doctype() {
        let document = Document::html(b"<p>hi</p>", Some("v1".to_string()));
        assert_eq!(document.as_bytes(), b"<!DOCTYPE html><p>hi</p>");
        assert_eq!(&document.as_bytes()[..15], HTML_DOCTYPE);
        assert_eq!(document.content_type(), ContentType::Html);
        assert_eq!(document.tag(), Some("v1"));
    }

    #[test]
    fn test_html_template() {
        let template = Template::freezing(&Node::element("body").anchor("content").build());
        let document = Document::html_template(&template, &json!({"content": "ok"}), None);
        assert_eq!(document.to_string_lossy(), "<!DOCTYPE html><body>ok</body>");
        assert_eq!(document.tag(), None);
    }

    #[test]
    fn test_content_type_display() {
        assert_eq!(ContentType::Html.to_string(), "text/html; charset=utf-8");
        assert_eq!(ContentType::Svg.as_str(), "image/svg+xml");
    }

    #[test]
    fn test_plain_document_has_no_prefix() {
        let document = Document::new("<svg/>", ContentType::Svg, None);
        assert_eq!(document.into_bytes(), b"<svg/>");
    }
}
