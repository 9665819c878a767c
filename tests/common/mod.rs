//! Shared helpers for the integration tests
//!
//! Rendered output is parsed back with `dom_query` so tests can assert on the
//! element tree instead of on exact bytes where whitespace does not matter.

#![allow(dead_code)]

use dom_query::Document;

/// Normalize HTML for comparison by parsing and re-serializing
pub fn normalize_html(html: &str) -> String {
    Document::from(html).html().trim().to_string()
}

/// Extract text content from elements matching a selector
pub fn extract_text_by_selector(html: &str, selector: &str) -> Vec<String> {
    let doc = Document::from(html);
    let selection = doc.select(selector);

    selection
        .nodes()
        .iter()
        .map(|node| node.text().trim().to_string())
        .collect()
}

/// Extract attribute values from elements matching a selector
pub fn extract_attrs_by_selector(html: &str, selector: &str, attr: &str) -> Vec<String> {
    let doc = Document::from(html);
    let selection = doc.select(selector);

    selection
        .nodes()
        .iter()
        .filter_map(|node| node.attr(attr).map(|v| v.to_string()))
        .collect()
}

/// Count elements matching a selector
pub fn count_elements(html: &str, selector: &str) -> usize {
    Document::from(html).select(selector).nodes().len()
}

/// Panic unless anchor offsets never decrease and stay inside the buffer
pub fn assert_anchor_invariants<K>(template: &dom_template::Template<K>) {
    let mut previous = 0;
    for anchor in template.anchors() {
        assert!(anchor.offset >= previous, "offset {} after {}", anchor.offset, previous);
        assert!(anchor.offset <= template.len(), "offset {} past end {}", anchor.offset, template.len());
        previous = anchor.offset;
    }
}
