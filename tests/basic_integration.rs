//! Basic integration tests for freezing and rendering
//!
//! These tests build realistic node trees, freeze them, and check the
//! rendered bytes against the direct serialization of the same tree.

mod common;

use std::collections::HashMap;

use common::{assert_anchor_invariants, count_elements, extract_attrs_by_selector, extract_text_by_selector};
use dom_template::{Document, Node, Serialized, Template, TemplateBuilder, TemplateConfig};
use pretty_assertions::assert_eq;
use serde::Serialize;
use serde_json::json;

fn article() -> Node<&'static str> {
    Node::element("article")
        .attribute("class", "post")
        .child(
            Node::element("header")
                .child(Node::element("h1").anchor("title").build())
                .child(
                    Node::element("a")
                        .anchor_attribute("href", "author_url")
                        .anchor("author")
                        .build(),
                )
                .build(),
        )
        .child(Node::void_element("img").anchor_attribute("src", "cover").flag("loading").build())
        .child(Node::element("section").anchor("body").text("<hr>").anchor("footer").build())
        .build()
}

fn data() -> HashMap<&'static str, &'static str> {
    let mut data = HashMap::new();
    data.insert("title", "Anchors");
    data.insert("author_url", "/people/ada");
    data.insert("author", "Ada");
    data.insert("cover", "/cover.png");
    data.insert("body", "<p>Frozen once.</p>");
    data.insert("footer", "<small>fin</small>");
    data
}

#[test]
fn test_render_matches_direct_serialization() {
    let tree = article();
    let data = data();

    let template = Template::freezing(&tree);
    assert_anchor_invariants(&template);
    assert_eq!(template.anchors().len(), tree.anchor_count());

    let rendered = template.render(&data);
    let direct = tree.rendered_with(|key| data.get(key).copied());
    assert_eq!(String::from_utf8(rendered).unwrap(), String::from_utf8(direct).unwrap());
}

#[test]
fn test_rendered_html_parses_to_expected_tree() {
    let html = Template::freezing(&article()).render_to_string(&data()).unwrap();

    assert_eq!(extract_text_by_selector(&html, "h1"), vec!["Anchors"]);
    assert_eq!(extract_attrs_by_selector(&html, "a", "href"), vec!["/people/ada"]);
    assert_eq!(extract_attrs_by_selector(&html, "img", "src"), vec!["/cover.png"]);
    assert_eq!(count_elements(&html, "section > hr"), 1);
    assert_eq!(count_elements(&html, "section > p"), 1);
}

#[test]
fn test_exact_bytes() {
    let html = Template::freezing(&article()).render_to_string(&data()).unwrap();
    assert_eq!(
        html,
        concat!(
            r#"<article class="post"><header><h1>Anchors</h1><a href="/people/ada">Ada</a></header>"#,
            r#"<img src="/cover.png" loading>"#,
            r#"<section><p>Frozen once.</p><hr><small>fin</small></section></article>"#,
        )
    );
}

#[test]
fn test_unresolved_attribute_anchor_leaves_empty_value() {
    let link: Node<&str> = Node::element("a").anchor_attribute("href", "url").build();
    let template = Template::freezing(&link);

    let html = template.render_to_string(&HashMap::<&str, &str>::new()).unwrap();
    assert_eq!(html, r#"<a href=""></a>"#);
}

#[test]
fn test_same_template_rendered_with_different_data() {
    let template = Template::freezing(&Node::element("li").anchor("name").build());

    let names = ["one", "two", "three"];
    let items: Vec<String> = names
        .iter()
        .map(|name| template.render_to_string(&json!({ "name": name })).unwrap())
        .collect();

    assert_eq!(items, vec!["<li>one</li>", "<li>two</li>", "<li>three</li>"]);
}

#[test]
fn test_render_from_json_values() {
    let template = Template::freezing(
        &Node::element("p")
            .anchor("count")
            .text(" items, published: ")
            .anchor("published")
            .anchor("missing")
            .build(),
    );
    let html = template
        .render_to_string(&json!({ "count": 3, "published": true, "missing": null }))
        .unwrap();
    assert_eq!(html, "<p>3 items, published: true</p>");
}

#[test]
fn test_render_from_serializable_struct() {
    #[derive(Serialize)]
    struct Profile {
        name: String,
        followers: u64,
    }

    let template = Template::freezing(
        &Node::element("span")
            .anchor_attribute("title", "followers")
            .anchor("name")
            .build(),
    );
    let profile = Profile {
        name: "Ada".to_string(),
        followers: 1815,
    };

    let html = template.render_to_string(&Serialized::new(&profile)).unwrap();
    assert_eq!(html, r#"<span title="1815">Ada</span>"#);
}

#[test]
fn test_batch_freezing_with_builder() {
    let head = Node::element("head")
        .child(Node::element("title").anchor("title").build())
        .build();
    let body = Node::element("body").anchor("content").build();

    let template = TemplateBuilder::new()
        .with_config(TemplateConfig::new().with_doctype(true))
        .node(head)
        .node(body)
        .build();
    assert_anchor_invariants(&template);

    let html = template
        .render_to_string(&json!({ "title": "Home", "content": "Welcome" }))
        .unwrap();
    assert_eq!(
        html,
        "<!DOCTYPE html><head><title>Home</title></head><body>Welcome</body>"
    );
}

#[test]
fn test_html_document_wrapping() {
    let template = Template::freezing(&Node::element("main").anchor("content").build());
    let document = Document::html_template(&template, &json!({ "content": "hi" }), Some("home".to_string()));

    assert_eq!(document.as_bytes(), b"<!DOCTYPE html><main>hi</main>");
    assert_eq!(document.content_type().to_string(), "text/html; charset=utf-8");
    assert_eq!(document.tag(), Some("home"));
}

#[test]
fn test_write_to_writer() {
    let template = Template::freezing(&article());
    let mut output = Vec::new();
    template.write_to(&mut output, &data()).unwrap();
    assert_eq!(output, template.render(&data()));
}
