use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dom_template::{Node, Substitution, Template, TemplateCache};
use serde_json::{json, Value};

fn generate_article(items: usize) -> Node<String> {
    Node::element("article")
        .attribute("class", "post")
        .child(
            Node::element("header")
                .child(Node::element("h1").anchor("headline".to_string()).build())
                .child(
                    Node::element("a")
                        .anchor_attribute("href", "author_url".to_string())
                        .anchor("author".to_string())
                        .build(),
                )
                .build(),
        )
        .child(Node::element("ul").children((0..items).map(|index| {
            Node::element("li")
                .attribute("class", "tag")
                .anchor(format!("tag{}", index))
                .build()
        })).build())
        .child(Node::element("div").anchor("body".to_string()).build())
        .build()
}

fn generate_data(items: usize) -> Value {
    let mut data = json!({
        "headline": "Benchmarking anchors",
        "author_url": "/people/ada",
        "author": "Ada",
        "body": "<p>Rendered from a frozen buffer.</p>"
    });
    for index in 0..items {
        data[format!("tag{}", index)] = json!(format!("tag number {}", index));
    }
    data
}

fn bench_freezing(c: &mut Criterion) {
    let mut group = c.benchmark_group("freeze");
    for items in [1, 10, 100] {
        let tree = generate_article(items);
        group.bench_with_input(BenchmarkId::from_parameter(items), &tree, |b, tree| {
            b.iter(|| Template::freezing(black_box(tree)))
        });
    }
    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for items in [1, 10, 100] {
        let template = Template::freezing(&generate_article(items));
        let data = generate_data(items);

        group.bench_with_input(BenchmarkId::new("frozen", items), &items, |b, _| {
            b.iter(|| template.render(black_box(&data)))
        });

        // Baseline: serialize the whole tree on every render
        let tree = generate_article(items);
        group.bench_with_input(BenchmarkId::new("direct", items), &items, |b, _| {
            b.iter(|| {
                tree.rendered_with(|key| match black_box(&data).get(key.as_str()) {
                    Some(Value::String(s)) => Some(s.as_bytes()),
                    _ => None,
                })
            })
        });
    }
    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let template = Template::freezing(&generate_article(100));

    c.bench_function("transform_rename_only", |b| {
        b.iter(|| template.transform(|key| Substitution::<String, &[u8]>::Key(black_box(key.clone()))))
    });

    c.bench_function("transform_partial", |b| {
        b.iter(|| {
            template.transform(|key| {
                if key.starts_with("tag") {
                    Substitution::Segment(key.clone().into_bytes())
                } else {
                    Substitution::Key(key.clone())
                }
            })
        })
    });

    c.bench_function("map", |b| b.iter(|| template.map(|key| black_box(key.len()))));
}

fn bench_cache(c: &mut Criterion) {
    let cache: TemplateCache<&str, String> = TemplateCache::new();
    cache.insert("article", Template::freezing(&generate_article(10)));

    c.bench_function("cache_hit", |b| b.iter(|| cache.get(black_box(&"article"))));
}

criterion_group!(benches, bench_freezing, bench_rendering, bench_transform, bench_cache);
criterion_main!(benches);
