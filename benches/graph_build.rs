//! Performance benchmarks for graph construction
//!
//! A synthetic container sized like a large production export:
//! - placeholder scanning over nested parameter lists
//! - trigger-ID resolution across firing and blocking lists
//! - variable-to-variable references and back-edge inversion
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gtm_graph::{build_graph, GraphBuilder};
use serde_json::{json, Value};

fn synthetic_container(num_tags: usize, num_triggers: usize, num_variables: usize) -> Value {
    let variables = (0..num_variables)
        .map(|i| {
            json!({
                "variableId": (1000 + i).to_string(),
                "name": format!("Var {i}"),
                "type": "jsm",
                "parameter": [
                    {"type": "TEMPLATE", "key": "javascript",
                     "value": format!("function() {{ return {{{{Var {}}}}} + {{{{Page Path}}}}; }}", (i + 1) % num_variables)}
                ]
            })
        })
        .collect::<Vec<_>>();
    let triggers = (0..num_triggers)
        .map(|i| {
            json!({
                "triggerId": 100 + i,
                "name": format!("Trigger {i}"),
                "type": "CUSTOM_EVENT",
                "filter": [{"type": "EQUALS", "parameter": [
                    {"key": "arg0", "value": format!("{{{{Var {}}}}}", i % num_variables)},
                    {"key": "arg1", "value": "{{_event}}"}
                ]}]
            })
        })
        .collect::<Vec<_>>();
    let tags = (0..num_tags)
        .map(|i| {
            json!({
                "tagId": (10_000 + i).to_string(),
                "name": format!("Tag {i}"),
                "type": "html",
                "parameter": [
                    {"type": "TEMPLATE", "key": "html",
                     "value": format!("<script>{{{{Var {}}}}}{{{{Var {}}}}}{{{{Click URL}}}}</script>", i % num_variables, (i * 7) % num_variables)},
                    {"type": "LIST", "key": "list", "list": [{"type": "MAP", "map": [
                        {"key": "value", "value": format!("{{{{Var {}}}}}", (i * 3) % num_variables)}
                    ]}]}
                ],
                "firingTriggerId": [100 + i % num_triggers, "2147479553"],
                "blockingTriggerId": [(100 + (i + 1) % num_triggers).to_string()]
            })
        })
        .collect::<Vec<_>>();

    json!({
        "containerVersion": {
            "container": {"enabledBuiltInVariable": ["PAGE_URL", "PAGE_PATH", "CLICK_URL", "EVENT"]},
            "tag": tags,
            "trigger": triggers,
            "variable": variables
        }
    })
}

fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    for size in [50usize, 500] {
        let payload = synthetic_container(size, size / 2, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| build_graph(black_box(payload)).unwrap())
        });
    }
    group.finish();
}

fn bench_build_from_str(c: &mut Criterion) {
    let payload = synthetic_container(500, 250, 500).to_string();
    let builder = GraphBuilder::default();
    c.bench_function("build_graph_from_str", |b| {
        b.iter(|| builder.build_str(black_box(&payload)).unwrap())
    });
}

fn bench_queries(c: &mut Criterion) {
    let graph = build_graph(&synthetic_container(500, 250, 500)).unwrap();
    c.bench_function("snapshot", |b| b.iter(|| black_box(graph.snapshot())));
    c.bench_function("to_petgraph", |b| b.iter(|| black_box(graph.to_petgraph())));
}

criterion_group!(
    benches,
    bench_build_graph,
    bench_build_from_str,
    bench_queries
);
criterion_main!(benches);
