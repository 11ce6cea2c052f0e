use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sankey_flow::config::{LayoutConfig, LinkAnchor};
use sankey_flow::layout::compute_layout;
use sankey_flow::parser::parse_sankey;
use sankey_flow::render::{RenderContext, render_svg};
use sankey_flow::theme::Theme;
use std::hint::black_box;

/// `layers` columns of `width` nodes; every node feeds every node in the next column.
fn layered_source(layers: usize, width: usize) -> String {
    let mut out = String::from("sankey-beta\n");
    for layer in 0..layers.saturating_sub(1) {
        for i in 0..width {
            for j in 0..width {
                let value = 1 + (i * 7 + j * 3 + layer) % 11;
                out.push_str(&format!("L{}N{},L{}N{},{}\n", layer, i, layer + 1, j, value));
            }
        }
    }
    out
}

fn bench_config() -> LayoutConfig {
    LayoutConfig {
        color_seed: Some(42),
        ..LayoutConfig::default()
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (layers, width) in [(4usize, 4usize), (8, 8), (16, 12)] {
        let name = format!("layered_{}x{}", layers, width);
        let input = layered_source(layers, width);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let parsed = parse_sankey(black_box(data)).expect("parse failed");
                black_box(parsed.data.links.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let center = bench_config();
    let stacked = LayoutConfig {
        link_anchor: LinkAnchor::Stacked,
        ..bench_config()
    };
    for (layers, width) in [(4usize, 4usize), (8, 8), (16, 12)] {
        let name = format!("layered_{}x{}", layers, width);
        let parsed = parse_sankey(&layered_source(layers, width)).expect("parse failed");
        group.bench_with_input(BenchmarkId::new("center", &name), &parsed.data, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data), &center).expect("layout failed");
                black_box(layout.nodes.len());
            });
        });
        group.bench_with_input(BenchmarkId::new("stacked", &name), &parsed.data, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data), &stacked).expect("layout failed");
                black_box(layout.links.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let theme = Theme::modern();
    let ctx = RenderContext {
        tooltips: true,
        ..Default::default()
    };
    for (layers, width) in [(4usize, 4usize), (16, 12)] {
        let name = format!("layered_{}x{}", layers, width);
        let parsed = parse_sankey(&layered_source(layers, width)).expect("parse failed");
        let layout = compute_layout(&parsed.data, &bench_config()).expect("layout failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &layout, |b, layout| {
            b.iter(|| {
                let svg = render_svg(black_box(layout), &theme, &ctx);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_layout, bench_render);
criterion_main!(benches);
