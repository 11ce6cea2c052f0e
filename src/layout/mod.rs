mod geometry;
mod graph;
mod layers;
mod packing;
pub(crate) mod types;
pub use geometry::link_path;
pub use types::*;

use crate::color::ColorPicker;
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::ir::SankeyData;
use std::thread::{self, JoinHandle};

use geometry::build_links;
use graph::build_graph;
use layers::assign_layers;
use packing::{PackParams, pack_layers};

/// Runs the whole pipeline: build, layer, pack, then connect.
///
/// Any failing stage aborts the layout; there is no partial result.
pub fn compute_layout(data: &SankeyData, config: &LayoutConfig) -> Result<Layout> {
    config.validate()?;
    let mut colors = ColorPicker::new(config.color_seed);
    let mut graph = build_graph(data, &mut colors)?;
    let max_layer = assign_layers(&mut graph)?;
    let layer_count = max_layer + 1;

    let x_scale = if max_layer > 0 {
        (config.width - config.node_width) / max_layer as f32
    } else {
        0.0
    };
    let node_x: Vec<f32> = graph
        .nodes
        .iter()
        .map(|node| node.layer as f32 * x_scale)
        .collect();

    let spans = pack_layers(&graph, layer_count, PackParams::from(config))?;
    let links = build_links(&graph, &spans, &node_x, config);

    let nodes: Vec<NodeLayout> = graph
        .nodes
        .iter()
        .map(|node| {
            let span = spans[node.index];
            let x0 = node_x[node.index];
            NodeLayout {
                index: node.index,
                name: node.name.clone(),
                color: node.color.clone(),
                layer: node.layer,
                value_in: node.value_in,
                value_out: node.value_out,
                x0,
                y0: span.y0,
                x1: x0 + config.node_width,
                y1: span.y1,
            }
        })
        .collect();

    let content_height = nodes.iter().map(|node| node.y1).fold(0.0, f32::max);
    if content_height > config.height {
        log::debug!(
            "layout overflows canvas height: {content_height} > {}",
            config.height
        );
    }

    Ok(Layout {
        width: config.width,
        height: config.height.max(content_height),
        node_width: config.node_width,
        layer_count,
        nodes,
        links,
    })
}

/// Computes a layout on a worker thread from an owned snapshot of the input.
pub fn spawn_layout(data: SankeyData, config: LayoutConfig) -> JoinHandle<Result<Layout>> {
    thread::spawn(move || compute_layout(&data, &config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkAnchor;
    use crate::error::{Error, ErrorKind};
    use crate::ir::{LinkSpec, NodeSpec};

    fn config() -> LayoutConfig {
        LayoutConfig {
            width: 600.0,
            height: 600.0,
            color_seed: Some(11),
            ..LayoutConfig::default()
        }
    }

    fn fan_out() -> SankeyData {
        SankeyData {
            nodes: vec![
                NodeSpec::named("Source").with_color("#444444"),
                NodeSpec::named("A").with_color("#444444"),
                NodeSpec::named("B").with_color("#aa0000"),
                NodeSpec::named("C").with_color("#00aa00"),
            ],
            links: vec![
                LinkSpec::new("Source", "A", 10.0),
                LinkSpec::new("Source", "B", 20.0),
                LinkSpec::new("Source", "C", 30.0),
            ],
        }
    }

    #[test]
    fn fan_out_packs_second_column_proportionally() {
        let layout = compute_layout(&fan_out(), &config()).unwrap();
        assert_eq!(layout.layer_count, 2);
        let column = layout.layer(1);
        let heights: Vec<f32> = column.iter().map(|node| node.height()).collect();
        assert!((heights[0] - 100.0).abs() < 1e-3);
        assert!((heights[1] - 200.0).abs() < 1e-3);
        assert!((heights[2] - 300.0).abs() < 1e-3);
        assert!((column[1].y0 - 110.0).abs() < 1e-3);
        assert!((column[2].y0 - 320.0).abs() < 1e-3);
        assert!((layout.height - 620.0).abs() < 1e-3);
    }

    #[test]
    fn columns_span_the_canvas_width() {
        let layout = compute_layout(&fan_out(), &config()).unwrap();
        let source = layout.node("Source").unwrap();
        let a = layout.node("A").unwrap();
        assert_eq!(source.x0, 0.0);
        assert_eq!(a.x0, 580.0);
        assert_eq!(a.x1, 600.0);
        for node in &layout.nodes {
            assert_eq!(node.width(), 20.0);
            assert!(node.y1 > node.y0);
        }
    }

    #[test]
    fn links_anchor_at_node_centers() {
        let layout = compute_layout(&fan_out(), &config()).unwrap();
        let source = layout.node("Source").unwrap();
        for link in &layout.links {
            let target = &layout.nodes[link.target];
            assert_eq!(link.path.start, (source.x1, source.center_y()));
            assert_eq!(link.path.end, (target.x0, target.center_y()));
            assert_eq!(link.stroke_width, link.value);
        }
    }

    #[test]
    fn stacked_links_offset_by_cumulative_width() {
        let stacked = LayoutConfig {
            link_anchor: LinkAnchor::Stacked,
            ..config()
        };
        let layout = compute_layout(&fan_out(), &stacked).unwrap();
        let source = layout.node("Source").unwrap();
        let starts: Vec<(f32, f32)> = layout.links.iter().map(|link| link.path.start).collect();
        assert_eq!(
            starts,
            vec![(source.x1, 5.0), (source.x1, 20.0), (source.x1, 45.0)]
        );
        for (link, expected_y) in layout.links.iter().zip([5.0, 120.0, 335.0]) {
            let target = &layout.nodes[link.target];
            assert_eq!(link.path.end.0, target.x0);
            assert!((link.path.end.1 - expected_y).abs() < 1e-3);
        }
    }

    #[test]
    fn zero_min_node_height_is_rejected_before_packing() {
        let data = SankeyData {
            nodes: vec![NodeSpec::named("A"), NodeSpec::named("B"), NodeSpec::named("Idle")],
            links: vec![LinkSpec::new("A", "B", 5.0)],
        };
        let flat = LayoutConfig {
            min_node_height: 0.0,
            ..config()
        };
        let err = compute_layout(&data, &flat).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);

        let layout = compute_layout(&data, &config()).unwrap();
        let idle = layout.node("Idle").unwrap();
        assert!(idle.y1 > idle.y0);
    }

    #[test]
    fn negative_padding_is_rejected_before_packing() {
        let data = SankeyData {
            nodes: vec![NodeSpec::named("A"), NodeSpec::named("B"), NodeSpec::named("C")],
            links: vec![LinkSpec::new("A", "C", 5.0), LinkSpec::new("B", "C", 5.0)],
        };
        let squeezed = LayoutConfig {
            node_padding: -50.0,
            ..config()
        };
        let err = compute_layout(&data, &squeezed).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                option: "nodePadding",
                ..
            }
        ));

        let layout = compute_layout(&data, &config()).unwrap();
        let column = layout.layer(0);
        assert!(column[0].y1 <= column[1].y0);
    }

    #[test]
    fn oversized_node_width_is_rejected() {
        let wide = LayoutConfig {
            node_width: 700.0,
            ..config()
        };
        let err = compute_layout(&fan_out(), &wide).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn name_lookup_matches_link_resolution_for_duplicates() {
        let data = SankeyData {
            nodes: vec![NodeSpec::named("A"), NodeSpec::named("B"), NodeSpec::named("A")],
            links: vec![LinkSpec::new("B", "A", 3.0)],
        };
        let layout = compute_layout(&data, &config()).unwrap();
        let a = layout.node("A").unwrap();
        assert_eq!(a.index, layout.links[0].target);
        assert_eq!(a.value_in, 3.0);
    }

    #[test]
    fn strokes_depend_on_endpoint_colors() {
        let layout = compute_layout(&fan_out(), &config()).unwrap();
        assert_eq!(
            layout.links[0].stroke,
            Stroke::Solid {
                color: "#444444".to_string()
            }
        );
        let ids: Vec<&str> = layout.links[1..]
            .iter()
            .map(|link| link.stroke.gradient().unwrap().id.as_str())
            .collect();
        assert_eq!(ids, vec!["gradient-0-2-1", "gradient-0-3-2"]);
    }

    #[test]
    fn cycles_abort_the_layout() {
        let data = SankeyData {
            nodes: vec![NodeSpec::named("A"), NodeSpec::named("B")],
            links: vec![LinkSpec::new("A", "B", 1.0), LinkSpec::new("B", "A", 1.0)],
        };
        let err = compute_layout(&data, &config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Graph);
    }

    #[test]
    fn zero_flow_layer_aborts_the_layout() {
        let data = SankeyData {
            nodes: vec![NodeSpec::named("A"), NodeSpec::named("B")],
            links: vec![LinkSpec::new("A", "B", 0.0)],
        };
        let err = compute_layout(&data, &config()).unwrap_err();
        assert_eq!(err, Error::ZeroFlowLayer { layer: 0 });
    }

    #[test]
    fn seeded_layouts_are_reproducible() {
        let data = SankeyData {
            nodes: vec![NodeSpec::named("A"), NodeSpec::named("B"), NodeSpec::named("C")],
            links: vec![LinkSpec::new("A", "B", 3.0), LinkSpec::new("B", "C", 2.0)],
        };
        let first = compute_layout(&data, &config()).unwrap();
        let second = compute_layout(&data, &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn worker_returns_the_same_layout() {
        let data = fan_out();
        let expected = compute_layout(&data, &config()).unwrap();
        let handle = spawn_layout(data, config());
        let layout = handle.join().unwrap().unwrap();
        assert_eq!(layout, expected);
    }
}
