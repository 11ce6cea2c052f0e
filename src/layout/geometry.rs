use crate::config::{LayoutConfig, LinkAnchor};

use super::graph::{FlowGraph, FlowNode};
use super::packing::Span;
use super::types::{Gradient, LinkLayout, LinkPath, Stroke};

fn interpolate(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// S-curve from `(x0, y0)` to `(x1, y1)`; both control points sit at the
/// fractions `curvature` and `1 - curvature` of the horizontal distance.
pub fn link_path(x0: f32, y0: f32, x1: f32, y1: f32, curvature: f32) -> LinkPath {
    let x2 = interpolate(x0, x1, curvature);
    let x3 = interpolate(x0, x1, 1.0 - curvature);
    LinkPath {
        start: (x0, y0),
        control_start: (x2, y0),
        control_end: (x3, y1),
        end: (x1, y1),
    }
}

pub(crate) fn gradient_id(source: usize, target: usize, link_idx: usize) -> String {
    format!("gradient-{source}-{target}-{link_idx}")
}

pub(crate) fn resolve_stroke(link_idx: usize, source: &FlowNode, target: &FlowNode) -> Stroke {
    if source.color == target.color {
        return Stroke::Solid {
            color: source.color.clone(),
        };
    }
    Stroke::Gradient(Gradient {
        id: gradient_id(source.index, target.index, link_idx),
        from: source.color.clone(),
        to: target.color.clone(),
    })
}

/// Vertical anchor of every link at its source and target node.
fn link_anchors(
    graph: &FlowGraph,
    spans: &[Span],
    widths: &[f32],
    anchor: LinkAnchor,
) -> Vec<(f32, f32)> {
    let center = |idx: usize| spans[idx].y0 + (spans[idx].y1 - spans[idx].y0) / 2.0;
    match anchor {
        LinkAnchor::Center => graph
            .links
            .iter()
            .map(|link| (center(link.source), center(link.target)))
            .collect(),
        LinkAnchor::Stacked => {
            let mut anchors = vec![(0.0f32, 0.0f32); graph.links.len()];
            for node in &graph.nodes {
                let mut offset = 0.0f32;
                for &link_idx in &node.source_links {
                    anchors[link_idx].0 = spans[node.index].y0 + offset + widths[link_idx] / 2.0;
                    offset += widths[link_idx];
                }
                let mut offset = 0.0f32;
                for &link_idx in &node.target_links {
                    anchors[link_idx].1 = spans[node.index].y0 + offset + widths[link_idx] / 2.0;
                    offset += widths[link_idx];
                }
            }
            anchors
        }
    }
}

pub(crate) fn build_links(
    graph: &FlowGraph,
    spans: &[Span],
    node_x: &[f32],
    config: &LayoutConfig,
) -> Vec<LinkLayout> {
    let widths: Vec<f32> = graph
        .links
        .iter()
        .map(|link| link.value * config.link_width_scale)
        .collect();
    let anchors = link_anchors(graph, spans, &widths, config.link_anchor);

    graph
        .links
        .iter()
        .enumerate()
        .map(|(link_idx, link)| {
            let source = &graph.nodes[link.source];
            let target = &graph.nodes[link.target];
            let (sy, ty) = anchors[link_idx];
            let sx = node_x[link.source] + config.node_width;
            let tx = node_x[link.target];
            LinkLayout {
                index: link_idx,
                source: link.source,
                target: link.target,
                source_name: source.name.clone(),
                target_name: target.name.clone(),
                value: link.value,
                stroke_width: widths[link_idx],
                path: link_path(sx, sy, tx, ty, config.curvature),
                stroke: resolve_stroke(link_idx, source, target),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorPicker;
    use crate::ir::{LinkSpec, NodeSpec, SankeyData};
    use crate::layout::graph::build_graph;

    #[test]
    fn control_points_sit_at_horizontal_midpoint() {
        let path = link_path(20.0, 50.0, 100.0, 150.0, 0.5);
        assert_eq!(path.control_start, (60.0, 50.0));
        assert_eq!(path.control_end, (60.0, 150.0));
        assert_eq!(path.start, (20.0, 50.0));
        assert_eq!(path.end, (100.0, 150.0));
    }

    #[test]
    fn curvature_moves_control_points() {
        let path = link_path(0.0, 0.0, 100.0, 10.0, 0.25);
        assert_eq!(path.control_start.0, 25.0);
        assert_eq!(path.control_end.0, 75.0);
    }

    fn two_node_graph(from: &str, to: &str) -> FlowGraph {
        let data = SankeyData {
            nodes: vec![
                NodeSpec::named("A").with_color(from),
                NodeSpec::named("B").with_color(to),
            ],
            links: vec![LinkSpec::new("A", "B", 4.0)],
        };
        build_graph(&data, &mut ColorPicker::new(Some(3))).unwrap()
    }

    #[test]
    fn matching_colors_give_solid_stroke() {
        let graph = two_node_graph("#336699", "#336699");
        let stroke = resolve_stroke(0, &graph.nodes[0], &graph.nodes[1]);
        assert_eq!(
            stroke,
            Stroke::Solid {
                color: "#336699".to_string()
            }
        );
    }

    #[test]
    fn differing_colors_give_gradient() {
        let graph = two_node_graph("#ff0000", "#0000ff");
        let stroke = resolve_stroke(0, &graph.nodes[0], &graph.nodes[1]);
        let gradient = stroke.gradient().unwrap();
        assert_eq!(gradient.id, "gradient-0-1-0");
        assert_eq!(gradient.from, "#ff0000");
        assert_eq!(gradient.to, "#0000ff");
    }

    #[test]
    fn stacked_anchors_offset_by_stroke_width() {
        let data = SankeyData {
            nodes: vec![NodeSpec::named("A"), NodeSpec::named("B"), NodeSpec::named("C")],
            links: vec![LinkSpec::new("A", "B", 10.0), LinkSpec::new("A", "C", 30.0)],
        };
        let graph = build_graph(&data, &mut ColorPicker::new(Some(3))).unwrap();
        let spans = vec![
            Span { y0: 0.0, y1: 40.0 },
            Span { y0: 0.0, y1: 10.0 },
            Span { y0: 20.0, y1: 50.0 },
        ];
        let widths = vec![10.0, 30.0];
        let stacked = link_anchors(&graph, &spans, &widths, LinkAnchor::Stacked);
        assert_eq!(stacked, vec![(5.0, 5.0), (25.0, 35.0)]);
        let centered = link_anchors(&graph, &spans, &widths, LinkAnchor::Center);
        assert_eq!(centered, vec![(20.0, 5.0), (20.0, 35.0)]);
    }
}
