use crate::config::LayoutConfig;
use crate::error::{Error, Result};

use super::graph::FlowGraph;

/// Vertical extent `[y0, y1)` of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Span {
    pub y0: f32,
    pub y1: f32,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PackParams {
    pub total_height: f32,
    pub padding: f32,
    pub min_height: f32,
}

impl From<&LayoutConfig> for PackParams {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            total_height: config.height,
            padding: config.node_padding,
            min_height: config.min_node_height,
        }
    }
}

/// Stacks one layer top-down with heights proportional to `weights`.
///
/// The usable height grows past `total_height` when the minimum heights plus
/// padding do not fit, so callers needing a hard bound must check the result.
pub(crate) fn pack_layer(layer: usize, weights: &[f32], params: PackParams) -> Result<Vec<Span>> {
    if weights.is_empty() {
        return Ok(Vec::new());
    }
    let total_weight: f32 = weights.iter().sum();
    if total_weight == 0.0 {
        return Err(Error::ZeroFlowLayer { layer });
    }

    let count = weights.len() as f32;
    let min_required = params.min_height * count + params.padding * (count - 1.0);
    let usable = params.total_height.max(min_required);

    let mut spans = Vec::with_capacity(weights.len());
    let mut y = 0.0f32;
    for &weight in weights {
        let height = (weight / total_weight * usable).max(params.min_height);
        spans.push(Span { y0: y, y1: y + height });
        y += height + params.padding;
    }
    Ok(spans)
}

/// Groups nodes by layer in input order and packs every layer.
pub(crate) fn pack_layers(
    graph: &FlowGraph,
    layer_count: usize,
    params: PackParams,
) -> Result<Vec<Span>> {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
    for node in &graph.nodes {
        members[node.layer].push(node.index);
    }

    let mut spans = vec![Span { y0: 0.0, y1: 0.0 }; graph.nodes.len()];
    for (layer, node_indices) in members.iter().enumerate() {
        let weights: Vec<f32> = node_indices
            .iter()
            .map(|&idx| graph.nodes[idx].weight())
            .collect();
        let packed = pack_layer(layer, &weights, params)?;
        for (&idx, span) in node_indices.iter().zip(packed) {
            log::trace!(
                "layer {layer}: {} -> [{}, {})",
                graph.nodes[idx].name,
                span.y0,
                span.y1
            );
            spans[idx] = span;
        }
    }
    Ok(spans)
}
