use crate::error::{Error, Result};

use super::graph::FlowGraph;

/// Longest-path layering by repeated relaxation until a pass changes nothing.
///
/// An acyclic graph of `n` nodes settles within `n` passes; anything still
/// moving after that must contain a cycle. Returns the largest layer.
pub(crate) fn assign_layers(graph: &mut FlowGraph) -> Result<usize> {
    for node in &mut graph.nodes {
        node.layer = 0;
    }

    let max_passes = graph.nodes.len().max(1);
    for pass in 0..max_passes {
        let mut changed = false;
        for node_idx in 0..graph.nodes.len() {
            let layer = graph.nodes[node_idx].layer;
            for link_pos in 0..graph.nodes[node_idx].source_links.len() {
                let link_idx = graph.nodes[node_idx].source_links[link_pos];
                let target_idx = graph.links[link_idx].target;
                let target = &mut graph.nodes[target_idx];
                if target.layer <= layer {
                    target.layer = layer + 1;
                    changed = true;
                }
            }
        }
        if !changed {
            let max_layer = graph.nodes.iter().map(|node| node.layer).max().unwrap_or(0);
            log::debug!(
                "layers settled after {} passes, {} columns",
                pass + 1,
                max_layer + 1
            );
            return Ok(max_layer);
        }
    }

    Err(Error::Cycle {
        passes: max_passes,
    })
}
