use std::collections::HashMap;

use crate::color::ColorPicker;
use crate::error::{Error, Result};
use crate::ir::{NodeRef, SankeyData};

#[derive(Debug, Clone)]
pub(crate) struct FlowNode {
    pub index: usize,
    pub name: String,
    pub color: String,
    /// Outbound link indices in input order.
    pub source_links: Vec<usize>,
    /// Inbound link indices in input order.
    pub target_links: Vec<usize>,
    pub value_in: f32,
    pub value_out: f32,
    pub layer: usize,
}

impl FlowNode {
    pub fn weight(&self) -> f32 {
        self.value_in.max(self.value_out)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: f32,
}

#[derive(Debug, Clone)]
pub(crate) struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

pub(crate) fn build_graph(data: &SankeyData, colors: &mut ColorPicker) -> Result<FlowGraph> {
    let mut nodes: Vec<FlowNode> = data
        .nodes
        .iter()
        .enumerate()
        .map(|(index, spec)| FlowNode {
            index,
            name: spec
                .name
                .clone()
                .unwrap_or_else(|| format!("Node {index}")),
            color: spec.color.clone().unwrap_or_else(|| colors.next_color()),
            source_links: Vec::new(),
            target_links: Vec::new(),
            value_in: 0.0,
            value_out: 0.0,
            layer: 0,
        })
        .collect();

    let links = resolve_links(data, &nodes)?;

    if nodes.is_empty() || links.is_empty() {
        return Err(Error::EmptyGraph {
            nodes: nodes.len(),
            links: links.len(),
        });
    }

    for (link_idx, link) in links.iter().enumerate() {
        let source = &mut nodes[link.source];
        source.source_links.push(link_idx);
        source.value_out += link.value;
        let target = &mut nodes[link.target];
        target.target_links.push(link_idx);
        target.value_in += link.value;
    }

    log::debug!(
        "built flow graph: {} nodes, {} links",
        nodes.len(),
        links.len()
    );
    Ok(FlowGraph { nodes, links })
}

fn resolve_links(data: &SankeyData, nodes: &[FlowNode]) -> Result<Vec<FlowLink>> {
    // Later duplicates shadow earlier ones.
    let name_to_index: HashMap<&str, usize> = nodes
        .iter()
        .map(|node| (node.name.as_str(), node.index))
        .collect();

    let resolve = |node_ref: &NodeRef| -> Result<usize> {
        match node_ref {
            NodeRef::Name(name) => name_to_index
                .get(name.as_str())
                .copied()
                .ok_or_else(|| Error::UnknownNode { name: name.clone() }),
            NodeRef::Index(index) if *index < nodes.len() => Ok(*index),
            NodeRef::Index(index) => Err(Error::NodeIndexOutOfRange {
                index: *index,
                len: nodes.len(),
            }),
        }
    };

    let mut links = Vec::with_capacity(data.links.len());
    for (link_idx, spec) in data.links.iter().enumerate() {
        let source = resolve(&spec.source)?;
        let target = resolve(&spec.target)?;
        let value = spec.value.as_f32().ok_or_else(|| Error::InvalidValue {
            link: link_idx,
            raw: spec.value.raw(),
        })?;
        links.push(FlowLink {
            source,
            target,
            value,
        });
    }
    Ok(links)
}
