use crate::layout::{Layout, Stroke};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub node_width: f32,
    pub layer_count: usize,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub name: String,
    pub color: String,
    pub layer: usize,
    pub value_in: f32,
    pub value_out: f32,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDump {
    pub source_name: String,
    pub target_name: String,
    pub value: f32,
    pub stroke_width: f32,
    pub path_command: String,
    pub stroke_spec: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                name: node.name.clone(),
                color: node.color.clone(),
                layer: node.layer,
                value_in: node.value_in,
                value_out: node.value_out,
                x0: node.x0,
                y0: node.y0,
                x1: node.x1,
                y1: node.y1,
            })
            .collect();

        let links = layout
            .links
            .iter()
            .map(|link| LinkDump {
                source_name: link.source_name.clone(),
                target_name: link.target_name.clone(),
                value: link.value,
                stroke_width: link.stroke_width,
                path_command: link.path.to_string(),
                stroke_spec: match &link.stroke {
                    Stroke::Solid { color } => color.clone(),
                    Stroke::Gradient(gradient) => format!("url(#{})", gradient.id),
                },
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            node_width: layout.node_width,
            layer_count: layout.layer_count,
            nodes,
            links,
        }
    }
}

/// Writes the dump as pretty JSON to `path`, or stdout when `None`.
pub fn write_layout_dump(path: Option<&Path>, layout: &Layout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
