use serde::Serialize;
use std::fmt;

/// A positioned node. Extents are half-open: `[x0, x1)` and `[y0, y1)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub index: usize,
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

impl NodeLayout {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center_y(&self) -> f32 {
        self.y0 + self.height() / 2.0
    }

    /// Flow weight used for sizing: the larger of inbound and outbound totals.
    pub fn weight(&self) -> f32 {
        self.value_in.max(self.value_out)
    }
}

/// Cubic connector from `start` to `end` with horizontal control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkPath {
    pub start: (f32, f32),
    pub control_start: (f32, f32),
    pub control_end: (f32, f32),
    pub end: (f32, f32),
}

impl fmt::Display for LinkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M{},{} C{},{} {},{} {},{}",
            self.start.0,
            self.start.1,
            self.control_start.0,
            self.control_start.1,
            self.control_end.0,
            self.control_end.1,
            self.end.0,
            self.end.1
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub id: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Stroke {
    Solid { color: String },
    Gradient(Gradient),
}

impl Stroke {
    pub fn gradient(&self) -> Option<&Gradient> {
        match self {
            Stroke::Gradient(gradient) => Some(gradient),
            Stroke::Solid { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkLayout {
    pub index: usize,
    pub source: usize,
    pub target: usize,
    pub source_name: String,
    pub target_name: String,
    pub value: f32,
    pub stroke_width: f32,
    pub path: LinkPath,
    pub stroke: Stroke,
}

/// Finished layout handed to a rendering backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub node_width: f32,
    pub layer_count: usize,
    pub nodes: Vec<NodeLayout>,
    pub links: Vec<LinkLayout>,
}

impl Layout {
    /// Looks a node up by name; duplicates resolve to the last one, as links do.
    pub fn node(&self, name: &str) -> Option<&NodeLayout> {
        self.nodes.iter().rev().find(|node| node.name == name)
    }

    /// Nodes of one layer in stacking order.
    pub fn layer(&self, layer: usize) -> Vec<&NodeLayout> {
        self.nodes.iter().filter(|node| node.layer == layer).collect()
    }
}
