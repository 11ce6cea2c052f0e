use serde::{Deserialize, Serialize};

/// Caller-supplied diagram data: nodes plus value-bearing links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyData {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub source: NodeRef,
    pub target: NodeRef,
    pub value: LinkValue,
}

/// A link endpoint: either a node name or a position in the node list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkValue {
    Number(f32),
    Text(String),
}

impl LinkValue {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            LinkValue::Number(val) => Some(*val).filter(|val| val.is_finite()),
            LinkValue::Text(val) => {
                let trimmed = val.trim();
                // Empty text counts as zero.
                if trimmed.is_empty() {
                    return Some(0.0);
                }
                trimmed.parse::<f32>().ok().filter(|val| val.is_finite())
            }
        }
    }

    pub fn raw(&self) -> String {
        match self {
            LinkValue::Number(val) => format!("{}", val),
            LinkValue::Text(val) => val.clone(),
        }
    }
}

impl SankeyData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the node named `name`, appending it if missing.
    pub fn ensure_node(&mut self, name: &str) -> usize {
        if let Some(idx) = self
            .nodes
            .iter()
            .position(|node| node.name.as_deref() == Some(name))
        {
            return idx;
        }
        self.nodes.push(NodeSpec {
            name: Some(name.to_string()),
            color: None,
        });
        self.nodes.len() - 1
    }

    pub fn push_link(&mut self, source: &str, target: &str, value: f32) {
        self.links.push(LinkSpec {
            source: NodeRef::Name(source.to_string()),
            target: NodeRef::Name(target.to_string()),
            value: LinkValue::Number(value),
        });
    }
}

impl NodeSpec {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            color: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

impl LinkSpec {
    pub fn new(source: impl Into<NodeRef>, target: impl Into<NodeRef>, value: f32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value: LinkValue::Number(value),
        }
    }
}

impl From<&str> for NodeRef {
    fn from(name: &str) -> Self {
        NodeRef::Name(name.to_string())
    }
}

impl From<usize> for NodeRef {
    fn from(index: usize) -> Self {
        NodeRef::Index(index)
    }
}
