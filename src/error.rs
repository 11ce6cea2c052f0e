use thiserror::Error;

/// Coarse classification of layout failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A link names a node that does not exist.
    Reference,
    /// The link graph cannot be layered (it contains a cycle).
    Graph,
    /// The graph cannot be packed into a layout.
    Layout,
    /// A caller-supplied value could not be coerced.
    Input,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown node name {name:?}")]
    UnknownNode { name: String },
    #[error("node index {index} is out of range ({len} nodes)")]
    NodeIndexOutOfRange { index: usize, len: usize },
    #[error("cycle detected: layer assignment did not settle after {passes} passes")]
    Cycle { passes: usize },
    #[error("graph has no flow to lay out ({nodes} nodes, {links} links)")]
    EmptyGraph { nodes: usize, links: usize },
    #[error("layer {layer} has zero total flow")]
    ZeroFlowLayer { layer: usize },
    #[error("link {link} has non-numeric value {raw:?}")]
    InvalidValue { link: usize, raw: String },
    #[error("invalid layout option {option}: {reason}")]
    InvalidConfig { option: &'static str, reason: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownNode { .. } | Error::NodeIndexOutOfRange { .. } => ErrorKind::Reference,
            Error::Cycle { .. } => ErrorKind::Graph,
            Error::EmptyGraph { .. } | Error::ZeroFlowLayer { .. } => ErrorKind::Layout,
            Error::InvalidValue { .. } | Error::InvalidConfig { .. } => ErrorKind::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
