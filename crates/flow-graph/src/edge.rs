use crate::ids::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// How the connector between two nodes is drawn.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    #[default]
    Default,
    /// Dashed connector with an inline delete handle.
    Custom,
    SmoothStep,
    Step,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct EdgeStyle {
    pub kind: EdgeKind,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub arrow_end: bool,
}

impl EdgeStyle {
    pub const fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            animated: false,
            arrow_end: false,
        }
    }

    pub const fn animated(mut self) -> Self {
        self.animated = true;
        self
    }

    pub const fn with_arrow(mut self) -> Self {
        self.arrow_end = true;
        self
    }
}

/// Directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub style: EdgeStyle,
    #[serde(default)]
    pub selected: bool,
}

impl Edge {
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        style: EdgeStyle,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            style,
            selected: false,
        }
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}
