use crate::edge::Edge;
use crate::error::GraphError;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Plain copy of a graph's node and edge collections, in insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Snapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Check the graph invariants: unique node ids, unique edge ids and
    /// no edge pointing at a missing node.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut node_ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !node_ids.insert(&node.id) {
                return Err(GraphError::DuplicateNodeId(node.id.clone()));
            }
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            if !edge_ids.insert(&edge.id) {
                return Err(GraphError::DuplicateEdgeId(edge.id.clone()));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint) {
                    return Err(GraphError::DanglingEndpoint {
                        endpoint: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeStyle;
    use crate::node::{NodeData, NodeKind, Position};

    fn node(id: &str) -> Node {
        Node::new(id, NodeKind::Entity, Position::default(), NodeData::new())
    }

    #[test]
    fn validate_accepts_consistent_snapshot() {
        let snapshot = Snapshot::new(
            vec![node("1"), node("2")],
            vec![Edge::new("e1-2", "1", "2", EdgeStyle::default())],
        );
        assert_eq!(snapshot.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_broken_snapshots() {
        let dup_node = Snapshot::new(vec![node("1"), node("1")], vec![]);
        assert_eq!(
            dup_node.validate(),
            Err(GraphError::DuplicateNodeId("1".into()))
        );

        let dangling = Snapshot::new(
            vec![node("1")],
            vec![Edge::new("e", "1", "9", EdgeStyle::default())],
        );
        assert_eq!(
            dangling.validate(),
            Err(GraphError::DanglingEndpoint {
                endpoint: "9".into()
            })
        );

        let dup_edge = Snapshot::new(
            vec![node("1")],
            vec![
                Edge::new("e", "1", "1", EdgeStyle::default()),
                Edge::new("e", "1", "1", EdgeStyle::default()),
            ],
        );
        assert_eq!(
            dup_edge.validate(),
            Err(GraphError::DuplicateEdgeId("e".into()))
        );
    }
}
