// Graph model - node/edge collection and its mutations

use crate::edge::{Edge, EdgeStyle};
use crate::error::GraphError;
use crate::ids::{EdgeId, IdCounter, NodeId};
use crate::node::{Node, NodeData, NodeKind, Position};
use crate::snapshot::Snapshot;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::debug;

/// Payload stored in the petgraph slots. `seq` keeps insertion order
/// observable even though `StableGraph` recycles vacant indices.
#[derive(Debug, Clone)]
struct Placed<T> {
    seq: u64,
    item: T,
}

type Inner = StableGraph<Placed<Node>, Placed<Edge>>;

/// What a [`FlowGraph::delete_node`] call took out of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    /// Edges removed by the cascade, in insertion order.
    pub edges: Vec<Edge>,
}

/// Ids removed by [`FlowGraph::delete_selected`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removed {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Removed {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// In-memory collection of typed nodes and directed edges.
///
/// Invariants: node ids are unique, edge ids are unique and every edge
/// endpoint is a node currently in the graph.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    g: Inner,
    nodes_by_id: HashMap<NodeId, NodeIndex>,
    edges_by_id: HashMap<EdgeId, EdgeIndex>,
    node_ids: IdCounter,
    edge_ids: IdCounter,
    seq: u64,
}

impl Default for FlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowGraph {
    pub fn new() -> Self {
        Self {
            g: Inner::default(),
            nodes_by_id: HashMap::new(),
            edges_by_id: HashMap::new(),
            node_ids: IdCounter::new('n'),
            edge_ids: IdCounter::new('e'),
            seq: 0,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        graph.restore(snapshot)?;
        Ok(graph)
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Append a node with a freshly minted id.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Position,
        data: NodeData,
    ) -> NodeId {
        let id = NodeId::new(self.node_ids.mint());
        debug!(node = %id, %kind, "add node");
        self.insert_node(Node::new(id.clone(), kind, position, data));
        id
    }

    fn insert_node(&mut self, node: Node) {
        let id = node.id.clone();
        let seq = self.next_seq();
        let idx = self.g.add_node(Placed { seq, item: node });
        self.nodes_by_id.insert(id, idx);
    }

    /// Remove a node together with every edge that references it.
    /// Returns `None` when the node is not in the graph.
    pub fn delete_node(&mut self, id: &NodeId) -> Option<RemovedNode> {
        let idx = self.nodes_by_id.remove(id)?;

        let mut incident: Vec<EdgeIndex> = self
            .g
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.g.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        // self-loops show up in both directions
        incident.sort();
        incident.dedup();

        let mut edges: Vec<Placed<Edge>> = incident
            .into_iter()
            .filter_map(|e| self.g.remove_edge(e))
            .collect();
        edges.sort_by_key(|e| e.seq);
        for edge in &edges {
            self.edges_by_id.remove(&edge.item.id);
        }

        let node = self.g.remove_node(idx)?.item;
        debug!(
            node = %node.id,
            cascaded = edges.len(),
            "delete node"
        );
        Some(RemovedNode {
            node,
            edges: edges.into_iter().map(|e| e.item).collect(),
        })
    }

    /// Shallow-merge `patch` into the node's payload. Returns `false` when
    /// the node does not exist.
    pub fn update_node_data(&mut self, id: &NodeId, patch: NodeData) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.data.merge(patch);
                true
            }
            None => false,
        }
    }

    pub fn move_node(&mut self, id: &NodeId, position: Position) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_node_selected(&mut self, id: &NodeId, selected: bool) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.selected = selected;
                true
            }
            None => false,
        }
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let idx = *self.nodes_by_id.get(id)?;
        self.g.node_weight_mut(idx).map(|slot| &mut slot.item)
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    /// Connect two existing nodes with a default-styled edge.
    pub fn connect(
        &mut self,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<EdgeId, GraphError> {
        self.connect_with(source, target, EdgeStyle::default())
    }

    /// Connect two existing nodes. Self-loops and parallel edges are
    /// allowed; a missing endpoint leaves the graph untouched.
    pub fn connect_with(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        style: EdgeStyle,
    ) -> Result<EdgeId, GraphError> {
        let a = self.index_of(source)?;
        let b = self.index_of(target)?;

        let id = EdgeId::new(self.edge_ids.mint());
        debug!(edge = %id, %source, %target, "connect");
        let edge = Edge::new(id.clone(), source.clone(), target.clone(), style);
        self.insert_edge(a, b, edge);
        Ok(id)
    }

    /// The error [`FlowGraph::connect`] would report for this pair,
    /// without touching the graph.
    pub fn check_endpoints(
        &self,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<(), GraphError> {
        self.index_of(source)?;
        self.index_of(target)?;
        Ok(())
    }

    fn index_of(&self, id: &NodeId) -> Result<NodeIndex, GraphError> {
        self.nodes_by_id.get(id).copied().ok_or_else(|| {
            GraphError::DanglingEndpoint {
                endpoint: id.clone(),
            }
        })
    }

    fn insert_edge(&mut self, a: NodeIndex, b: NodeIndex, edge: Edge) {
        let id = edge.id.clone();
        let seq = self.next_seq();
        let idx = self.g.add_edge(a, b, Placed { seq, item: edge });
        self.edges_by_id.insert(id, idx);
    }

    pub fn delete_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let idx = self.edges_by_id.remove(id)?;
        let edge = self.g.remove_edge(idx)?.item;
        debug!(edge = %edge.id, "delete edge");
        Some(edge)
    }

    pub fn set_edge_selected(&mut self, id: &EdgeId, selected: bool) -> bool {
        let Some(&idx) = self.edges_by_id.get(id) else {
            return false;
        };
        match self.g.edge_weight_mut(idx) {
            Some(slot) => {
                slot.item.selected = selected;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn has_selection(&self) -> bool {
        self.g.node_weights().any(|slot| slot.item.selected)
            || self.g.edge_weights().any(|slot| slot.item.selected)
    }

    pub fn clear_selection(&mut self) {
        let nodes: Vec<NodeIndex> = self.g.node_indices().collect();
        for idx in nodes {
            if let Some(slot) = self.g.node_weight_mut(idx) {
                slot.item.selected = false;
            }
        }
        let edges: Vec<EdgeIndex> = self.g.edge_indices().collect();
        for idx in edges {
            if let Some(slot) = self.g.edge_weight_mut(idx) {
                slot.item.selected = false;
            }
        }
    }

    /// Delete every selected node (cascading to its edges), then every
    /// selected edge that survived the cascade.
    pub fn delete_selected(&mut self) -> Removed {
        let nodes: Vec<NodeId> = self
            .nodes()
            .into_iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect();
        let edges: Vec<EdgeId> = self
            .edges()
            .into_iter()
            .filter(|e| e.selected)
            .map(|e| e.id.clone())
            .collect();

        let mut removed = Removed::default();
        for id in nodes {
            if let Some(gone) = self.delete_node(&id) {
                removed.nodes.push(gone.node.id);
                removed
                    .edges
                    .extend(gone.edges.into_iter().map(|e| e.id));
            }
        }
        for id in edges {
            if let Some(gone) = self.delete_edge(&id) {
                removed.edges.push(gone.id);
            }
        }
        removed
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        let idx = *self.nodes_by_id.get(id)?;
        self.g.node_weight(idx).map(|slot| &slot.item)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        let idx = *self.edges_by_id.get(id)?;
        self.g.edge_weight(idx).map(|slot| &slot.item)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes_by_id.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut slots: Vec<&Placed<Node>> = self.g.node_weights().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| &slot.item).collect()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> Vec<&Edge> {
        let mut slots: Vec<&Placed<Edge>> = self
            .g
            .edge_indices()
            .filter_map(|idx| self.g.edge_weight(idx))
            .collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| &slot.item).collect()
    }

    /// Edges with `id` as source or target, in insertion order.
    pub fn edges_of(&self, id: &NodeId) -> Vec<&Edge> {
        self.edges()
            .into_iter()
            .filter(|edge| edge.touches(id))
            .collect()
    }

    pub fn selected_nodes(&self) -> Vec<&Node> {
        self.nodes().into_iter().filter(|n| n.selected).collect()
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.g.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.g.node_count() == 0
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes().into_iter().cloned().collect(),
            edges: self.edges().into_iter().cloned().collect(),
        }
    }

    /// Move the id counters past every id in `snapshot` without loading
    /// it. Used for snapshots kept outside the live graph, such as saved
    /// versions, so fresh ids never repeat one of theirs.
    pub fn reserve_ids(&mut self, snapshot: &Snapshot) {
        for node in &snapshot.nodes {
            self.node_ids.observe(node.id.as_str());
        }
        for edge in &snapshot.edges {
            self.edge_ids.observe(edge.id.as_str());
        }
    }

    /// Replace the whole graph with `snapshot`.
    ///
    /// The snapshot is validated first; on error the live graph is left
    /// as it was. Id counters keep moving forward, so ids minted after a
    /// restore never collide with restored ones.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), GraphError> {
        snapshot.validate()?;
        self.reserve_ids(&snapshot);

        self.g.clear();
        self.nodes_by_id.clear();
        self.edges_by_id.clear();

        for node in snapshot.nodes {
            self.insert_node(node);
        }
        for edge in snapshot.edges {
            // endpoints were checked by validate()
            let a = self.index_of(&edge.source)?;
            let b = self.index_of(&edge.target)?;
            self.insert_edge(a, b, edge);
        }

        debug!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            "restore"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeKind;
    use pretty_assertions::assert_eq;

    fn clause(graph: &mut FlowGraph, label: &str, x: f32) -> NodeId {
        graph.add_node(
            NodeKind::Clause,
            Position::new(x, 0.0),
            NodeData::labeled(label),
        )
    }

    #[test]
    fn scenario_cascade_on_delete() {
        let mut graph = FlowGraph::new();
        let n1 = clause(&mut graph, "A", 0.0);
        let n2 = clause(&mut graph, "B", 10.0);
        assert_eq!(n1.as_str(), "n1");
        assert_eq!(n2.as_str(), "n2");

        let e1 = graph.connect(&n1, &n2).unwrap();
        assert_eq!(e1.as_str(), "e1");

        let removed = graph.delete_node(&n1).unwrap();
        assert_eq!(removed.edges.len(), 1);
        assert_eq!(removed.edges[0].id, e1);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.node(&n2).is_some());
        assert!(graph.edge(&e1).is_none());
    }

    #[test]
    fn connect_rejects_dangling_endpoint() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        let before = graph.snapshot();

        let err = graph.connect(&a, &"missing".into()).unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingEndpoint {
                endpoint: "missing".into()
            }
        );
        assert!(graph.connect(&"gone".into(), &a).is_err());
        assert_eq!(graph.snapshot(), before);

        // no edge id was burnt by the failed attempts
        let b = clause(&mut graph, "B", 1.0);
        assert_eq!(graph.connect(&a, &b).unwrap().as_str(), "e1");
    }

    #[test]
    fn self_loops_and_parallel_edges_are_kept() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        let b = clause(&mut graph, "B", 1.0);

        graph.connect(&a, &a).unwrap();
        graph.connect(&a, &b).unwrap();
        graph.connect(&a, &b).unwrap();
        assert_eq!(graph.edge_count(), 3);

        let removed = graph.delete_node(&a).unwrap();
        assert_eq!(removed.edges.len(), 3);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn delete_twice_is_a_noop() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        assert!(graph.delete_node(&a).is_some());
        assert!(graph.delete_node(&a).is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn missing_ids_are_ignored() {
        let mut graph = FlowGraph::new();
        let ghost: NodeId = "ghost".into();
        assert!(!graph.update_node_data(&ghost, NodeData::labeled("x")));
        assert!(!graph.move_node(&ghost, Position::new(1.0, 1.0)));
        assert!(!graph.set_node_selected(&ghost, true));
        assert!(graph.delete_edge(&"e9".into()).is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn update_and_move() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);

        assert!(graph.update_node_data(
            &a,
            NodeData::new().with("value", "Confidential Information includes...")
        ));
        assert!(graph.move_node(&a, Position::new(-40.5, 300.0)));

        let node = graph.node(&a).unwrap();
        assert_eq!(node.label(), "A");
        assert_eq!(
            node.data.get_str("value"),
            Some("Confidential Information includes...")
        );
        assert_eq!(node.position, Position::new(-40.5, 300.0));
    }

    #[test]
    fn delete_selected_cascades_then_removes_edges() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        let b = clause(&mut graph, "B", 1.0);
        let c = clause(&mut graph, "C", 2.0);
        let ab = graph.connect(&a, &b).unwrap();
        let bc = graph.connect(&b, &c).unwrap();
        let ca = graph.connect(&c, &a).unwrap();

        graph.set_node_selected(&a, true);
        graph.set_edge_selected(&ab, true);
        graph.set_edge_selected(&bc, true);

        let removed = graph.delete_selected();
        assert_eq!(removed.nodes, vec![a]);
        assert_eq!(removed.edges, vec![ab, ca, bc]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn clear_selection_resets_flags() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        let e = graph.connect(&a, &a).unwrap();
        graph.set_node_selected(&a, true);
        graph.set_edge_selected(&e, true);

        graph.clear_selection();
        assert!(graph.selected_nodes().is_empty());
        assert!(!graph.edge(&e).unwrap().selected);
        assert!(graph.delete_selected().is_empty());
    }

    #[test]
    fn insertion_order_survives_slot_reuse() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        let b = clause(&mut graph, "B", 1.0);
        graph.delete_node(&a);
        let c = clause(&mut graph, "C", 2.0);

        let order: Vec<&NodeId> = graph.nodes().iter().map(|n| &n.id).collect();
        assert_eq!(order, vec![&b, &c]);
    }

    #[test]
    fn restore_round_trip() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        let b = clause(&mut graph, "B", 1.0);
        graph
            .connect_with(&a, &b, EdgeStyle::new(EdgeKind::Step).with_arrow())
            .unwrap();
        graph.set_node_selected(&b, true);

        let snapshot = graph.snapshot();
        graph.restore(snapshot.clone()).unwrap();
        assert_eq!(graph.snapshot(), snapshot);
    }

    #[test]
    fn restore_never_reuses_ids() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        let early = graph.snapshot();
        let b = clause(&mut graph, "B", 1.0);

        graph.restore(early).unwrap();
        let c = clause(&mut graph, "C", 2.0);
        assert_ne!(c, a);
        assert_ne!(c, b);
        assert_eq!(c.as_str(), "n3");
    }

    #[test]
    fn restore_rejects_invalid_snapshot_without_mutation() {
        let mut graph = FlowGraph::new();
        clause(&mut graph, "A", 0.0);
        let before = graph.snapshot();

        let bad = Snapshot::new(
            vec![],
            vec![Edge::new("e1", "x", "y", EdgeStyle::default())],
        );
        assert!(graph.restore(bad).is_err());
        assert_eq!(graph.snapshot(), before);
    }

    #[test]
    fn reserved_ids_are_skipped() {
        let mut graph = FlowGraph::new();
        let mut elsewhere = FlowGraph::new();
        for label in ["A", "B", "C"] {
            clause(&mut elsewhere, label, 0.0);
        }
        let a = elsewhere.nodes()[0].id.clone();
        let b = elsewhere.nodes()[1].id.clone();
        elsewhere.connect(&a, &b).unwrap();

        graph.reserve_ids(&elsewhere.snapshot());
        assert!(graph.is_empty());
        let n = clause(&mut graph, "D", 0.0);
        let m = clause(&mut graph, "E", 0.0);
        assert_eq!(n.as_str(), "n4");
        assert_eq!(graph.connect(&n, &m).unwrap().as_str(), "e2");
    }

    #[test]
    fn saturated_file_id_does_not_break_minting() {
        let huge = Node::new(
            format!("n{}", u64::MAX),
            NodeKind::Clause,
            Position::default(),
            NodeData::labeled("imported"),
        );
        let mut graph =
            FlowGraph::from_snapshot(Snapshot::new(vec![huge], vec![]))
                .unwrap();

        let fresh = clause(&mut graph, "fresh", 0.0);
        assert_eq!(fresh.as_str(), "n1");
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn check_endpoints_matches_connect() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        let ghost = NodeId::from("ghost");

        assert_eq!(graph.check_endpoints(&a, &a), Ok(()));
        let checked = graph.check_endpoints(&a, &ghost);
        assert_eq!(
            checked,
            Err(GraphError::DanglingEndpoint {
                endpoint: ghost.clone()
            })
        );
        assert_eq!(graph.connect(&a, &ghost).map(|_| ()), checked);
    }

    #[test]
    fn has_selection_tracks_flags() {
        let mut graph = FlowGraph::new();
        let a = clause(&mut graph, "A", 0.0);
        let e = graph.connect(&a, &a).unwrap();
        assert!(!graph.has_selection());

        graph.set_edge_selected(&e, true);
        assert!(graph.has_selection());
        graph.clear_selection();
        graph.set_node_selected(&a, true);
        assert!(graph.has_selection());
    }
}
