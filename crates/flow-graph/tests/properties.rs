use flow_graph::{
    EdgeId, FlowGraph, NodeData, NodeId, NodeKind, Position, Snapshot,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Delete(usize),
    Connect(usize, usize),
    DeleteEdge(usize),
    SelectNode(usize),
    SelectEdge(usize),
    Move(usize, f32, f32),
    Patch(usize, String),
    DeleteSelected,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..NodeKind::ALL.len()).prop_map(Op::Add),
        1 => any::<usize>().prop_map(Op::Delete),
        3 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Connect(a, b)),
        1 => any::<usize>().prop_map(Op::DeleteEdge),
        1 => any::<usize>().prop_map(Op::SelectNode),
        1 => any::<usize>().prop_map(Op::SelectEdge),
        1 => (any::<usize>(), -500.0f32..500.0, -500.0f32..500.0)
            .prop_map(|(i, x, y)| Op::Move(i, x, y)),
        1 => (any::<usize>(), "[a-z]{0,8}").prop_map(|(i, s)| Op::Patch(i, s)),
        1 => Just(Op::DeleteSelected),
    ]
}

fn pick_node(graph: &FlowGraph, i: usize) -> Option<NodeId> {
    let nodes = graph.nodes();
    if nodes.is_empty() {
        None
    } else {
        Some(nodes[i % nodes.len()].id.clone())
    }
}

fn pick_edge(graph: &FlowGraph, i: usize) -> Option<EdgeId> {
    let edges = graph.edges();
    if edges.is_empty() {
        None
    } else {
        Some(edges[i % edges.len()].id.clone())
    }
}

/// Apply `op`, returning any id the graph minted.
fn apply(graph: &mut FlowGraph, op: &Op) -> Option<String> {
    match op {
        Op::Add(k) => Some(
            graph
                .add_node(
                    NodeKind::ALL[*k],
                    Position::default(),
                    NodeData::labeled("node"),
                )
                .to_string(),
        ),
        Op::Delete(i) => {
            if let Some(id) = pick_node(graph, *i) {
                graph.delete_node(&id);
                assert!(graph.edges().iter().all(|e| !e.touches(&id)));
            }
            None
        }
        Op::Connect(a, b) => {
            let (a, b) = (pick_node(graph, *a)?, pick_node(graph, *b)?);
            graph.connect(&a, &b).ok().map(|e| e.to_string())
        }
        Op::DeleteEdge(i) => {
            if let Some(id) = pick_edge(graph, *i) {
                graph.delete_edge(&id);
            }
            None
        }
        Op::SelectNode(i) => {
            if let Some(id) = pick_node(graph, *i) {
                graph.set_node_selected(&id, true);
            }
            None
        }
        Op::SelectEdge(i) => {
            if let Some(id) = pick_edge(graph, *i) {
                graph.set_edge_selected(&id, true);
            }
            None
        }
        Op::Move(i, x, y) => {
            if let Some(id) = pick_node(graph, *i) {
                graph.move_node(&id, Position::new(*x, *y));
            }
            None
        }
        Op::Patch(i, value) => {
            if let Some(id) = pick_node(graph, *i) {
                graph.update_node_data(
                    &id,
                    NodeData::new().with("value", value.clone()),
                );
            }
            None
        }
        Op::DeleteSelected => {
            graph.delete_selected();
            None
        }
    }
}

fn assert_consistent(graph: &FlowGraph) {
    let snapshot = graph.snapshot();
    assert_eq!(snapshot.validate(), Ok(()));
    assert_eq!(snapshot.nodes.len(), graph.node_count());
    assert_eq!(snapshot.edges.len(), graph.edge_count());
}

proptest! {
    #[test]
    fn prop_ids_are_never_reused(ops in prop::collection::vec(op(), 0..80)) {
        let mut graph = FlowGraph::new();
        let mut seen = HashSet::new();
        for op in &ops {
            if let Some(id) = apply(&mut graph, op) {
                prop_assert!(seen.insert(id), "id minted twice");
            }
        }
    }

    #[test]
    fn prop_invariants_hold_after_every_op(ops in prop::collection::vec(op(), 0..80)) {
        let mut graph = FlowGraph::new();
        for op in &ops {
            apply(&mut graph, op);
            assert_consistent(&graph);
        }
    }

    #[test]
    fn prop_dangling_connect_changes_nothing(
        ops in prop::collection::vec(op(), 0..40),
        pick in any::<usize>(),
        source_missing in any::<bool>(),
    ) {
        let mut graph = FlowGraph::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        let existing = pick_node(&graph, pick)
            .unwrap_or_else(|| NodeId::new("also-missing"));
        let missing = NodeId::new("missing");
        let before = graph.snapshot();

        let result = if source_missing {
            graph.connect(&missing, &existing)
        } else {
            graph.connect(&existing, &missing)
        };

        prop_assert!(result.is_err());
        prop_assert_eq!(graph.snapshot(), before);
    }

    #[test]
    fn prop_delete_selected_matches_sequential_deletes(
        ops in prop::collection::vec(op(), 0..60),
    ) {
        let mut graph = FlowGraph::new();
        for op in ops.iter().filter(|op| !matches!(op, Op::DeleteSelected)) {
            apply(&mut graph, op);
        }

        let mut expected = graph.clone();
        let nodes: Vec<NodeId> = graph
            .selected_nodes()
            .iter()
            .map(|n| n.id.clone())
            .collect();
        let edges: Vec<EdgeId> = graph
            .edges()
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.id.clone())
            .collect();
        for id in &nodes {
            expected.delete_node(id);
        }
        for id in &edges {
            expected.delete_edge(id);
        }

        graph.delete_selected();
        prop_assert_eq!(graph.snapshot(), expected.snapshot());
    }

    #[test]
    fn prop_restore_snapshot_round_trip(ops in prop::collection::vec(op(), 0..60)) {
        let mut graph = FlowGraph::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        let snapshot = graph.snapshot();
        graph.restore(snapshot.clone()).unwrap();
        prop_assert_eq!(graph.snapshot(), snapshot.clone());

        let rebuilt = FlowGraph::from_snapshot(snapshot.clone()).unwrap();
        prop_assert_eq!(rebuilt.snapshot(), snapshot);
    }
}

#[test]
fn empty_snapshot_restores_to_empty_graph() {
    let mut graph = FlowGraph::new();
    graph.add_node(NodeKind::Header, Position::default(), NodeData::new());
    graph.restore(Snapshot::default()).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}
