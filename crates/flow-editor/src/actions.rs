use crate::effects::Effect;
use crate::palette::Variant;
use crate::settings::EditorSettings;
use crate::store::Store;
use flow_graph::{
    EdgeId, HistoryError, NodeData, NodeId, NodeKind, Position, VersionId,
};
use rand::Rng;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Actions that can be dispatched to modify the editor state
#[derive(Debug, Clone)]
pub enum Action {
    // Node Actions
    /// Add a node with an explicit payload
    AddNode {
        kind: NodeKind,
        position: Position,
        data: NodeData,
    },
    /// Add a node from the sidebar palette. Without a drop position the
    /// node lands somewhere inside the spawn area.
    AddNodeFromPalette {
        kind: NodeKind,
        position: Option<Position>,
        label: Option<String>,
        description: Option<String>,
    },
    /// Remove a node and every edge touching it
    DeleteNode { id: NodeId },
    /// Merge fields into a node's payload
    UpdateNodeData { id: NodeId, patch: NodeData },
    /// Drag a node to a new position
    MoveNode { id: NodeId, position: Position },
    /// Set the selection flag of a node; without `extend` every other
    /// selection is cleared first
    SelectNode {
        id: NodeId,
        selected: bool,
        extend: bool,
    },

    // Edge Actions
    /// Connect two nodes using the variant's edge style
    Connect { source: NodeId, target: NodeId },
    /// Remove a single edge
    DeleteEdge { id: EdgeId },
    /// Set the selection flag of an edge
    SelectEdge {
        id: EdgeId,
        selected: bool,
        extend: bool,
    },

    // Selection Actions
    ClearSelection,
    /// Keyboard delete on the current selection
    DeleteSelected,

    // Version Actions
    /// Append the live graph to the version history
    SaveVersion,
    /// Replace the live graph with a saved version
    LoadVersion { id: VersionId },

    // Session Actions
    /// Start over with another editor variant's demo graph
    SwitchVariant { variant: Variant },
    /// Toggle node label visibility
    SetShowLabels { show: bool },
    /// Replace editor preferences
    UpdateSettings { settings: EditorSettings },

    // File Operations
    /// Save current project to file
    SaveToFile { path: PathBuf },
    /// Load project from file
    LoadFromFile { path: PathBuf },
    /// Clear any error message
    ClearErrorMessage,
}

/// Apply a single action to modify the store state
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match action {
        // Node Actions
        Action::AddNode {
            kind,
            position,
            data,
        } => {
            store.graph.get_mut().add_node(kind, position, data);
            vec![]
        }
        Action::AddNodeFromPalette {
            kind,
            position,
            label,
            description,
        } => {
            let palette = store.variant.palette();
            let data = match palette.entry(kind) {
                Some(entry) => store.variant.initial_data(
                    entry,
                    label.as_deref(),
                    description.as_deref(),
                ),
                None => NodeData::labeled(
                    label.unwrap_or_else(|| kind.to_string()),
                ),
            };
            let position =
                position.unwrap_or_else(|| random_spawn_position(store));
            store.graph.get_mut().add_node(kind, position, data);
            vec![]
        }
        Action::DeleteNode { id } => {
            if store.graph.get().contains_node(&id) {
                store.graph.get_mut().delete_node(&id);
            } else {
                debug!(node = %id, "delete of missing node ignored");
            }
            vec![]
        }
        Action::UpdateNodeData { id, patch } => {
            if store.graph.get().contains_node(&id) {
                store.graph.get_mut().update_node_data(&id, patch);
            }
            vec![]
        }
        Action::MoveNode { id, position } => {
            if store.graph.get().contains_node(&id) {
                store.graph.get_mut().move_node(&id, position);
            }
            vec![]
        }
        Action::SelectNode {
            id,
            selected,
            extend,
        } => {
            let graph = store.graph.get();
            let flips = graph.node(&id).is_some_and(|n| n.selected != selected);
            let clears = !extend && selected_elsewhere(store, Some(&id), None);
            if flips || clears {
                let graph = store.graph.get_mut();
                if !extend {
                    graph.clear_selection();
                }
                graph.set_node_selected(&id, selected);
            }
            vec![]
        }

        // Edge Actions
        Action::Connect { source, target } => {
            let style = store.variant.edge_style();
            // checked before get_mut so a rejected gesture leaves the graph
            // version untouched
            let result = store
                .graph
                .get()
                .check_endpoints(&source, &target)
                .and_then(|()| {
                    store
                        .graph
                        .get_mut()
                        .connect_with(&source, &target, style)
                        .map(|_| ())
                });
            if let Err(e) = result {
                warn!(%source, %target, error = %e, "connect rejected");
                store.error_message = Some(format!("Cannot connect: {e}"));
            }
            vec![]
        }
        Action::DeleteEdge { id } => {
            if store.graph.get().edge(&id).is_some() {
                store.graph.get_mut().delete_edge(&id);
            }
            vec![]
        }
        Action::SelectEdge {
            id,
            selected,
            extend,
        } => {
            let graph = store.graph.get();
            let flips = graph.edge(&id).is_some_and(|e| e.selected != selected);
            let clears = !extend && selected_elsewhere(store, None, Some(&id));
            if flips || clears {
                let graph = store.graph.get_mut();
                if !extend {
                    graph.clear_selection();
                }
                graph.set_edge_selected(&id, selected);
            }
            vec![]
        }

        // Selection Actions
        Action::ClearSelection => {
            if store.graph.get().has_selection() {
                store.graph.get_mut().clear_selection();
            }
            vec![]
        }
        Action::DeleteSelected => {
            if !store.graph.get().has_selection() {
                return vec![];
            }
            let removed = store.graph.get_mut().delete_selected();
            debug!(
                nodes = removed.nodes.len(),
                edges = removed.edges.len(),
                "deleted selection"
            );
            vec![]
        }

        // Version Actions
        Action::SaveVersion => {
            if let Err(e) = store.history.save(store.graph.get()) {
                warn!(error = %e, "version save failed");
                store.error_message = Some(e.to_string());
            }
            vec![]
        }
        Action::LoadVersion { id } => {
            let result = if store.history.get(id).is_some() {
                store.history.load(id, store.graph.get_mut())
            } else {
                Err(HistoryError::UnknownVersion(id))
            };
            if let Err(e) = result {
                warn!(version = id, error = %e, "version load failed");
                store.error_message = Some(e.to_string());
            }
            vec![]
        }

        // Session Actions
        Action::SwitchVariant { variant } => {
            store.reset(variant);
            vec![]
        }
        Action::SetShowLabels { show } => {
            store.settings.nodes.show_labels = show;
            vec![]
        }
        Action::UpdateSettings { settings } => {
            store.settings = settings.clamped();
            vec![]
        }

        // File Operations
        Action::SaveToFile { path } => {
            vec![Effect::SaveToFile { path }]
        }
        Action::LoadFromFile { path } => {
            vec![Effect::LoadFromFile { path }]
        }
        Action::ClearErrorMessage => {
            store.error_message = None;
            vec![]
        }
    }
}

/// Whether anything other than the given node or edge is selected.
fn selected_elsewhere(
    store: &Store,
    node: Option<&NodeId>,
    edge: Option<&EdgeId>,
) -> bool {
    let graph = store.graph.get();
    graph.nodes().iter().any(|n| n.selected && Some(&n.id) != node)
        || graph.edges().iter().any(|e| e.selected && Some(&e.id) != edge)
}

fn random_spawn_position(store: &Store) -> Position {
    let area = &store.settings.spawn;
    let mut rng = rand::rng();
    Position::new(
        rng.random_range(0.0..=area.width.max(0.0)),
        rng.random_range(0.0..=area.height.max(0.0)),
    )
}
