use flow_graph::{FlowGraph, GraphError, History, HistoryError, Snapshot};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::palette::Variant;
use crate::settings::EditorSettings;

// ------------------------------------------------------------------
// Project file
// ------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("failed to access project file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse project file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project graph is inconsistent: {0}")]
    Graph(#[from] GraphError),
    #[error("project history is inconsistent: {0}")]
    History(#[from] HistoryError),
}

/// On-disk layout of an editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub settings: EditorSettings,
    pub graph: Snapshot,
    /// Older files carry no history; one is started from `graph`.
    #[serde(default)]
    pub history: Option<History>,
}

/// Validated contents of a project, ready to install in a store.
#[derive(Debug)]
pub struct LoadedProject {
    pub variant: Variant,
    pub settings: EditorSettings,
    pub graph: FlowGraph,
    pub history: History,
}

impl Project {
    pub fn into_loaded(self) -> Result<LoadedProject, ProjectError> {
        let mut graph = FlowGraph::from_snapshot(self.graph)?;
        let history = match self.history {
            Some(history) => {
                history.validate()?;
                // saved versions may hold ids the live graph has since
                // deleted; minting must not hand those out again
                for version in history.versions() {
                    graph.reserve_ids(&version.snapshot);
                }
                history
            }
            None => History::new(&graph),
        };
        Ok(LoadedProject {
            variant: self.variant,
            settings: self.settings.clamped(),
            graph,
            history,
        })
    }
}

// ------------------------------------------------------------------
// File I/O operations
// ------------------------------------------------------------------

pub fn save_to_file(
    project: &Project,
    path: &Path,
) -> Result<(), ProjectError> {
    let json = serde_json::to_string_pretty(project)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_from_file(path: &Path) -> Result<Project, ProjectError> {
    let json_str = std::fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&json_str)?;
    Ok(project)
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_snapshot;
    use flow_graph::{EdgeStyle, NodeData, NodeKind, Position};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("flow_editor_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_project_round_trip() {
        let mut graph =
            FlowGraph::from_snapshot(seed_snapshot(Variant::ContractTemplate))
                .unwrap();
        let mut history = History::new(&graph);
        let term = graph.add_node(
            NodeKind::Clause,
            Position::new(120.0, 480.0),
            NodeData::labeled("Term").with("text", "Two years"),
        );
        graph
            .connect_with(&"3".into(), &term, EdgeStyle::default().animated())
            .unwrap();
        history.save(&graph).unwrap();

        let project = Project {
            variant: Variant::ContractTemplate,
            settings: EditorSettings::default(),
            graph: graph.snapshot(),
            history: Some(history.clone()),
        };

        let path = temp_path("round_trip");
        save_to_file(&project, &path).expect("Failed to save file");
        let loaded = load_from_file(&path)
            .expect("Failed to load file")
            .into_loaded()
            .expect("Loaded project should validate");

        assert_eq!(loaded.variant, Variant::ContractTemplate);
        assert_eq!(loaded.graph.snapshot(), graph.snapshot());
        assert_eq!(loaded.history, history);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_minimal_file_gets_defaults() {
        let project: Project = serde_json::from_value(json!({
            "graph": {
                "nodes": [
                    { "id": "1", "kind": "entity", "position": { "x": 0.0, "y": 0.0 },
                      "data": { "label": "Customer" } }
                ]
            }
        }))
        .unwrap();

        let loaded = project.into_loaded().unwrap();
        assert_eq!(loaded.variant, Variant::KnowledgeGraph);
        assert_eq!(loaded.settings, EditorSettings::default());
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(loaded.graph.node_count(), 1);
    }

    #[test]
    fn test_dangling_edge_in_file_is_rejected() {
        let project: Project = serde_json::from_value(json!({
            "variant": "privacy-policy",
            "graph": {
                "nodes": [],
                "edges": [ { "id": "e1", "source": "n1", "target": "n2",
                             "style": { "kind": "default" } } ]
            }
        }))
        .unwrap();

        let err = project.into_loaded().unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Graph(GraphError::DanglingEndpoint { .. })
        ));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = load_from_file(&temp_path("does_not_exist")).unwrap_err();
        assert!(matches!(err, ProjectError::Io(_)));
    }

    #[test]
    fn test_reload_never_reuses_version_ids() {
        let mut graph = FlowGraph::new();
        for y in 0..5 {
            graph.add_node(
                NodeKind::Clause,
                Position::new(0.0, y as f32 * 100.0),
                NodeData::labeled("Clause"),
            );
        }
        let mut history = History::new(&graph);
        graph.delete_node(&"n5".into());
        history.save(&graph).unwrap();

        let project = Project {
            variant: Variant::PrivacyPolicy,
            settings: EditorSettings::default(),
            graph: graph.snapshot(),
            history: Some(history),
        };
        let json = serde_json::to_value(&project).unwrap();
        let mut loaded = serde_json::from_value::<Project>(json)
            .unwrap()
            .into_loaded()
            .unwrap();

        let fresh = loaded.graph.add_node(
            NodeKind::Clause,
            Position::new(0.0, 500.0),
            NodeData::labeled("Late clause"),
        );
        assert_eq!(fresh.as_str(), "n6");
        assert!(loaded.history.versions().iter().all(|version| {
            version.snapshot.nodes.iter().all(|node| node.id != fresh)
        }));
    }
}
