use crate::palette::Variant;
use crate::seed::seed_snapshot;
use crate::serialization::{self, LoadedProject, Project, ProjectError};
use crate::settings::EditorSettings;
use crate::versioned::Versioned;
use flow_graph::{FlowGraph, History, NodeKind};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Counts shown in the status bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub selected: usize,
    /// Node count per kind, in first-seen order.
    pub per_kind: Vec<(NodeKind, usize)>,
}

/// Everything an editing session owns: the live graph, its version
/// history and the editor preferences. Purely visual state (pan, open
/// palette section, drag in progress) lives with the view instead.
pub struct Store {
    pub variant: Variant,
    pub graph: Versioned<FlowGraph>,
    pub history: History,
    pub settings: EditorSettings,
    pub project_path: Option<PathBuf>,
    pub error_message: Option<String>,
}

impl Store {
    /// Fresh session seeded with the variant's demo graph.
    pub fn new(variant: Variant) -> Self {
        let graph = seeded_graph(variant);
        let history = History::new(&graph);
        Self {
            variant,
            graph: Versioned::new(graph),
            history,
            settings: EditorSettings::default(),
            project_path: None,
            error_message: None,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ProjectError> {
        let mut store = Self::new(Variant::default());
        store.load_from_file(path)?;
        Ok(store)
    }

    /// Drop the current session and start over from the variant's seed.
    pub fn reset(&mut self, variant: Variant) {
        let graph = seeded_graph(variant);
        self.history = History::new(&graph);
        self.graph.set(graph);
        self.graph.mark_clean();
        self.variant = variant;
        self.project_path = None;
        info!(variant = variant.as_str(), "started new session");
    }

    pub fn is_dirty(&self) -> bool {
        self.graph.is_dirty()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn to_project(&self) -> Project {
        Project {
            variant: self.variant,
            settings: self.settings.clone(),
            graph: self.graph.get().snapshot(),
            history: Some(self.history.clone()),
        }
    }

    pub fn save_to_file(&mut self, path: &Path) -> Result<(), ProjectError> {
        serialization::save_to_file(&self.to_project(), path)?;
        self.graph.mark_clean();
        self.project_path = Some(path.to_path_buf());
        info!(path = %path.display(), "saved project");
        Ok(())
    }

    /// Replace the session with the project at `path`. On error the
    /// current session is kept unchanged.
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), ProjectError> {
        let LoadedProject {
            variant,
            settings,
            graph,
            history,
        } = serialization::load_from_file(path)?.into_loaded()?;

        self.variant = variant;
        self.settings = settings;
        self.history = history;
        self.graph.set(graph);
        self.graph.mark_clean();
        self.project_path = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            nodes = self.graph.get().node_count(),
            versions = self.history.len(),
            "loaded project"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Derived data
    // ------------------------------------------------------------------

    pub fn graph_stats_uncached(&self) -> GraphStats {
        let graph = self.graph.get();
        let mut per_kind: Vec<(NodeKind, usize)> = Vec::new();
        let mut selected = 0;
        for node in graph.nodes() {
            if node.selected {
                selected += 1;
            }
            match per_kind.iter_mut().find(|(k, _)| *k == node.kind) {
                Some((_, count)) => *count += 1,
                None => per_kind.push((node.kind, 1)),
            }
        }
        GraphStats {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            selected,
            per_kind,
        }
    }
}

fn seeded_graph(variant: Variant) -> FlowGraph {
    FlowGraph::from_snapshot(seed_snapshot(variant)).unwrap_or_else(|e| {
        warn!(variant = variant.as_str(), error = %e, "demo seed rejected");
        FlowGraph::new()
    })
}
