use crate::error::HistoryError;
use crate::graph::FlowGraph;
use crate::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub type VersionId = u32;

/// A saved, immutable copy of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub saved_at: DateTime<Utc>,
    pub snapshot: Snapshot,
}

/// Linear, append-only version list. Loading an old version and saving
/// again appends a new version; nothing is ever rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    versions: Vec<Version>,
    current: VersionId,
}

impl History {
    /// Start a history whose first version is `initial`.
    pub fn new(initial: &FlowGraph) -> Self {
        Self {
            versions: vec![Version {
                id: 1,
                saved_at: Utc::now(),
                snapshot: initial.snapshot(),
            }],
            current: 1,
        }
    }

    /// Append the graph as a new version and make it current.
    pub fn save(
        &mut self,
        graph: &FlowGraph,
    ) -> Result<VersionId, HistoryError> {
        let id = match self.versions.last() {
            Some(last) => last
                .id
                .checked_add(1)
                .ok_or(HistoryError::Exhausted(last.id))?,
            None => 1,
        };
        self.versions.push(Version {
            id,
            saved_at: Utc::now(),
            snapshot: graph.snapshot(),
        });
        self.current = id;
        info!(
            version = id,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "saved version"
        );
        Ok(id)
    }

    /// Replace the live graph with version `id` and make it current.
    pub fn load(
        &mut self,
        id: VersionId,
        graph: &mut FlowGraph,
    ) -> Result<(), HistoryError> {
        let version =
            self.get(id).ok_or(HistoryError::UnknownVersion(id))?;
        graph
            .restore(version.snapshot.clone())
            .map_err(|source| HistoryError::Corrupt {
                version: id,
                source,
            })?;
        self.current = id;
        info!(version = id, "loaded version");
        Ok(())
    }

    /// Check that version ids strictly increase from 1, that every stored
    /// snapshot is restorable and that the current marker names a stored
    /// version.
    pub fn validate(&self) -> Result<(), HistoryError> {
        let mut previous = 0;
        for version in &self.versions {
            if version.id <= previous {
                return Err(HistoryError::OutOfOrder {
                    previous,
                    next: version.id,
                });
            }
            previous = version.id;

            version.snapshot.validate().map_err(|source| {
                HistoryError::Corrupt {
                    version: version.id,
                    source,
                }
            })?;
        }
        if !self.versions.is_empty() && self.get(self.current).is_none() {
            return Err(HistoryError::UnknownVersion(self.current));
        }
        Ok(())
    }

    pub fn get(&self, id: VersionId) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn current(&self) -> VersionId {
        self.current
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
