use crate::ids::{EdgeId, NodeId};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge names a node that is not in the graph.
    #[error("edge endpoint `{endpoint}` does not exist")]
    DanglingEndpoint { endpoint: NodeId },
    #[error("node id `{0}` appears more than once")]
    DuplicateNodeId(NodeId),
    #[error("edge id `{0}` appears more than once")]
    DuplicateEdgeId(EdgeId),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("no saved version with id {0}")]
    UnknownVersion(u32),
    #[error("version {next} follows version {previous}; ids must increase")]
    OutOfOrder { previous: u32, next: u32 },
    #[error("no version id left after {0}")]
    Exhausted(u32),
    #[error("version {version} cannot be restored: {source}")]
    Corrupt {
        version: u32,
        #[source]
        source: GraphError,
    },
}
