pub mod edge;
pub mod error;
pub mod graph;
pub mod history;
pub mod ids;
pub mod node;
pub mod snapshot;

pub use edge::{Edge, EdgeKind, EdgeStyle};
pub use error::{GraphError, HistoryError};
pub use graph::{FlowGraph, Removed, RemovedNode};
pub use history::{History, Version, VersionId};
pub use ids::{EdgeId, NodeId};
pub use node::{Node, NodeData, NodeKind, Position, UnknownKind};
pub use snapshot::Snapshot;
