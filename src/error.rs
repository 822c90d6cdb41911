use crate::connection::NodeIndex;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("teleportation probability must be within [0, 1], got {0}")]
    InvalidTeleportationProbability(f64),

    #[error("unknown connection type '{0}' (expected links, edges or transactions)")]
    UnknownConnectionType(String),

    #[error("node index {index} out of range for a network of {node_count} nodes")]
    NodeIndexOutOfRange { index: NodeIndex, node_count: usize },

    // Fields avoid the name `source`, which thiserror reserves for error chaining.
    #[error("invalid weight {weight} on connection {from} -> {to}")]
    InvalidWeight {
        from: NodeIndex,
        to: NodeIndex,
        weight: f64,
    },

    #[error("expected {expected} node weights, found {found}")]
    NodeWeightCountMismatch { expected: usize, found: usize },

    #[error("invalid weight {weight} for node {index}")]
    InvalidNodeWeight { index: NodeIndex, weight: f64 },
}
