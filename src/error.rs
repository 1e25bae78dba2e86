//! Error types for the bingo client.

use thiserror::Error;

/// Errors that can occur while synchronizing or querying the board.
#[derive(Debug, Error)]
pub enum BingoError {
    /// A square descriptor carried a slot identifier that does not parse
    /// to a board index (expected `"slotNN"` with NN in 1..=25).
    #[error("malformed slot identifier: {0:?}")]
    MalformedSlot(String),

    /// A patch arrived before any board snapshot was applied.
    #[error("board not initialized")]
    BoardUninitialized,

    /// A full snapshot contained descriptors that could not be placed.
    /// All well-formed descriptors were still applied.
    #[error("snapshot applied with {} rejected descriptor(s)", .rejected.len())]
    PartialSnapshot {
        /// The slot identifiers that failed to parse.
        rejected: Vec<String>,
    },

    /// Failed to serialize or deserialize a status message.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The coordinating service failed to deliver a board snapshot.
    #[error("board fetch failed: {0}")]
    Service(String),
}

/// A specialized [`Result`] type for bingo client operations.
pub type Result<T> = std::result::Result<T, BingoError>;
