//! Collaborator seam to the coordinating service and the host UI.
//!
//! The [`BingoService`] trait covers everything the state engine asks of the
//! outside world: fetching board snapshots, writing user-visible chat lines,
//! driving the transport lifecycle, and submitting claims. Transport framing,
//! reconnect backoff, rendering, and settings persistence all live behind
//! this trait — the engine only ever invokes them.
//!
//! # Implementing a Service
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use bingo_client::error::Result;
//! use bingo_client::protocol::SquarePayload;
//! use bingo_client::service::{BingoService, BoardSettings};
//!
//! struct MyService { /* ... */ }
//!
//! #[async_trait]
//! impl BingoService for MyService {
//!     async fn fetch_board(&self) -> Result<Vec<SquarePayload>> {
//!         // GET the full board snapshot from the service
//!         todo!()
//!     }
//!
//!     fn settings(&self) -> BoardSettings {
//!         // Read the current board visibility / lockout configuration
//!         todo!()
//!     }
//!
//!     fn log_chat(&self, line: &str) {
//!         // Append a line to the in-game chat log
//!         todo!()
//!     }
//!
//!     fn reconnect(&self) { /* kick the transport */ }
//!     fn disconnect(&self) { /* tear the transport down */ }
//!     fn send_claim(&self, index: usize) { /* submit a claim */ }
//! }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::SquarePayload;

/// Board-level settings read when a new card arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardSettings {
    /// Objectives are hidden from the player; frame polls become no-ops.
    pub hidden: bool,
    /// Lockout mode: any claim makes a cell unavailable to everyone else.
    pub lockout: bool,
}

/// The coordinating-service collaborator.
///
/// Only [`fetch_board`](BingoService::fetch_board) awaits a response; every
/// other method is fire-and-forget and must return promptly — they are
/// called from the frame-poll path with the board lock held.
#[async_trait]
pub trait BingoService: Send + Sync {
    /// Fetch the full current board snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BingoError::Service`] if the snapshot could
    /// not be retrieved; the caller keeps its previous board.
    async fn fetch_board(&self) -> Result<Vec<SquarePayload>>;

    /// Current board visibility / lockout configuration.
    fn settings(&self) -> BoardSettings;

    /// Append a user-visible line to the chat log.
    fn log_chat(&self, line: &str);

    /// Ask the transport layer to re-establish the connection.
    fn reconnect(&self);

    /// Ask the transport layer to tear the connection down.
    fn disconnect(&self);

    /// Submit a claim for the cell at `index`.
    fn send_claim(&self, index: usize);
}
