//! # Bingo Client
//!
//! Client-side state-reconciliation engine for a cooperative bingo board
//! shared among multiple players via a coordinating service.
//!
//! The service pushes a stream of [`StatusMessage`]s describing board
//! contents, claims, and connection status; this crate maintains a
//! consistent local view of the 25-cell board, tracks per-cell objective
//! completion observed from local game progress, resolves a
//! priority-ordered [`ObjectiveStatus`] for each cell, and computes
//! per-color scores and rule-based [`Variant`] annotations.
//!
//! ## Features
//!
//! - **Service-agnostic** — implement [`BingoService`] for your transport
//!   and UI; the engine only invokes it
//! - **Two-source consistency** — remote claims and locally observed
//!   progress reconciled under strict precedence rules
//! - **Thread-safe** — event ingestion and per-frame polling may run on
//!   different threads; shared state sits behind one short-lived lock
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! let client = BingoClient::new(service, BingoConfig::new(BingoColor::Red));
//!
//! // Transport task: feed events in arrival order.
//! while let Some(msg) = inbound.recv().await {
//!     client.handle_event(msg).await;
//! }
//! ```

pub mod board;
pub mod client;
pub mod error;
pub mod oracle;
pub mod protocol;
pub mod service;
pub mod status;
pub mod variants;

// Re-export primary types for ergonomic imports.
pub use board::{Board, Cell, ProgressCache, ScoreEntry};
pub use client::BingoClient;
pub use error::BingoError;
pub use oracle::{AreaMode, BingoConfig, PollContext, ProgressOracle, SessionContext};
pub use protocol::{BingoColor, ColorSet, SquarePayload, StatusMessage};
pub use service::{BingoService, BoardSettings};
pub use status::ObjectiveStatus;
pub use variants::{Variant, VariantRule, VariantRuleTable};
