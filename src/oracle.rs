//! Read-only gameplay collaborators: the progress oracle and the per-call
//! session/input context.
//!
//! The host game owns the live save state; this crate never reaches into it
//! ambiently. Everything the resolvers need is either behind the
//! [`ProgressOracle`] trait or passed by value in a [`PollContext`] each
//! frame.

use crate::protocol::BingoColor;
use crate::variants::VariantRule;

/// Play mode of the current area (the host game's A/B/C sides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaMode {
    ASide,
    BSide,
    CSide,
}

/// Where the player currently is, present only while a save is active.
///
/// Absence of a `SessionContext` is the "no save loaded" state the status
/// resolver treats as terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    pub area_id: i32,
    pub mode: AreaMode,
}

/// Read-only source of real-time objective progress, keyed by objective text.
///
/// Implemented by the host game integration. All methods must be cheap; they
/// are called once per cell per frame poll.
pub trait ProgressOracle: Send + Sync {
    /// Whether the oracle tracks an objective with this text at all.
    /// A miss here resolves to `Unknown`, which is expected, not an error.
    fn has_objective(&self, name: &str) -> bool;

    /// Progress toward the named objective in `[0.0, 1.0]`.
    fn progress(&self, name: &str) -> f32;

    /// The checkpoint the player is currently at, if any.
    fn at_checkpoint(&self) -> Option<i32>;

    /// Variant rules registered for the named objective, if any.
    fn variant_rules(&self, name: &str) -> Option<&[VariantRule]>;
}

/// Everything a frame poll supplies to the query operations.
#[derive(Clone, Copy)]
pub struct PollContext<'a> {
    /// The host game's progress oracle.
    pub oracle: &'a dyn ProgressOracle,
    /// Current session, or `None` when no save is active.
    pub session: Option<SessionContext>,
    /// `false` while the host is on a non-gameplay screen (menus, overworld).
    pub in_gameplay: bool,
    /// Whether the claim-trigger input was pressed this frame.
    pub claim_pressed: bool,
}

impl<'a> PollContext<'a> {
    /// A context with no active session and no input, for menu-time polls.
    pub fn idle(oracle: &'a dyn ProgressOracle) -> Self {
        Self {
            oracle,
            session: None,
            in_gameplay: false,
            claim_pressed: false,
        }
    }
}

impl std::fmt::Debug for PollContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollContext")
            .field("session", &self.session)
            .field("in_gameplay", &self.in_gameplay)
            .field("claim_pressed", &self.claim_pressed)
            .finish_non_exhaustive()
    }
}

/// Static per-player configuration supplied when the client is created.
#[derive(Debug, Clone, Copy)]
pub struct BingoConfig {
    /// The local player's claim color.
    pub player_color: BingoColor,
    /// When set, pressing the claim input during a frame poll submits a
    /// claim for every locally completed, unclaimed cell.
    pub claim_assist: bool,
}

impl BingoConfig {
    /// Configuration with claim assist disabled.
    pub fn new(player_color: BingoColor) -> Self {
        Self {
            player_color,
            claim_assist: false,
        }
    }

    /// Enable or disable claim assist.
    #[must_use]
    pub fn with_claim_assist(mut self, claim_assist: bool) -> Self {
        self.claim_assist = claim_assist;
        self
    }
}
