//! Per-cell objective status resolution.
//!
//! [`resolve`] combines four independent sources — the synchronized board,
//! the local completion cache, the player's identity/lockout configuration,
//! and the live progress oracle — into a single status. The evaluation order
//! is strict and first-match-wins: claims dominate the local cache, the
//! cache dominates oracle absence, and oracle absence dominates the numeric
//! thresholds. Reordering any step changes observable behavior.

use crate::board::{Board, ProgressCache};
use crate::oracle::ProgressOracle;
use crate::protocol::BingoColor;

/// Progress below this counts as not started.
const PROGRESS_FLOOR: f32 = 0.001;

/// Progress above this counts as complete.
const PROGRESS_CEIL: f32 = 0.999;

/// Resolved status of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveStatus {
    /// No board, no save, or no measurable progress.
    Nothing,
    /// The oracle does not track this objective.
    Unknown,
    /// Partial progress observed by the oracle.
    Progress,
    /// Objectively done locally (cached or per the oracle), not yet claimed.
    Completed,
    /// Claimed by the local player, or by anyone under lockout.
    Claimed,
}

/// Claim-related inputs to the resolver, fixed for a whole poll.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext {
    /// The local player's claim color.
    pub player_color: BingoColor,
    /// Whether lockout mode is active.
    pub lockout: bool,
    /// Whether a save is currently loaded.
    pub save_active: bool,
}

/// Resolve the status of cell `i`.
///
/// Evaluated strictly in order, first match wins:
///
/// 1. absent board, out-of-range index, or absent cache → [`Nothing`]
/// 2. player's color claimed, or lockout with any claim → [`Claimed`]
/// 3. cache entry set → [`Completed`]
/// 4. no active save → [`Nothing`]
/// 5. oracle does not track the objective → [`Unknown`]
/// 6. oracle progress `< 0.001` → [`Nothing`], `> 0.999` → [`Completed`],
///    otherwise → [`Progress`]
///
/// The epsilon bounds in step 6 deliberately avoid exact float comparison
/// against 0 and 1.
///
/// [`Nothing`]: ObjectiveStatus::Nothing
/// [`Claimed`]: ObjectiveStatus::Claimed
/// [`Completed`]: ObjectiveStatus::Completed
/// [`Progress`]: ObjectiveStatus::Progress
/// [`Unknown`]: ObjectiveStatus::Unknown
pub fn resolve(
    board: Option<&Board>,
    cache: Option<&ProgressCache>,
    i: usize,
    ctx: ResolveContext,
    oracle: &dyn ProgressOracle,
) -> ObjectiveStatus {
    let (Some(board), Some(cache)) = (board, cache) else {
        return ObjectiveStatus::Nothing;
    };
    let Some(cell) = board.cell(i) else {
        return ObjectiveStatus::Nothing;
    };

    if cell.colors.contains(ctx.player_color) || (ctx.lockout && !cell.colors.is_empty()) {
        return ObjectiveStatus::Claimed;
    }

    if cache.is_done(i) {
        return ObjectiveStatus::Completed;
    }

    if !ctx.save_active {
        return ObjectiveStatus::Nothing;
    }

    if !oracle.has_objective(&cell.text) {
        return ObjectiveStatus::Unknown;
    }

    let progress = oracle.progress(&cell.text);
    if progress < PROGRESS_FLOOR {
        ObjectiveStatus::Nothing
    } else if progress > PROGRESS_CEIL {
        ObjectiveStatus::Completed
    } else {
        ObjectiveStatus::Progress
    }
}

/// A cell is claimable when nobody has claimed it yet but the local cache
/// has observed its objective complete.
pub fn is_claimable(board: Option<&Board>, cache: Option<&ProgressCache>, i: usize) -> bool {
    let claimed_free = board
        .and_then(|b| b.cell(i))
        .is_some_and(|cell| cell.colors.is_empty());
    claimed_free && cache.is_some_and(|c| c.is_done(i))
}
