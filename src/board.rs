//! Board state: the 25-cell grid, the local completion cache, and scoring.
//!
//! A [`Board`] only ever exists fully populated — a fresh snapshot replaces
//! all 25 cells at once, and a patch rewrites a single cell's colors in
//! place. "No board yet" is a distinct state expressed as `Option<Board>` by
//! the owning session, never as a partially filled board.

use std::collections::BTreeMap;

use crate::error::{BingoError, Result};
use crate::protocol::{slot_index, BingoColor, ColorSet, SquarePayload, BOARD_CELLS};

/// One (color, cell count) entry of the board score.
pub type ScoreEntry = (BingoColor, usize);

/// A single board cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Colors claimed against this cell; empty = unclaimed.
    pub colors: ColorSet,
    /// Objective text. Immutable after snapshot; patches never touch it.
    pub text: String,
}

/// The 25-cell shared board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: std::array::from_fn(|_| Cell::default()),
        }
    }
}

impl Board {
    /// Build a fresh board from a full snapshot.
    ///
    /// Every cell starts empty; each descriptor is placed at the index its
    /// slot identifier resolves to. Descriptors with malformed slots are
    /// skipped without disturbing any other cell.
    ///
    /// # Errors
    ///
    /// Returns [`BingoError::PartialSnapshot`] listing the rejected slot
    /// identifiers. Callers that want the well-formed subset anyway should
    /// log the error and fall back to [`Board::from_snapshot_lossy`].
    pub fn from_snapshot(squares: &[SquarePayload]) -> Result<Self> {
        let (board, rejected) = Self::build(squares);
        if rejected.is_empty() {
            Ok(board)
        } else {
            Err(BingoError::PartialSnapshot { rejected })
        }
    }

    /// Like [`Board::from_snapshot`] but always yields the board, silently
    /// dropping malformed descriptors.
    pub fn from_snapshot_lossy(squares: &[SquarePayload]) -> Self {
        Self::build(squares).0
    }

    fn build(squares: &[SquarePayload]) -> (Self, Vec<String>) {
        let mut board = Self::default();
        let mut rejected = Vec::new();
        for square in squares {
            match slot_index(&square.slot) {
                Ok(i) => {
                    if let Some(cell) = board.cells.get_mut(i) {
                        cell.colors = ColorSet::parse(&square.colors);
                        cell.text = square.name.clone();
                    }
                }
                Err(_) => rejected.push(square.slot.clone()),
            }
        }
        (board, rejected)
    }

    /// Replace only cell `i`'s colors; text and every other cell are
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BingoError::MalformedSlot`] when `i` is out of range.
    pub fn apply_patch(&mut self, i: usize, colors: ColorSet) -> Result<()> {
        let cell = self
            .cells
            .get_mut(i)
            .ok_or_else(|| BingoError::MalformedSlot(format!("index {i}")))?;
        cell.colors = colors;
        Ok(())
    }

    /// The cell at index `i`, or `None` if `i` is out of range.
    pub fn cell(&self, i: usize) -> Option<&Cell> {
        self.cells.get(i)
    }

    /// Number of cells (always 25).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false` for a constructed board; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate cells in index order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Per-color cell counts, ascending by the color's total order.
    ///
    /// A cell claimed by several colors contributes to each of their counts.
    /// Colors claimed nowhere are omitted. The returned iterator is finite
    /// and yields a deterministic order.
    pub fn score(&self) -> impl Iterator<Item = ScoreEntry> {
        let mut counts: BTreeMap<BingoColor, usize> = BTreeMap::new();
        for cell in &self.cells {
            for color in cell.colors.iter() {
                *counts.entry(color).or_insert(0) += 1;
            }
        }
        counts.into_iter()
    }
}

// ── Completion cache ────────────────────────────────────────────────

/// Per-cell record of "this objective was observed complete locally".
///
/// Independent of the board's claim data. Entries only ever go from false to
/// true during normal play; the two sanctioned resets are a full
/// reinitialization when a new card arrives and the explicit downgrade pass
/// that re-derives the whole cache from oracle truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressCache {
    done: [bool; BOARD_CELLS],
}

impl Default for ProgressCache {
    fn default() -> Self {
        Self {
            done: [false; BOARD_CELLS],
        }
    }
}

impl ProgressCache {
    /// A fresh cache with every entry false.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cell `i` was observed complete. Out-of-range reads are false.
    pub fn is_done(&self, i: usize) -> bool {
        self.done.get(i).copied().unwrap_or(false)
    }

    /// Mark cell `i` as observed complete.
    pub fn mark(&mut self, i: usize) {
        if let Some(entry) = self.done.get_mut(i) {
            *entry = true;
        }
    }

    /// Clear cell `i`. Only the downgrade pass may call this.
    pub(crate) fn clear(&mut self, i: usize) {
        if let Some(entry) = self.done.get_mut(i) {
            *entry = false;
        }
    }
}
