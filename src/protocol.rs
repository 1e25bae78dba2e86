//! Wire types for the coordinating bingo service.
//!
//! Every type in this module deserializes the JSON the service pushes over
//! its socket. The schema is deliberately loose on the service side, so the
//! decoders here are lenient where the data is lenient:
//!
//! - color lists are whitespace-separated tokens; unknown tokens are dropped
//! - `type` is an open-ended string; unknown kinds are kept as raw tags
//! - optional fields (`square`, `player`, `text`) default to `None`

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BingoError, Result};

/// Number of cells on a bingo board.
pub const BOARD_CELLS: usize = 25;

/// Fixed prefix of every slot identifier (`"slot1"` .. `"slot25"`).
const SLOT_PREFIX: &str = "slot";

// ── Colors ──────────────────────────────────────────────────────────

/// A claim color recognized by the service.
///
/// The derived `Ord` follows declaration order and is the total order used
/// for deterministic score and color-set iteration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BingoColor {
    Blue,
    Brown,
    Green,
    Navy,
    Orange,
    Pink,
    Purple,
    Red,
    Teal,
    Yellow,
}

impl BingoColor {
    /// Parse a single lowercase color token. Returns `None` for anything
    /// unrecognized, including the service's `"blank"` placeholder.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "blue" => Some(Self::Blue),
            "brown" => Some(Self::Brown),
            "green" => Some(Self::Green),
            "navy" => Some(Self::Navy),
            "orange" => Some(Self::Orange),
            "pink" => Some(Self::Pink),
            "purple" => Some(Self::Purple),
            "red" => Some(Self::Red),
            "teal" => Some(Self::Teal),
            "yellow" => Some(Self::Yellow),
            _ => None,
        }
    }

    /// The lowercase wire name of this color.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Brown => "brown",
            Self::Green => "green",
            Self::Navy => "navy",
            Self::Orange => "orange",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Teal => "teal",
            Self::Yellow => "yellow",
        }
    }
}

impl fmt::Display for BingoColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered set of claim colors.
///
/// Backed by a `BTreeSet` so iteration always follows the [`BingoColor`]
/// total order. An empty set means the cell is unclaimed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSet(BTreeSet<BingoColor>);

impl ColorSet {
    /// Create an empty color set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a whitespace-separated color token list.
    ///
    /// Unrecognized tokens (including `"blank"`, which the service emits for
    /// unclaimed squares) are dropped. One bad token never fails the rest of
    /// the list.
    pub fn parse(tokens: &str) -> Self {
        Self(
            tokens
                .split_whitespace()
                .filter_map(BingoColor::from_token)
                .collect(),
        )
    }

    /// Returns `true` if the set contains `color`.
    pub fn contains(&self, color: BingoColor) -> bool {
        self.0.contains(&color)
    }

    /// Returns `true` if no colors are present (unclaimed cell).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct colors in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert a color, returning `true` if it was not already present.
    pub fn insert(&mut self, color: BingoColor) -> bool {
        self.0.insert(color)
    }

    /// Iterate colors in ascending color order.
    pub fn iter(&self) -> impl Iterator<Item = BingoColor> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<BingoColor> for ColorSet {
    fn from_iter<I: IntoIterator<Item = BingoColor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Slot identifiers ────────────────────────────────────────────────

/// Resolve a textual slot identifier (`"slotNN"`, NN 1-based) to a board
/// index in `0..25`.
///
/// # Errors
///
/// Returns [`BingoError::MalformedSlot`] if the prefix is missing, the
/// remainder is not an integer, or the ordinal falls outside `1..=25`.
pub fn slot_index(slot: &str) -> Result<usize> {
    let ordinal = slot
        .strip_prefix(SLOT_PREFIX)
        .and_then(|rest| rest.parse::<usize>().ok())
        .ok_or_else(|| BingoError::MalformedSlot(slot.to_string()))?;
    if !(1..=BOARD_CELLS).contains(&ordinal) {
        return Err(BingoError::MalformedSlot(slot.to_string()));
    }
    Ok(ordinal - 1)
}

// ── Message payloads ────────────────────────────────────────────────

/// One square descriptor as carried by snapshots and `goal` events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquarePayload {
    /// Slot identifier of the form `"slotNN"`, NN 1-based.
    pub slot: String,
    /// Objective text; the join key into progress oracles and rule tables.
    #[serde(default)]
    pub name: String,
    /// Whitespace-separated color token list (`"blank"` when unclaimed).
    #[serde(default)]
    pub colors: String,
}

/// The player a message is attributed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPayload {
    pub name: String,
    #[serde(default)]
    pub color: Option<BingoColor>,
}

/// An inbound event from the coordinating service.
///
/// `kind` is open-ended on purpose: the service may emit message types this
/// client does not know, and those must surface in diagnostics with their
/// raw tag rather than fail deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Message type tag (`"connection"`, `"goal"`, `"new-card"`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Sub-type for `connection` messages (`"connected"` / `"disconnected"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Square descriptor for `goal` messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square: Option<SquarePayload>,
    /// Attributed player, when the event originates from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerPayload>,
    /// Free text for `chat` messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on `goal` messages that clear a claim instead of adding one.
    #[serde(default)]
    pub remove: bool,
}

impl StatusMessage {
    /// Render the user-visible chat line for this message, if it has one.
    ///
    /// Returns `None` for message kinds with no renderable form or when the
    /// fields needed to render are absent.
    pub fn render(&self) -> Option<String> {
        match self.kind.as_str() {
            "chat" => {
                let player = self.player.as_ref()?;
                let text = self.text.as_deref()?;
                Some(format!("{}: {}", player.name, text))
            }
            "goal" => {
                let player = self.player.as_ref()?;
                let square = self.square.as_ref()?;
                let verb = if self.remove { "cleared" } else { "marked" };
                Some(format!("{} {} {}", player.name, verb, square.name))
            }
            "connection" => {
                let player = self.player.as_ref()?;
                let event = self.event_type.as_deref()?;
                Some(format!("{} {}", player.name, event))
            }
            "color" => {
                let player = self.player.as_ref()?;
                let color = player.color?;
                Some(format!("{} changed color to {}", player.name, color))
            }
            "revealed" => Some("The card has been revealed".to_string()),
            _ => None,
        }
    }
}
