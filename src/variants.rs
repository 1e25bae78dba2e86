//! Rule-table-driven variant resolution.
//!
//! Variants are contextual modifier tags that adjust how an objective is
//! interpreted in the current area/mode/checkpoint. Each objective maps to a
//! list of [`VariantRule`]s; a rule matches when every one of its three
//! context fields equals the active value or is a wildcard.

use std::collections::{HashMap, HashSet};

use crate::board::Board;
use crate::oracle::{AreaMode, ProgressOracle, SessionContext};

/// Area the Rock Bottom grabless special case applies to.
const ROCK_BOTTOM_AREA: i32 = 6;

/// The two objective texts the special case recognizes.
const ROCK_BOTTOM_ALIASES: [&str; 2] = [
    "Grabless Rock Bottom",
    "Grabless Rock Bottom (6A/6B Checkpoint)",
];

/// A variant tag altering an objective's interpreted rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    NoGrab,
    NoDash,
    NoJump,
    Invisible,
    LowFriction,
    Hiccups,
}

/// One rule of the variant table. `None` fields are wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantRule {
    pub area: Option<i32>,
    pub mode: Option<AreaMode>,
    pub checkpoint: Option<i32>,
    pub variant: Variant,
}

impl VariantRule {
    /// Build a rule from wire-format fields, where `-1` means match-any.
    pub fn new(area: i32, mode: i32, checkpoint: i32, variant: Variant) -> Self {
        let mode = match mode {
            0 => Some(AreaMode::ASide),
            1 => Some(AreaMode::BSide),
            2 => Some(AreaMode::CSide),
            _ => None,
        };
        Self {
            area: (area >= 0).then_some(area),
            mode,
            checkpoint: (checkpoint >= 0).then_some(checkpoint),
            variant,
        }
    }

    /// Whether this rule applies in the given context.
    pub fn matches(&self, area: i32, mode: AreaMode, checkpoint: i32) -> bool {
        self.area.is_none_or(|a| a == area)
            && self.mode.is_none_or(|m| m == mode)
            && self.checkpoint.is_none_or(|c| c == checkpoint)
    }
}

/// Static mapping from objective text to its variant rules.
///
/// Rule order within an objective is preserved; resolution yields tags in
/// board-index order, then rule order.
#[derive(Debug, Clone, Default)]
pub struct VariantRuleTable {
    rules: HashMap<String, Vec<VariantRule>>,
}

impl VariantRuleTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule for the named objective.
    pub fn insert(&mut self, name: impl Into<String>, rule: VariantRule) {
        self.rules.entry(name.into()).or_default().push(rule);
    }

    /// The rules registered for `name`, if any.
    pub fn rules_for(&self, name: &str) -> Option<&[VariantRule]> {
        self.rules.get(name).map(Vec::as_slice)
    }
}

/// Resolve the variant tags applicable to the current board state.
///
/// Empty when the oracle reports no checkpoint or no session is active.
/// Cells are visited in index order; within a cell, rules in table order.
/// Tags from the generic lookup are deduplicated across the entire
/// resolution — first occurrence wins. The Rock Bottom special case bypasses
/// both the rule table and the dedup set.
pub fn relevant_variants(
    board: &Board,
    session: Option<SessionContext>,
    oracle: &dyn ProgressOracle,
) -> Vec<Variant> {
    let Some(checkpoint) = oracle.at_checkpoint() else {
        return Vec::new();
    };
    let Some(session) = session else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut seen: HashSet<Variant> = HashSet::new();
    for cell in board.cells() {
        if ROCK_BOTTOM_ALIASES.contains(&cell.text.as_str())
            && session.area_id == ROCK_BOTTOM_AREA
            && ((session.mode == AreaMode::ASide && checkpoint == 4)
                || (session.mode == AreaMode::BSide && checkpoint == 2))
        {
            out.push(Variant::NoGrab);
            continue;
        }

        let Some(rules) = oracle.variant_rules(&cell.text) else {
            continue;
        };
        for rule in rules {
            if rule.matches(session.area_id, session.mode, checkpoint)
                && seen.insert(rule.variant)
            {
                out.push(rule.variant);
            }
        }
    }
    out
}
