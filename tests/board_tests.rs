#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
//! Board synchronization properties: full snapshots, single-cell patches,
//! the completion cache, and score aggregation.

use bingo_client::board::{Board, ProgressCache};
use bingo_client::protocol::{ColorSet, SquarePayload, BOARD_CELLS};
use bingo_client::{BingoColor, BingoError};

fn square(slot: &str, name: &str, colors: &str) -> SquarePayload {
    SquarePayload {
        slot: slot.to_string(),
        name: name.to_string(),
        colors: colors.to_string(),
    }
}

// ════════════════════════════════════════════════════════════════════
// Full snapshots
// ════════════════════════════════════════════════════════════════════

#[test]
fn snapshot_always_yields_25_cells() {
    let board = Board::from_snapshot(&[square("slot1", "Only one", "red")]).unwrap();
    assert_eq!(board.len(), BOARD_CELLS);
}

#[test]
fn unlisted_cells_are_empty_and_textless() {
    let board = Board::from_snapshot(&[square("slot7", "Seventh", "blue")]).unwrap();
    for (i, cell) in board.cells().enumerate() {
        if i == 6 {
            assert_eq!(cell.text, "Seventh");
            assert!(cell.colors.contains(BingoColor::Blue));
        } else {
            assert!(cell.colors.is_empty(), "cell {i} should be empty");
            assert!(cell.text.is_empty(), "cell {i} should have no text");
        }
    }
}

#[test]
fn snapshot_places_every_descriptor_by_slot() {
    let squares: Vec<SquarePayload> = (1..=BOARD_CELLS)
        .map(|n| square(&format!("slot{n}"), &format!("Objective {n}"), "blank"))
        .collect();
    let board = Board::from_snapshot(&squares).unwrap();
    for (i, cell) in board.cells().enumerate() {
        assert_eq!(cell.text, format!("Objective {}", i + 1));
    }
}

#[test]
fn malformed_descriptor_does_not_corrupt_other_cells() {
    let squares = vec![
        square("slot1", "Good", "red"),
        square("slotXX", "Bad", "blue"),
        square("slot3", "Also good", "green"),
    ];
    let err = Board::from_snapshot(&squares).unwrap_err();
    match err {
        BingoError::PartialSnapshot { rejected } => assert_eq!(rejected, vec!["slotXX"]),
        other => panic!("expected PartialSnapshot, got {other:?}"),
    }

    let board = Board::from_snapshot_lossy(&squares);
    assert!(board.cell(0).unwrap().colors.contains(BingoColor::Red));
    assert!(board.cell(2).unwrap().colors.contains(BingoColor::Green));
    assert!(board.cells().filter(|c| !c.colors.is_empty()).count() == 2);
}

// ════════════════════════════════════════════════════════════════════
// Patches
// ════════════════════════════════════════════════════════════════════

#[test]
fn patch_changes_only_the_target_cell_colors() {
    let squares: Vec<SquarePayload> = (1..=BOARD_CELLS)
        .map(|n| square(&format!("slot{n}"), &format!("Objective {n}"), "blank"))
        .collect();
    let mut board = Board::from_snapshot(&squares).unwrap();
    let before = board.clone();

    board.apply_patch(11, ColorSet::parse("teal")).unwrap();

    for i in 0..BOARD_CELLS {
        let cell = board.cell(i).unwrap();
        let old = before.cell(i).unwrap();
        assert_eq!(cell.text, old.text, "patch must never change text");
        if i == 11 {
            assert!(cell.colors.contains(BingoColor::Teal));
        } else {
            assert_eq!(cell.colors, old.colors, "cell {i} colors changed");
        }
    }
}

#[test]
fn patch_replaces_colors_wholesale() {
    let mut board = Board::from_snapshot(&[square("slot1", "First", "red blue")]).unwrap();
    board.apply_patch(0, ColorSet::parse("green")).unwrap();
    let colors = &board.cell(0).unwrap().colors;
    assert_eq!(colors.len(), 1);
    assert!(colors.contains(BingoColor::Green));
}

#[test]
fn out_of_range_patch_is_rejected() {
    let mut board = Board::default();
    assert!(matches!(
        board.apply_patch(BOARD_CELLS, ColorSet::new()),
        Err(BingoError::MalformedSlot(_))
    ));
}

// ════════════════════════════════════════════════════════════════════
// Score aggregation
// ════════════════════════════════════════════════════════════════════

#[test]
fn score_counts_multi_color_cells_once_per_color() {
    let board = Board::from_snapshot(&[
        square("slot1", "A", "red"),
        square("slot2", "B", "red blue"),
    ])
    .unwrap();
    let score: Vec<_> = board.score().collect();
    assert_eq!(score, vec![(BingoColor::Blue, 1), (BingoColor::Red, 2)]);
}

#[test]
fn score_is_ordered_and_omits_absent_colors() {
    let board = Board::from_snapshot(&[
        square("slot3", "C", "yellow"),
        square("slot5", "E", "orange yellow"),
        square("slot9", "I", "navy"),
    ])
    .unwrap();
    let score: Vec<_> = board.score().collect();
    assert_eq!(
        score,
        vec![
            (BingoColor::Navy, 1),
            (BingoColor::Orange, 1),
            (BingoColor::Yellow, 2),
        ]
    );
}

#[test]
fn empty_board_scores_nothing() {
    assert_eq!(Board::default().score().count(), 0);
}

// ════════════════════════════════════════════════════════════════════
// Completion cache
// ════════════════════════════════════════════════════════════════════

#[test]
fn fresh_cache_is_all_false() {
    let cache = ProgressCache::new();
    assert!((0..BOARD_CELLS).all(|i| !cache.is_done(i)));
}

#[test]
fn mark_is_sticky_and_indexed() {
    let mut cache = ProgressCache::new();
    cache.mark(4);
    cache.mark(4);
    assert!(cache.is_done(4));
    assert!(!cache.is_done(3));
}

#[test]
fn out_of_range_cache_reads_are_false() {
    let cache = ProgressCache::new();
    assert!(!cache.is_done(BOARD_CELLS));
    assert!(!cache.is_done(usize::MAX));
}
