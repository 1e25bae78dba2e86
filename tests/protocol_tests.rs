#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
//! Wire-schema tests: status-message deserialization against fixture JSON,
//! lenient color decoding, slot-identifier parsing, and chat-line rendering.

use bingo_client::protocol::{slot_index, BingoColor, ColorSet, StatusMessage};
use bingo_client::BingoError;

// ════════════════════════════════════════════════════════════════════
// StatusMessage fixtures
// ════════════════════════════════════════════════════════════════════

#[test]
fn goal_message_from_fixture() {
    let json = r#"{
        "type": "goal",
        "player": { "name": "Alice", "color": "red" },
        "square": { "slot": "slot13", "name": "Collect 5 berries", "colors": "red blue" },
        "remove": false
    }"#;
    let msg: StatusMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.kind, "goal");
    let square = msg.square.as_ref().unwrap();
    assert_eq!(square.slot, "slot13");
    assert_eq!(square.name, "Collect 5 berries");
    let colors = ColorSet::parse(&square.colors);
    assert!(colors.contains(BingoColor::Red));
    assert!(colors.contains(BingoColor::Blue));
}

#[test]
fn connection_message_from_fixture() {
    let json = r#"{
        "type": "connection",
        "event_type": "connected",
        "player": { "name": "Bob" }
    }"#;
    let msg: StatusMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.kind, "connection");
    assert_eq!(msg.event_type.as_deref(), Some("connected"));
    assert!(msg.player.as_ref().unwrap().color.is_none());
}

#[test]
fn unknown_kind_is_preserved() {
    let json = r#"{ "type": "server-maintenance", "text": "back soon" }"#;
    let msg: StatusMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.kind, "server-maintenance");
    assert_eq!(msg.text.as_deref(), Some("back soon"));
}

#[test]
fn minimal_message_needs_only_type() {
    let msg: StatusMessage = serde_json::from_str(r#"{ "type": "revealed" }"#).unwrap();
    assert_eq!(msg.kind, "revealed");
    assert!(msg.square.is_none());
    assert!(msg.player.is_none());
    assert!(!msg.remove);
}

// ════════════════════════════════════════════════════════════════════
// Color decoding
// ════════════════════════════════════════════════════════════════════

#[test]
fn color_list_decodes_known_tokens() {
    let colors = ColorSet::parse("red blue green");
    assert_eq!(colors.len(), 3);
    assert!(colors.contains(BingoColor::Red));
    assert!(colors.contains(BingoColor::Blue));
    assert!(colors.contains(BingoColor::Green));
}

#[test]
fn blank_token_decodes_to_empty_set() {
    assert!(ColorSet::parse("blank").is_empty());
}

#[test]
fn unknown_tokens_are_dropped_not_fatal() {
    let colors = ColorSet::parse("red chartreuse blue");
    assert_eq!(colors.len(), 2);
    assert!(colors.contains(BingoColor::Red));
    assert!(colors.contains(BingoColor::Blue));
}

#[test]
fn empty_and_whitespace_lists_decode_to_empty() {
    assert!(ColorSet::parse("").is_empty());
    assert!(ColorSet::parse("   ").is_empty());
}

#[test]
fn color_set_iterates_in_total_order() {
    let colors = ColorSet::parse("yellow red orange");
    let ordered: Vec<BingoColor> = colors.iter().collect();
    assert_eq!(
        ordered,
        vec![BingoColor::Orange, BingoColor::Red, BingoColor::Yellow]
    );
}

#[test]
fn color_serde_uses_lowercase_names() {
    let json = serde_json::to_string(&BingoColor::Navy).unwrap();
    assert_eq!(json, r#""navy""#);
    let color: BingoColor = serde_json::from_str(r#""teal""#).unwrap();
    assert_eq!(color, BingoColor::Teal);
}

// ════════════════════════════════════════════════════════════════════
// Slot identifiers
// ════════════════════════════════════════════════════════════════════

#[test]
fn slot_identifiers_map_to_zero_based_indices() {
    assert_eq!(slot_index("slot1").unwrap(), 0);
    assert_eq!(slot_index("slot13").unwrap(), 12);
    assert_eq!(slot_index("slot25").unwrap(), 24);
}

#[test]
fn malformed_slots_are_rejected() {
    for bad in ["", "slot", "slotXY", "cell5", "slot0", "slot26", "slot-3"] {
        assert!(
            matches!(slot_index(bad), Err(BingoError::MalformedSlot(_))),
            "expected MalformedSlot for {bad:?}"
        );
    }
}

// ════════════════════════════════════════════════════════════════════
// Chat-line rendering
// ════════════════════════════════════════════════════════════════════

fn parse(json: &str) -> StatusMessage {
    serde_json::from_str(json).unwrap()
}

#[test]
fn chat_message_renders_name_and_text() {
    let msg = parse(r#"{ "type": "chat", "player": { "name": "Alice" }, "text": "hi all" }"#);
    assert_eq!(msg.render().as_deref(), Some("Alice: hi all"));
}

#[test]
fn goal_message_renders_mark_and_clear() {
    let marked = parse(
        r#"{ "type": "goal", "player": { "name": "Bob" },
             "square": { "slot": "slot2", "name": "Find the key", "colors": "red" } }"#,
    );
    assert_eq!(marked.render().as_deref(), Some("Bob marked Find the key"));

    let cleared = parse(
        r#"{ "type": "goal", "player": { "name": "Bob" }, "remove": true,
             "square": { "slot": "slot2", "name": "Find the key", "colors": "blank" } }"#,
    );
    assert_eq!(cleared.render().as_deref(), Some("Bob cleared Find the key"));
}

#[test]
fn connection_message_renders_event() {
    let msg = parse(
        r#"{ "type": "connection", "event_type": "disconnected", "player": { "name": "Eve" } }"#,
    );
    assert_eq!(msg.render().as_deref(), Some("Eve disconnected"));
}

#[test]
fn color_change_renders_new_color() {
    let msg = parse(r#"{ "type": "color", "player": { "name": "Eve", "color": "purple" } }"#);
    assert_eq!(msg.render().as_deref(), Some("Eve changed color to purple"));
}

#[test]
fn messages_without_renderable_fields_render_nothing() {
    assert!(parse(r#"{ "type": "chat" }"#).render().is_none());
    assert!(parse(r#"{ "type": "goal" }"#).render().is_none());
    assert!(parse(r#"{ "type": "error" }"#).render().is_none());
    assert!(parse(r#"{ "type": "new-card" }"#).render().is_none());
}
