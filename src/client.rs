//! The bingo client session: event dispatch and frame-poll queries.
//!
//! [`BingoClient`] owns the synchronized board state and routes inbound
//! [`StatusMessage`]s into it. Two activity sources touch that state — the
//! async event stream from the coordinating service and per-frame polls from
//! the host game loop — and they may run on different threads, so the board
//! and completion cache sit behind one mutex. The lock is only ever held for
//! short, non-awaiting sections; in particular the 500 ms settle delay
//! before a resync happens outside it, so a slow resync never stalls the
//! host's frame.
//!
//! # Example
//!
//! ```rust,ignore
//! let client = BingoClient::new(service, BingoConfig::new(BingoColor::Red));
//!
//! // transport task:
//! while let Some(msg) = inbound.recv().await {
//!     client.handle_event(msg).await;
//! }
//!
//! // game loop, once per frame:
//! client.update_objectives(&PollContext { oracle, session, in_gameplay, claim_pressed });
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::board::{Board, ProgressCache, ScoreEntry};
use crate::error::BingoError;
use crate::oracle::{BingoConfig, PollContext};
use crate::protocol::{slot_index, ColorSet, SquarePayload, StatusMessage, BOARD_CELLS};
use crate::service::BingoService;
use crate::status::{self, ObjectiveStatus, ResolveContext};
use crate::variants::{self, Variant};

/// How long to wait after a `new-card` event before fetching the snapshot,
/// so the service finishes emitting the updates that accompany a fresh card.
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Chat line when a connection error arrives while connected.
const RETRYING_LINE: &str = "Connection lost, retrying...";

/// Chat line when a connection error arrives while never connected.
const TRY_AGAIN_LINE: &str = "Could not connect, please try again";

// ── Shared state ────────────────────────────────────────────────────

/// Board and cache, replaced together on every resync.
#[derive(Debug, Default)]
struct BoardState {
    board: Option<Board>,
    progress: Option<ProgressCache>,
}

/// State shared between the event path and the frame-poll path.
struct SharedState {
    /// Set once the service confirms the connection. Read, never written,
    /// by the error branch.
    connected: AtomicBool,
    /// Board hidden from the player; frame polls are no-ops while set.
    hidden: AtomicBool,
    /// Lockout mode active for the current card.
    lockout: AtomicBool,
    board: Mutex<BoardState>,
}

impl SharedState {
    fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            hidden: AtomicBool::new(false),
            lockout: AtomicBool::new(false),
            board: Mutex::new(BoardState::default()),
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// The client-side state-reconciliation engine for one shared board.
///
/// Feed every inbound message to [`handle_event`](BingoClient::handle_event)
/// in arrival order. Query methods such as
/// [`objective_status`](BingoClient::objective_status) and
/// [`score`](BingoClient::score) take a brief lock and can be called from
/// any thread.
pub struct BingoClient<S: BingoService> {
    service: S,
    config: BingoConfig,
    state: Arc<SharedState>,
}

impl<S: BingoService> BingoClient<S> {
    /// Create a client with no board yet. The board stays uninitialized
    /// until the first `new-card` event triggers a resync.
    pub fn new(service: S, config: BingoConfig) -> Self {
        Self {
            service,
            config,
            state: Arc::new(SharedState::new()),
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────

    /// Process one inbound message from the coordinating service.
    ///
    /// Messages must be supplied in the service's emission order and this
    /// method must not be re-entered concurrently with itself. The rendered
    /// chat line, if any, is logged before any state mutation.
    ///
    /// Anticipated failures (malformed slots, patches before a snapshot,
    /// unknown message kinds, failed snapshot fetches) degrade to a log line
    /// plus no-op; nothing propagates out.
    pub async fn handle_event(&self, msg: StatusMessage) {
        if let Some(line) = msg.render() {
            self.service.log_chat(&line);
        }

        match msg.kind.as_str() {
            "connection" => {
                if msg.event_type.as_deref() == Some("connected") {
                    self.state.connected.store(true, Ordering::Release);
                    debug!("lifecycle: connected");
                }
            }
            "goal" => self.apply_goal(msg.square.as_ref()),
            "new-card" => {
                let settings = self.service.settings();
                self.state.hidden.store(settings.hidden, Ordering::Release);
                self.state.lockout.store(settings.lockout, Ordering::Release);
                tokio::time::sleep(SETTLE_DELAY).await;
                self.refresh_board().await;
            }
            // Covered entirely by the generic chat-line forwarding above.
            "color" | "chat" | "revealed" => {}
            "error" => {
                if self.state.connected.load(Ordering::Acquire) {
                    self.service.log_chat(RETRYING_LINE);
                    self.service.reconnect();
                } else {
                    self.service.log_chat(TRY_AGAIN_LINE);
                    self.service.disconnect();
                }
            }
            other => {
                warn!("unknown message type {other:?}");
            }
        }
    }

    /// Apply the single-cell patch carried by a `goal` message.
    fn apply_goal(&self, square: Option<&SquarePayload>) {
        let Some(square) = square else {
            warn!("goal message without square payload");
            return;
        };
        let i = match slot_index(&square.slot) {
            Ok(i) => i,
            Err(e) => {
                warn!("dropping goal update: {e}");
                return;
            }
        };
        let colors = ColorSet::parse(&square.colors);

        let mut guard = self.lock_board();
        match guard.board.as_mut() {
            Some(board) => {
                if let Err(e) = board.apply_patch(i, colors) {
                    warn!("dropping goal update: {e}");
                }
            }
            // A goal may arrive before the first snapshot; keep going.
            None => debug!("dropping goal update: {}", BingoError::BoardUninitialized),
        }
    }

    /// Fetch a full snapshot and replace the board and cache together.
    ///
    /// On fetch failure the previous board is kept. A snapshot with
    /// malformed descriptors is applied for its well-formed subset.
    async fn refresh_board(&self) {
        let squares = match self.service.fetch_board().await {
            Ok(squares) => squares,
            Err(e) => {
                warn!("board refresh failed: {e}");
                return;
            }
        };
        let board = match Board::from_snapshot(&squares) {
            Ok(board) => board,
            Err(e) => {
                warn!("{e}");
                Board::from_snapshot_lossy(&squares)
            }
        };

        let mut guard = self.lock_board();
        guard.board = Some(board);
        guard.progress = Some(ProgressCache::new());
        debug!("board refreshed");
    }

    // ── Frame-poll operations ───────────────────────────────────────

    /// Per-frame sweep of locally observed completions.
    ///
    /// For every cell whose resolved status is [`ObjectiveStatus::Completed`]:
    /// a cache entry not yet set is set and announced in chat; if claim
    /// assist is enabled and the claim input was pressed this frame, a claim
    /// is submitted. Entirely a no-op while the board is hidden, while the
    /// host is not in gameplay, or before the cache exists.
    pub fn update_objectives(&self, ctx: &PollContext<'_>) {
        if self.state.hidden.load(Ordering::Acquire) || !ctx.in_gameplay {
            return;
        }
        let rctx = self.resolve_context(ctx);

        let mut guard = self.lock_board();
        let BoardState { board, progress } = &mut *guard;
        let Some(progress) = progress.as_mut() else {
            return;
        };

        for i in 0..BOARD_CELLS {
            let s = status::resolve(board.as_ref(), Some(&*progress), i, rctx, ctx.oracle);
            if s != ObjectiveStatus::Completed {
                continue;
            }

            if !progress.is_done(i) {
                progress.mark(i);
                let text = board
                    .as_ref()
                    .and_then(|b| b.cell(i))
                    .map(|cell| cell.text.as_str())
                    .unwrap_or_default();
                self.service.log_chat(&format!("Ready to claim: {text}"));
            }

            if self.config.claim_assist && ctx.claim_pressed {
                self.service.send_claim(i);
            }
        }
    }

    /// Rebuild the whole completion cache from current oracle truth.
    ///
    /// Drift recovery: every entry is reset and re-derived, so completions
    /// the oracle no longer reports are dropped. Never used for normal
    /// progression.
    pub fn downgrade_objectives(&self, ctx: &PollContext<'_>) {
        let rctx = self.resolve_context(ctx);

        let mut guard = self.lock_board();
        let BoardState { board, progress } = &mut *guard;
        let Some(progress) = progress.as_mut() else {
            return;
        };

        for i in 0..BOARD_CELLS {
            progress.clear(i);
            let s = status::resolve(board.as_ref(), Some(&*progress), i, rctx, ctx.oracle);
            if s == ObjectiveStatus::Completed {
                progress.mark(i);
            }
        }
    }

    /// Resolved status of cell `i`. See [`status::resolve`] for the
    /// precedence rules.
    pub fn objective_status(&self, i: usize, ctx: &PollContext<'_>) -> ObjectiveStatus {
        let rctx = self.resolve_context(ctx);
        let guard = self.lock_board();
        status::resolve(guard.board.as_ref(), guard.progress.as_ref(), i, rctx, ctx.oracle)
    }

    /// Whether cell `i` is done locally but not yet claimed by anyone.
    pub fn is_claimable(&self, i: usize) -> bool {
        let guard = self.lock_board();
        status::is_claimable(guard.board.as_ref(), guard.progress.as_ref(), i)
    }

    /// Per-color cell counts in ascending color order. Empty before the
    /// first snapshot.
    pub fn score(&self) -> Vec<ScoreEntry> {
        let guard = self.lock_board();
        guard
            .board
            .as_ref()
            .map(|board| board.score().collect())
            .unwrap_or_default()
    }

    /// Variant tags applicable to the current board state. Empty before the
    /// first snapshot, outside a session, or away from a checkpoint.
    pub fn relevant_variants(&self, ctx: &PollContext<'_>) -> Vec<Variant> {
        let guard = self.lock_board();
        guard
            .board
            .as_ref()
            .map(|board| variants::relevant_variants(board, ctx.session, ctx.oracle))
            .unwrap_or_default()
    }

    // ── State accessors ─────────────────────────────────────────────

    /// Whether the service has confirmed the connection this session.
    pub fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::Acquire)
    }

    /// Whether the current card is hidden from the player.
    pub fn is_board_hidden(&self) -> bool {
        self.state.hidden.load(Ordering::Acquire)
    }

    /// Whether lockout mode is active for the current card.
    pub fn is_lockout(&self) -> bool {
        self.state.lockout.load(Ordering::Acquire)
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn resolve_context(&self, ctx: &PollContext<'_>) -> ResolveContext {
        ResolveContext {
            player_color: self.config.player_color,
            lockout: self.state.lockout.load(Ordering::Acquire),
            save_active: ctx.session.is_some(),
        }
    }

    fn lock_board(&self) -> MutexGuard<'_, BoardState> {
        // A poisoned lock only means another thread panicked mid-update;
        // the board is still structurally valid (whole-or-nothing writes).
        self.state.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: BingoService> std::fmt::Debug for BingoClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.lock_board();
        f.debug_struct("BingoClient")
            .field("connected", &self.is_connected())
            .field("hidden", &self.is_board_hidden())
            .field("lockout", &self.is_lockout())
            .field("has_board", &guard.board.is_some())
            .finish()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::error::BingoError;
    use crate::oracle::ProgressOracle;
    use crate::protocol::BingoColor;
    use crate::service::BoardSettings;
    use crate::variants::VariantRule;
    use std::sync::Mutex as StdMutex;

    // ── Mock collaborators ──────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Chat(String),
        Reconnect,
        Disconnect,
        Claim(usize),
        FetchBoard,
    }

    /// Records every collaborator call and replays a scripted snapshot.
    struct MockService {
        calls: Arc<StdMutex<Vec<Call>>>,
        snapshot: StdMutex<Option<crate::error::Result<Vec<SquarePayload>>>>,
        settings: BoardSettings,
    }

    impl MockService {
        fn new() -> (Self, Arc<StdMutex<Vec<Call>>>) {
            let calls = Arc::new(StdMutex::new(Vec::new()));
            let service = Self {
                calls: Arc::clone(&calls),
                snapshot: StdMutex::new(Some(Ok(Vec::new()))),
                settings: BoardSettings::default(),
            };
            (service, calls)
        }

        fn with_settings(mut self, settings: BoardSettings) -> Self {
            self.settings = settings;
            self
        }

        fn with_snapshot(self, snapshot: crate::error::Result<Vec<SquarePayload>>) -> Self {
            *self.snapshot.lock().unwrap() = Some(snapshot);
            self
        }
    }

    #[async_trait::async_trait]
    impl BingoService for MockService {
        async fn fetch_board(&self) -> crate::error::Result<Vec<SquarePayload>> {
            self.calls.lock().unwrap().push(Call::FetchBoard);
            self.snapshot
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        fn settings(&self) -> BoardSettings {
            self.settings
        }

        fn log_chat(&self, line: &str) {
            self.calls.lock().unwrap().push(Call::Chat(line.to_string()));
        }

        fn reconnect(&self) {
            self.calls.lock().unwrap().push(Call::Reconnect);
        }

        fn disconnect(&self) {
            self.calls.lock().unwrap().push(Call::Disconnect);
        }

        fn send_claim(&self, index: usize) {
            self.calls.lock().unwrap().push(Call::Claim(index));
        }
    }

    /// Oracle that tracks nothing.
    struct EmptyOracle;

    impl ProgressOracle for EmptyOracle {
        fn has_objective(&self, _name: &str) -> bool {
            false
        }
        fn progress(&self, _name: &str) -> f32 {
            0.0
        }
        fn at_checkpoint(&self) -> Option<i32> {
            None
        }
        fn variant_rules(&self, _name: &str) -> Option<&[VariantRule]> {
            None
        }
    }

    fn msg(kind: &str) -> StatusMessage {
        StatusMessage {
            kind: kind.to_string(),
            event_type: None,
            square: None,
            player: None,
            text: None,
            remove: false,
        }
    }

    fn square(slot: &str, name: &str, colors: &str) -> SquarePayload {
        SquarePayload {
            slot: slot.to_string(),
            name: name.to_string(),
            colors: colors.to_string(),
        }
    }

    fn client(service: MockService) -> BingoClient<MockService> {
        BingoClient::new(service, BingoConfig::new(BingoColor::Red))
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    #[tokio::test]
    async fn connected_event_sets_lifecycle() {
        let (service, _calls) = MockService::new();
        let client = client(service);
        assert!(!client.is_connected());

        let mut connected = msg("connection");
        connected.event_type = Some("connected".to_string());
        client.handle_event(connected).await;
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn disconnected_event_does_not_change_lifecycle() {
        let (service, _calls) = MockService::new();
        let client = client(service);

        let mut connected = msg("connection");
        connected.event_type = Some("connected".to_string());
        client.handle_event(connected).await;

        let mut disconnected = msg("connection");
        disconnected.event_type = Some("disconnected".to_string());
        client.handle_event(disconnected).await;
        // The flag records "ever connected this session".
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn error_while_connected_reconnects() {
        let (service, calls) = MockService::new();
        let client = client(service);

        let mut connected = msg("connection");
        connected.event_type = Some("connected".to_string());
        client.handle_event(connected).await;
        client.handle_event(msg("error")).await;

        let calls = calls.lock().unwrap();
        assert!(calls.contains(&Call::Chat(RETRYING_LINE.to_string())));
        assert!(calls.contains(&Call::Reconnect));
        assert!(!calls.contains(&Call::Disconnect));
    }

    #[tokio::test]
    async fn error_while_not_connected_disconnects() {
        let (service, calls) = MockService::new();
        let client = client(service);

        client.handle_event(msg("error")).await;

        let calls = calls.lock().unwrap();
        assert!(calls.contains(&Call::Chat(TRY_AGAIN_LINE.to_string())));
        assert!(calls.contains(&Call::Disconnect));
        assert!(!calls.contains(&Call::Reconnect));
    }

    // ── Goal patches ────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn goal_patches_single_cell() {
        let (service, _calls) = MockService::new();
        let service = service.with_snapshot(Ok(vec![
            square("slot1", "First", "blank"),
            square("slot2", "Second", "blank"),
        ]));
        let client = client(service);
        client.handle_event(msg("new-card")).await;

        let mut goal = msg("goal");
        goal.square = Some(square("slot2", "Second", "red"));
        client.handle_event(goal).await;

        let guard = client.lock_board();
        let board = guard.board.as_ref().unwrap();
        assert!(board.cell(1).unwrap().colors.contains(BingoColor::Red));
        assert!(board.cell(0).unwrap().colors.is_empty());
        assert_eq!(board.cell(1).unwrap().text, "Second");
    }

    #[tokio::test]
    async fn goal_before_snapshot_is_a_noop() {
        let (service, _calls) = MockService::new();
        let client = client(service);

        let mut goal = msg("goal");
        goal.square = Some(square("slot3", "Third", "blue"));
        client.handle_event(goal).await;

        assert!(client.lock_board().board.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_goal_slot_is_dropped() {
        let (service, _calls) = MockService::new();
        let service = service.with_snapshot(Ok(vec![square("slot1", "First", "blank")]));
        let client = client(service);
        client.handle_event(msg("new-card")).await;

        let mut goal = msg("goal");
        goal.square = Some(square("slotXY", "Bogus", "red"));
        client.handle_event(goal).await;

        let guard = client.lock_board();
        let board = guard.board.as_ref().unwrap();
        assert!(board.cells().all(|cell| cell.colors.is_empty()));
    }

    // ── New card ────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn new_card_reads_settings_and_resyncs() {
        let (service, calls) = MockService::new();
        let service = service
            .with_settings(BoardSettings {
                hidden: true,
                lockout: true,
            })
            .with_snapshot(Ok(vec![square("slot5", "Fifth", "navy")]));
        let client = client(service);

        client.handle_event(msg("new-card")).await;

        assert!(client.is_board_hidden());
        assert!(client.is_lockout());
        assert!(calls.lock().unwrap().contains(&Call::FetchBoard));

        let guard = client.lock_board();
        assert!(guard.board.as_ref().unwrap().cell(4).unwrap().colors.contains(BingoColor::Navy));
        assert!(guard.progress.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_previous_board() {
        let (service, _calls) = MockService::new();
        let service = service.with_snapshot(Ok(vec![square("slot1", "First", "green")]));
        let client = client(service);
        client.handle_event(msg("new-card")).await;

        *client.service.snapshot.lock().unwrap() =
            Some(Err(BingoError::Service("offline".to_string())));
        client.handle_event(msg("new-card")).await;

        let guard = client.lock_board();
        let board = guard.board.as_ref().unwrap();
        assert!(board.cell(0).unwrap().colors.contains(BingoColor::Green));
    }

    // ── Unknown kinds ───────────────────────────────────────────────

    #[tokio::test]
    async fn unknown_kind_does_not_mutate_state() {
        let (service, calls) = MockService::new();
        let client = client(service);

        client.handle_event(msg("mystery-broadcast")).await;

        assert!(!client.is_connected());
        assert!(client.lock_board().board.is_none());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn chat_line_precedes_structural_handling() {
        let (service, calls) = MockService::new();
        let client = client(service);

        let mut chat = msg("error");
        chat.text = Some("ignored".to_string());
        client.handle_event(chat).await;

        // The error branch chat comes from the branch itself; an error
        // message has no rendered line, so only the branch line appears.
        let calls = calls.lock().unwrap();
        assert_eq!(calls[0], Call::Chat(TRY_AGAIN_LINE.to_string()));
    }

    // ── Frame polls ─────────────────────────────────────────────────

    #[tokio::test]
    async fn update_objectives_before_cache_is_a_noop() {
        let (service, calls) = MockService::new();
        let client = client(service);
        let oracle = EmptyOracle;
        let ctx = PollContext {
            oracle: &oracle,
            session: None,
            in_gameplay: true,
            claim_pressed: false,
        };

        client.update_objectives(&ctx);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_board_suppresses_update_objectives() {
        let (service, calls) = MockService::new();
        let service = service
            .with_settings(BoardSettings {
                hidden: true,
                lockout: false,
            })
            .with_snapshot(Ok(vec![square("slot1", "First", "blank")]));
        let client = client(service);
        client.handle_event(msg("new-card")).await;
        calls.lock().unwrap().clear();

        let oracle = EmptyOracle;
        let ctx = PollContext {
            oracle: &oracle,
            session: None,
            in_gameplay: true,
            claim_pressed: false,
        };
        client.update_objectives(&ctx);
        assert!(calls.lock().unwrap().is_empty());
    }
}
