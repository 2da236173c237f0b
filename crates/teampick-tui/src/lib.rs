// Terminal front end: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the controller's last snapshot plus
// purely local state (the name being typed, the highlighted row, running
// animations). The controller pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::debug;

use teampick_core::draft::{Phase, Player, PlayerId, Side, WheelSpin};
use teampick_core::protocol::{Banner, DraftSnapshot, UiUpdate, UserCommand};
use teampick_core::store::SavedRoster;

use layout::build_layout;

// ---------------------------------------------------------------------------
// SpinAnimation
// ---------------------------------------------------------------------------

/// A roulette spin being animated on screen.
#[derive(Debug, Clone)]
pub struct SpinAnimation {
    pub spin: WheelSpin,
    pub started: Instant,
    pub duration: Duration,
}

impl SpinAnimation {
    /// Fraction of the spin elapsed at `now`, in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Wheel segment under the pointer at `now`.
    pub fn pointer_segment(&self, now: Instant) -> usize {
        self.spin.plan.segment_at_progress(self.progress(now))
    }

    pub fn rotation(&self, now: Instant) -> f64 {
        self.spin.plan.rotation_at(self.progress(now))
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the controller state for rendering.
pub struct ViewState {
    /// Last snapshot pushed by the controller.
    pub snapshot: DraftSnapshot,
    /// Roster from the previous session, offered while the roster is empty.
    pub saved_roster: SavedRoster,
    /// Name being typed in the roster phase.
    pub name_input: String,
    /// Highlighted row in the phase's selectable list.
    pub selected: usize,
    /// Wheel currently turning (or resting on its winner).
    pub spin: Option<SpinAnimation>,
    /// Winner announced once the wheel stops.
    pub revealed: Option<(Side, Player)>,
    /// Banner on screen and when it disappears.
    pub banner: Option<(Banner, Instant)>,
    /// Celebration runs until this instant.
    pub celebration_until: Option<Instant>,
    /// Clock the widgets render against; advanced on every render tick.
    pub now: Instant,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            snapshot: DraftSnapshot::default(),
            saved_roster: SavedRoster::default(),
            name_input: String::new(),
            selected: 0,
            spin: None,
            revealed: None,
            banner: None,
            celebration_until: None,
            now: Instant::now(),
        }
    }
}

impl ViewState {
    /// Replace the mirrored snapshot, dropping wheel state that belongs to a
    /// step the controller has moved past.
    pub fn apply_snapshot(&mut self, snapshot: DraftSnapshot) {
        let step_changed = snapshot.roulette_step != self.snapshot.roulette_step
            || snapshot.phase != self.snapshot.phase;
        if step_changed {
            self.spin = None;
            self.revealed = None;
        }
        if snapshot.phase != self.snapshot.phase {
            self.selected = 0;
        }
        self.snapshot = snapshot;
        self.clamp_selection();
    }

    /// Players the arrow keys move through in the current phase.
    pub fn selectable(&self) -> Vec<&Player> {
        match self.snapshot.phase {
            Phase::Roster => self.snapshot.roster.iter().collect(),
            Phase::CaptainSelect => self.snapshot.captain_candidates.iter().collect(),
            Phase::Drafting => self.snapshot.remaining.iter().map(|e| &e.player).collect(),
            Phase::Roulette | Phase::NumbersAssigned | Phase::Complete => Vec::new(),
        }
    }

    pub fn selected_player(&self) -> Option<PlayerId> {
        self.selectable().get(self.selected).map(|p| p.id)
    }

    pub fn select_next(&mut self) {
        let len = self.selectable().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The saved roster can be reloaded only into an empty roster.
    pub fn can_load_saved(&self) -> bool {
        self.snapshot.phase == Phase::Roster
            && self.snapshot.roster.is_empty()
            && !self.saved_roster.is_empty()
    }

    pub fn active_banner(&self) -> Option<Banner> {
        self.banner
            .filter(|(_, until)| *until > self.now)
            .map(|(banner, _)| banner)
    }

    pub fn celebrating(&self) -> bool {
        self.celebration_until.is_some_and(|until| until > self.now)
    }

    /// Advance the render clock and drop expired effects.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        if self.banner.is_some_and(|(_, until)| until <= now) {
            self.banner = None;
        }
        if self.celebration_until.is_some_and(|until| until <= now) {
            self.celebration_until = None;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.selectable().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    let now = state.now;
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::SavedRoster(saved) => {
            state.saved_roster = saved;
        }
        UiUpdate::SpinStarted { spin, duration } => {
            state.revealed = None;
            state.spin = Some(SpinAnimation {
                spin: *spin,
                started: now,
                duration,
            });
        }
        UiUpdate::WinnerRevealed { side, winner } => {
            state.revealed = Some((side, winner));
        }
        UiUpdate::Banner { banner, duration } => {
            state.banner = Some((banner, now + duration));
        }
        UiUpdate::Celebration { duration } => {
            state.celebration_until = Some(now + duration);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame for the current phase.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::banner::render(frame, layout.banner, state);

    match state.snapshot.phase {
        Phase::Roster => widgets::roster::render(frame, layout.main_panel, state),
        Phase::Roulette => widgets::wheel::render(frame, layout.main_panel, state),
        Phase::CaptainSelect => widgets::captains::render(frame, layout.main_panel, state),
        Phase::NumbersAssigned | Phase::Drafting | Phase::Complete => {
            widgets::pool::render(frame, layout.main_panel, state)
        }
    }

    widgets::teams::render(frame, layout.messi_team, state, Side::Messi);
    widgets::teams::render(frame, layout.ronaldo_team, state, Side::Ronaldo);
    widgets::help_bar::render(frame, layout.help_bar, state);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// Initializes the terminal, restores it on panic, then selects over UI
/// updates, keyboard input and a ~30 fps render tick until the user quits
/// or the controller hangs up.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        view_state.tick(Instant::now());
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    // Controller is shutting down.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!("Terminal input error: {}", e);
                        break Err(e.into());
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                view_state.tick(Instant::now());
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test_support {
    use teampick_core::draft::{CaptainMode, Phase, Player, PlayerId, Side};
    use teampick_core::protocol::{DraftSnapshot, PoolEntry};

    pub fn player(id: u64, name: &str) -> Player {
        Player {
            id: PlayerId(id),
            name: name.to_string(),
        }
    }

    pub fn roster(names: &[&str]) -> Vec<Player> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| player(i as u64 + 1, n))
            .collect()
    }

    /// Four players, captains A and C, numbers 2 and 1 over B and D.
    pub fn drafting_snapshot() -> DraftSnapshot {
        let players = roster(&["A", "B", "C", "D"]);
        DraftSnapshot {
            phase: Phase::Drafting,
            captain_mode: CaptainMode::Manual,
            current_picker: Side::Messi,
            roster: players.clone(),
            messi_captain: Some(players[0].clone()),
            ronaldo_captain: Some(players[2].clone()),
            numbers: [(PlayerId(2), 2), (PlayerId(4), 1)].into_iter().collect(),
            remaining: vec![
                PoolEntry {
                    player: players[3].clone(),
                    number: Some(1),
                },
                PoolEntry {
                    player: players[1].clone(),
                    number: Some(2),
                },
            ],
            can_reset: true,
            ..DraftSnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use teampick_core::roulette::plan_spin;

    fn spin_over(n: usize, winner: usize) -> WheelSpin {
        let mut rng = StdRng::seed_from_u64(9);
        WheelSpin {
            side: Side::Messi,
            ticket: 1,
            winner: player(winner as u64 + 1, "W"),
            plan: plan_spin(&mut rng, n, winner, 0.0),
        }
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.snapshot.phase, Phase::Roster);
        assert!(state.saved_roster.is_empty());
        assert!(state.name_input.is_empty());
        assert_eq!(state.selected, 0);
        assert!(state.spin.is_none());
        assert!(state.active_banner().is_none());
        assert!(!state.celebrating());
    }

    #[test]
    fn snapshot_clamps_selection() {
        let mut state = ViewState::default();
        state.apply_snapshot(DraftSnapshot {
            roster: roster(&["A", "B", "C"]),
            ..DraftSnapshot::default()
        });
        state.selected = 2;
        state.apply_snapshot(DraftSnapshot {
            roster: roster(&["A", "B"]),
            ..DraftSnapshot::default()
        });
        assert_eq!(state.selected, 1);
        assert_eq!(state.selected_player(), Some(PlayerId(2)));
    }

    #[test]
    fn phase_change_resets_selection() {
        let mut state = ViewState::default();
        state.apply_snapshot(DraftSnapshot {
            roster: roster(&["A", "B", "C", "D"]),
            ..DraftSnapshot::default()
        });
        state.selected = 3;
        state.apply_snapshot(drafting_snapshot());
        assert_eq!(state.selected, 0);
        // Drafting walks the pool in jersey-number order.
        assert_eq!(state.selected_player(), Some(PlayerId(4)));
    }

    #[test]
    fn selection_moves_within_bounds() {
        let mut state = ViewState::default();
        state.apply_snapshot(drafting_snapshot());
        state.select_prev();
        assert_eq!(state.selected, 0);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn saved_roster_offered_only_into_empty_roster() {
        let mut state = ViewState::default();
        assert!(!state.can_load_saved());
        apply_ui_update(
            &mut state,
            UiUpdate::SavedRoster(SavedRoster {
                names: vec!["Leo".into()],
                saved_at: None,
            }),
        );
        assert!(state.can_load_saved());
        state.apply_snapshot(DraftSnapshot {
            roster: roster(&["A"]),
            ..DraftSnapshot::default()
        });
        assert!(!state.can_load_saved());
    }

    #[test]
    fn banner_and_celebration_expire_on_tick() {
        let mut state = ViewState::default();
        let start = state.now;
        apply_ui_update(
            &mut state,
            UiUpdate::Banner {
                banner: Banner::MessiPicked,
                duration: Duration::from_millis(800),
            },
        );
        apply_ui_update(
            &mut state,
            UiUpdate::Celebration {
                duration: Duration::from_secs(3),
            },
        );
        assert_eq!(state.active_banner(), Some(Banner::MessiPicked));
        assert!(state.celebrating());

        state.tick(start + Duration::from_secs(1));
        assert!(state.active_banner().is_none());
        assert!(state.banner.is_none());
        assert!(state.celebrating());

        state.tick(start + Duration::from_secs(3));
        assert!(!state.celebrating());
        assert!(state.celebration_until.is_none());
    }

    #[test]
    fn spin_animation_lands_on_winner() {
        let mut state = ViewState::default();
        let start = state.now;
        apply_ui_update(
            &mut state,
            UiUpdate::SpinStarted {
                spin: Box::new(spin_over(5, 3)),
                duration: Duration::from_secs(6),
            },
        );
        let animation = state.spin.as_ref().unwrap();
        assert_eq!(animation.progress(start), 0.0);
        assert_eq!(animation.progress(start + Duration::from_secs(3)), 0.5);
        assert_eq!(animation.pointer_segment(start + Duration::from_secs(6)), 3);
        assert_eq!(animation.pointer_segment(start + Duration::from_secs(60)), 3);
        assert!(animation.rotation(start + Duration::from_secs(6)) > 5.0 * 360.0);
    }

    #[test]
    fn winner_reveal_and_step_change() {
        let mut state = ViewState::default();
        state.apply_snapshot(DraftSnapshot {
            phase: Phase::Roulette,
            roulette_step: Some(Side::Messi),
            roster: roster(&["A", "B", "C"]),
            ..DraftSnapshot::default()
        });
        apply_ui_update(
            &mut state,
            UiUpdate::SpinStarted {
                spin: Box::new(spin_over(3, 1)),
                duration: Duration::from_secs(6),
            },
        );
        apply_ui_update(
            &mut state,
            UiUpdate::WinnerRevealed {
                side: Side::Messi,
                winner: player(2, "B"),
            },
        );
        assert_eq!(state.revealed.as_ref().map(|(_, p)| p.id), Some(PlayerId(2)));

        // Settling keeps the wheel on screen; advancing clears it.
        state.apply_snapshot(DraftSnapshot {
            phase: Phase::Roulette,
            roulette_step: Some(Side::Messi),
            messi_captain: Some(player(2, "B")),
            ..DraftSnapshot::default()
        });
        assert!(state.spin.is_some());
        state.apply_snapshot(DraftSnapshot {
            phase: Phase::Roulette,
            roulette_step: Some(Side::Ronaldo),
            messi_captain: Some(player(2, "B")),
            ..DraftSnapshot::default()
        });
        assert!(state.spin.is_none());
        assert!(state.revealed.is_none());
    }

    #[test]
    fn render_frame_every_phase() {
        let phases = [
            Phase::Roster,
            Phase::Roulette,
            Phase::CaptainSelect,
            Phase::NumbersAssigned,
            Phase::Drafting,
            Phase::Complete,
        ];
        for phase in phases {
            let backend = ratatui::backend::TestBackend::new(100, 30);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            let mut state = ViewState::default();
            let mut snapshot = drafting_snapshot();
            snapshot.phase = phase;
            state.apply_snapshot(snapshot);
            terminal
                .draw(|frame| render_frame(frame, &state))
                .unwrap();
        }
    }
}
