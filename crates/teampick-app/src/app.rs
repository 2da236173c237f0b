// Application state and orchestration logic.
//
// The controller owns the draft machine and the saved-roster store. It turns
// user commands from the presentation layer into machine transitions, pushes
// a snapshot after every accepted transition, and runs the roulette's timed
// hand-offs as deferred continuations. While a continuation is pending, every
// command except Quit is ignored.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use teampick_core::config::{Config, TimingConfig};
use teampick_core::draft::{DraftMachine, Phase, Rejected, Side};
use teampick_core::protocol::{Banner, UiUpdate, UserCommand};
use teampick_core::store::{RosterStore, SavedRoster};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Work the controller has promised to do at a later instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// The wheel has stopped; show the winner.
    RevealWinner { ticket: u64 },
    /// Commit the revealed winner as captain.
    SettleRoulette { ticket: u64 },
    /// Move on to the next wheel, or to captain review.
    AdvanceRoulette,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Instant,
    continuation: Continuation,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub machine: DraftMachine<StdRng>,
    store: Box<dyn RosterStore>,
    /// Roster from a previous session, read once at startup.
    pub saved_roster: SavedRoster,
    pub timing: TimingConfig,
    pending: Option<Pending>,
}

impl AppState {
    pub fn new(config: &Config, store: Box<dyn RosterStore>) -> Self {
        let rng = match config.draft.seed {
            Some(seed) => {
                info!("Using fixed RNG seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        let machine = DraftMachine::new(rng).with_min_players(config.draft.min_players);
        let saved_roster = store.load();
        info!("{} saved player names available", saved_roster.names.len());

        AppState {
            machine,
            store,
            saved_roster,
            timing: config.timing.clone(),
            pending: None,
        }
    }

    /// Updates sent once when the presentation layer attaches.
    pub fn initial_updates(&self) -> Vec<UiUpdate> {
        vec![
            UiUpdate::SavedRoster(self.saved_roster.clone()),
            self.snapshot_update(),
        ]
    }

    /// When the pending continuation is due, if there is one.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    pub fn pending_continuation(&self) -> Option<Continuation> {
        self.pending.map(|p| p.continuation)
    }

    /// True while the roulette hand-off is running and input is ignored.
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply one user command. Returns the updates to push to the
    /// presentation layer; rejected commands produce none.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Vec<UiUpdate> {
        if cmd == UserCommand::Quit {
            return Vec::new();
        }
        if let Some(pending) = self.pending {
            debug!(
                "Ignoring {:?} while {:?} is pending",
                cmd, pending.continuation
            );
            return Vec::new();
        }

        let label = format!("{cmd:?}");
        match self.apply(cmd) {
            Ok(effects) => {
                let mut updates = vec![self.snapshot_update()];
                updates.extend(effects);
                updates
            }
            Err(rejected) => {
                debug!("Rejected {}: {}", label, rejected);
                Vec::new()
            }
        }
    }

    /// Run the pending continuation, if any, regardless of its deadline.
    pub fn fire_pending(&mut self) -> Vec<UiUpdate> {
        let Some(pending) = self.pending.take() else {
            return Vec::new();
        };

        match pending.continuation {
            Continuation::RevealWinner { ticket } => {
                let Some(spin) = self.machine.pending_spin().filter(|s| s.ticket == ticket) else {
                    debug!("Dropping reveal for stale spin {}", ticket);
                    return Vec::new();
                };
                let update = UiUpdate::WinnerRevealed {
                    side: spin.side,
                    winner: spin.winner.clone(),
                };
                self.schedule(self.timing.reveal(), Continuation::SettleRoulette { ticket });
                vec![update]
            }
            Continuation::SettleRoulette { ticket } => match self.machine.settle_roulette(ticket) {
                Ok(_) => {
                    self.schedule(self.timing.advance(), Continuation::AdvanceRoulette);
                    vec![self.snapshot_update(), self.celebration()]
                }
                Err(rejected) => {
                    debug!("Roulette settle skipped: {}", rejected);
                    Vec::new()
                }
            },
            Continuation::AdvanceRoulette => match self.machine.advance_roulette() {
                Ok(phase) => {
                    debug!("Roulette advanced, phase {:?}", phase);
                    vec![self.snapshot_update()]
                }
                Err(rejected) => {
                    debug!("Roulette advance skipped: {}", rejected);
                    Vec::new()
                }
            },
        }
    }

    // -----------------------------------------------------------------------
    // Command dispatch
    // -----------------------------------------------------------------------

    fn apply(&mut self, cmd: UserCommand) -> Result<Vec<UiUpdate>, Rejected> {
        match cmd {
            UserCommand::AddPlayer(name) => {
                let id = self.machine.add_player(&name)?;
                info!("Added player {} ({})", name.trim(), id);
                self.persist_roster();
                Ok(Vec::new())
            }
            UserCommand::RemovePlayer(id) => {
                let player = self.machine.remove_player(id)?;
                info!("Removed player {}", player.name);
                self.persist_roster();
                Ok(Vec::new())
            }
            UserCommand::LoadSavedRoster => {
                let added = self.machine.load_saved_roster(&self.saved_roster.names)?;
                info!("Loaded {} players from the saved roster", added);
                self.persist_roster();
                Ok(vec![self.banner(Banner::RosterLoaded)])
            }
            UserCommand::StartRandomCaptains => {
                self.machine.start_random_captain_selection()?;
                Ok(Vec::new())
            }
            UserCommand::StartManualCaptains => {
                self.machine.start_manual_captain_selection()?;
                Ok(Vec::new())
            }
            UserCommand::SpinRoulette => {
                let spin = self.machine.spin_roulette()?;
                info!(
                    "Spinning {} wheel over {} players",
                    spin.side.label(),
                    spin.plan.segments
                );
                let duration = self.timing.spin();
                self.schedule(duration, Continuation::RevealWinner { ticket: spin.ticket });
                Ok(vec![UiUpdate::SpinStarted {
                    spin: Box::new(spin),
                    duration,
                }])
            }
            UserCommand::SelectCaptain(id) => {
                let side = self.machine.select_manual_captain(id)?;
                Ok(match side {
                    Side::Messi => vec![self.banner(Banner::MessiPicked)],
                    Side::Ronaldo => vec![self.banner(Banner::RonaldoPicked), self.celebration()],
                })
            }
            UserCommand::AssignNumbers => {
                let count = self.machine.assign_numbers()?;
                info!("Assigned jersey numbers 1..={}", count);
                Ok(vec![self.banner(Banner::NumbersAssigned)])
            }
            UserCommand::StartDraft => {
                let phase = self.machine.start_draft()?;
                Ok(self.completion_effects(phase, Banner::DraftFinished))
            }
            UserCommand::PickPlayer(id) => {
                let side = self.machine.pick_player(id)?;
                debug!("{} picked {}", side.label(), id);
                Ok(self.completion_effects(self.machine.phase(), Banner::DraftFinished))
            }
            UserCommand::AutoDraft => {
                let dealt = self.machine.auto_draft()?;
                info!("Auto draft dealt {} players", dealt);
                Ok(vec![self.celebration(), self.banner(Banner::TeamsDealt)])
            }
            UserCommand::Reset => {
                self.machine.reset();
                Ok(Vec::new())
            }
            UserCommand::Quit => Ok(Vec::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn schedule(&mut self, delay: Duration, continuation: Continuation) {
        self.pending = Some(Pending {
            due: Instant::now() + delay,
            continuation,
        });
    }

    /// Save the roster names; an empty roster leaves the saved one alone.
    fn persist_roster(&self) {
        let names = self.machine.roster().names();
        if !names.is_empty() {
            self.store.save(&names);
        }
    }

    fn snapshot_update(&self) -> UiUpdate {
        UiUpdate::StateSnapshot(Box::new(self.machine.snapshot()))
    }

    fn banner(&self, banner: Banner) -> UiUpdate {
        UiUpdate::Banner {
            banner,
            duration: self.timing.banner(),
        }
    }

    fn celebration(&self) -> UiUpdate {
        UiUpdate::Celebration {
            duration: self.timing.celebration(),
        }
    }

    fn completion_effects(&self, phase: Phase, banner: Banner) -> Vec<UiUpdate> {
        if phase == Phase::Complete {
            vec![self.celebration(), self.banner(banner)]
        } else {
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on the command channel and on the pending continuation's
/// deadline using `tokio::select!`, and pushes UI updates through `ui_tx`.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    for update in state.initial_updates() {
        let _ = ui_tx.send(update).await;
    }

    loop {
        let deadline = state.next_deadline();
        let updates = tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => state.handle_command(cmd),
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // Only armed while a continuation is pending.
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                state.fire_pending()
            }
        };

        for update in updates {
            let _ = ui_tx.send(update).await;
        }
        if ui_tx.is_closed() {
            info!("UI channel closed, shutting down");
            break;
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
