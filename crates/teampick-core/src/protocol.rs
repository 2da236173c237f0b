// Messages between the controller and the presentation layer.
//
// The presentation layer sends `UserCommand`s and renders whatever the
// controller pushes back as `UiUpdate`s. A `DraftSnapshot` follows every
// accepted transition.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::draft::player::{Player, PlayerId};
use crate::draft::state::{CaptainMode, Phase, Side, WheelSpin, MIN_PLAYERS};
use crate::store::SavedRoster;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A player still waiting to be drafted, with the jersey number if assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub player: Player,
    pub number: Option<u32>,
}

/// Full copy of the draft session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub phase: Phase,
    pub captain_mode: CaptainMode,
    /// Captain slot the next manual selection fills.
    pub selecting: Option<Side>,
    /// Which wheel is on screen during the roulette phase.
    pub roulette_step: Option<Side>,
    /// True while a roulette spin is decided but not yet settled.
    pub spinning: bool,
    pub current_picker: Side,
    pub roster: Vec<Player>,
    pub messi_captain: Option<Player>,
    pub ronaldo_captain: Option<Player>,
    pub messi_team: Vec<Player>,
    pub ronaldo_team: Vec<Player>,
    pub numbers: BTreeMap<PlayerId, u32>,
    /// Undrafted non-captains, ordered by jersey number.
    pub remaining: Vec<PoolEntry>,
    pub roulette_candidates: Vec<Player>,
    pub captain_candidates: Vec<Player>,
    pub can_reset: bool,
    /// Roster size needed before captains can be chosen.
    pub min_players: usize,
}

/// The state of a fresh session: roster phase, nobody entered.
impl Default for DraftSnapshot {
    fn default() -> Self {
        DraftSnapshot {
            phase: Phase::Roster,
            captain_mode: CaptainMode::Random,
            selecting: None,
            roulette_step: None,
            spinning: false,
            current_picker: Side::Messi,
            roster: Vec::new(),
            messi_captain: None,
            ronaldo_captain: None,
            messi_team: Vec::new(),
            ronaldo_team: Vec::new(),
            numbers: BTreeMap::new(),
            remaining: Vec::new(),
            roulette_candidates: Vec::new(),
            captain_candidates: Vec::new(),
            can_reset: false,
            min_players: MIN_PLAYERS,
        }
    }
}

impl DraftSnapshot {
    pub fn captain(&self, side: Side) -> Option<&Player> {
        match side {
            Side::Messi => self.messi_captain.as_ref(),
            Side::Ronaldo => self.ronaldo_captain.as_ref(),
        }
    }

    pub fn team(&self, side: Side) -> &[Player] {
        match side {
            Side::Messi => &self.messi_team,
            Side::Ronaldo => &self.ronaldo_team,
        }
    }

    /// Captain plus drafted players.
    pub fn team_size(&self, side: Side) -> usize {
        usize::from(self.captain(side).is_some()) + self.team(side).len()
    }
}

// ---------------------------------------------------------------------------
// Commands (presentation -> controller)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    AddPlayer(String),
    RemovePlayer(PlayerId),
    LoadSavedRoster,
    StartRandomCaptains,
    StartManualCaptains,
    SpinRoulette,
    SelectCaptain(PlayerId),
    AssignNumbers,
    StartDraft,
    PickPlayer(PlayerId),
    AutoDraft,
    Reset,
    Quit,
}

// ---------------------------------------------------------------------------
// Updates (controller -> presentation)
// ---------------------------------------------------------------------------

/// Short shout-outs flashed over the screen after notable transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    RosterLoaded,
    MessiPicked,
    RonaldoPicked,
    NumbersAssigned,
    DraftFinished,
    TeamsDealt,
}

impl Banner {
    pub fn text(self) -> &'static str {
        match self {
            Banner::RosterLoaded => "LOADED!",
            Banner::MessiPicked => "MESSI!",
            Banner::RonaldoPicked => "RONALDO!",
            Banner::NumbersAssigned => "NUMBERS!",
            Banner::DraftFinished => "DONE!",
            Banner::TeamsDealt => "TEAMS!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    StateSnapshot(Box<DraftSnapshot>),
    /// Roster available to reload, read once at startup.
    SavedRoster(SavedRoster),
    /// The wheel starts turning; it comes to rest after `duration`.
    SpinStarted { spin: Box<WheelSpin>, duration: Duration },
    /// The wheel has stopped on `winner`.
    WinnerRevealed { side: Side, winner: Player },
    Banner { banner: Banner, duration: Duration },
    Celebration { duration: Duration },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftMachine;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn snapshot_survives_json() {
        let mut m = DraftMachine::new(StdRng::seed_from_u64(3)).with_min_players(3);
        for name in ["Leo", "Cris", "Kaka", "Xavi", "Iker"] {
            m.add_player(name).unwrap();
        }
        m.start_manual_captain_selection().unwrap();
        let first = m.snapshot().captain_candidates[0].id;
        m.select_manual_captain(first).unwrap();
        let second = m.snapshot().captain_candidates[0].id;
        m.select_manual_captain(second).unwrap();
        m.assign_numbers().unwrap();
        m.start_draft().unwrap();

        let snapshot = m.snapshot();
        assert_eq!(snapshot.numbers.len(), 3);
        assert_eq!(snapshot.min_players, 3);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: DraftSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn default_snapshot_uses_minimum_roster() {
        let snapshot = DraftSnapshot::default();
        assert_eq!(snapshot.phase, Phase::Roster);
        assert_eq!(snapshot.min_players, MIN_PLAYERS);
        assert!(!snapshot.can_reset);
    }
}
