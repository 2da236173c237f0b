// Draft state machine: captain selection, jersey numbers, and drafting.
//
// Phases run roster -> roulette -> captainSelect -> numbersAssigned ->
// drafting -> complete, with a manual shortcut from roster straight to
// captainSelect and `reset` returning to roster from anywhere. Operations
// that are not valid in the current state return `Rejected` and leave the
// state untouched.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::player::{NameError, Player, PlayerId, Roster};
use crate::protocol::{DraftSnapshot, PoolEntry};
use crate::roulette::{self, SpinPlan};

/// Smallest roster that can start captain selection.
pub const MIN_PLAYERS: usize = 2;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// One of the two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Messi,
    Ronaldo,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Messi => Side::Ronaldo,
            Side::Ronaldo => Side::Messi,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Messi => "MESSI",
            Side::Ronaldo => "RONALDO",
        }
    }
}

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Roster,
    Roulette,
    CaptainSelect,
    NumbersAssigned,
    Drafting,
    Complete,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Roster => "Roster",
            Phase::Roulette => "Roulette",
            Phase::CaptainSelect => "Captains",
            Phase::NumbersAssigned => "Numbers",
            Phase::Drafting => "Drafting",
            Phase::Complete => "Complete",
        }
    }
}

/// How the captains are being chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptainMode {
    Random,
    Manual,
}

/// Why an operation left the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("operation not valid in phase {actual:?}")]
    WrongPhase { actual: Phase },

    #[error("player name is empty")]
    EmptyName,

    #[error("player `{0}` is already on the roster")]
    DuplicateName(String),

    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),

    #[error("need at least {needed} players, roster has {actual}")]
    NotEnoughPlayers { needed: usize, actual: usize },

    #[error("no captain slot is waiting for a manual selection")]
    NotSelecting,

    #[error("player {0} already captains the other side")]
    AlreadyCaptain(PlayerId),

    #[error("both captains must be selected first")]
    CaptainsIncomplete,

    #[error("jersey numbers are already assigned")]
    NumbersAlreadyAssigned,

    #[error("player {0} is not in the remaining pool")]
    NotInPool(PlayerId),

    #[error("a roulette spin is already in progress")]
    SpinInProgress,

    #[error("roulette spin {0} is not the pending spin")]
    StaleSpin(u64),

    #[error("the current roulette step has not been settled")]
    NotSettled,

    #[error("the current roulette step is already settled")]
    AlreadySettled,
}

impl From<NameError> for Rejected {
    fn from(err: NameError) -> Self {
        match err {
            NameError::Empty => Rejected::EmptyName,
            NameError::Duplicate(name) => Rejected::DuplicateName(name),
        }
    }
}

// ---------------------------------------------------------------------------
// Roulette bookkeeping
// ---------------------------------------------------------------------------

/// A roulette spin whose winner is decided but not yet committed.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelSpin {
    /// Which captain this spin chooses.
    pub side: Side,
    /// Monotonic id; settling requires the matching ticket.
    pub ticket: u64,
    pub winner: Player,
    pub plan: SpinPlan,
}

#[derive(Debug, Clone)]
struct RouletteStep {
    side: Side,
    /// Resting rotation of this step's wheel, in degrees.
    rotation: f64,
    pending: Option<WheelSpin>,
    settled: bool,
}

impl RouletteStep {
    fn new(side: Side) -> Self {
        RouletteStep {
            side,
            rotation: 0.0,
            pending: None,
            settled: false,
        }
    }
}

// ---------------------------------------------------------------------------
// DraftMachine
// ---------------------------------------------------------------------------

/// The complete draft session.
///
/// Generic over the random source so tests can seed it; every random choice
/// (roulette winners, jersey numbers, auto draft order) draws from `rng`.
pub struct DraftMachine<R> {
    roster: Roster,
    messi_captain: Option<Player>,
    ronaldo_captain: Option<Player>,
    numbers: BTreeMap<PlayerId, u32>,
    messi_team: Vec<Player>,
    ronaldo_team: Vec<Player>,
    phase: Phase,
    captain_mode: CaptainMode,
    /// Which captain the next manual selection sets.
    selecting: Option<Side>,
    roulette: Option<RouletteStep>,
    current_picker: Side,
    next_ticket: u64,
    min_players: usize,
    rng: R,
}

impl<R: Rng> DraftMachine<R> {
    pub fn new(rng: R) -> Self {
        DraftMachine {
            roster: Roster::new(),
            messi_captain: None,
            ronaldo_captain: None,
            numbers: BTreeMap::new(),
            messi_team: Vec::new(),
            ronaldo_team: Vec::new(),
            phase: Phase::Roster,
            captain_mode: CaptainMode::Random,
            selecting: None,
            roulette: None,
            current_picker: Side::Messi,
            next_ticket: 0,
            min_players: MIN_PLAYERS,
            rng,
        }
    }

    /// Raise the roster size needed to start captain selection. Values
    /// below `MIN_PLAYERS` are ignored.
    pub fn with_min_players(mut self, min_players: usize) -> Self {
        self.min_players = min_players.max(MIN_PLAYERS);
        self
    }

    // -----------------------------------------------------------------------
    // Roster phase
    // -----------------------------------------------------------------------

    /// Append a player. The name is trimmed and must be unique ignoring case.
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, Rejected> {
        self.require_phase(Phase::Roster)?;
        let player = self.roster.add(name)?;
        Ok(player.id)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, Rejected> {
        self.require_phase(Phase::Roster)?;
        self.roster.remove(id).ok_or(Rejected::UnknownPlayer(id))
    }

    /// Append every saved name not already on the roster. Returns how many
    /// players were added.
    pub fn load_saved_roster(&mut self, names: &[String]) -> Result<usize, Rejected> {
        self.require_phase(Phase::Roster)?;
        let added = names
            .iter()
            .filter(|name| self.roster.add(name).is_ok())
            .count();
        Ok(added)
    }

    // -----------------------------------------------------------------------
    // Random captains (roulette)
    // -----------------------------------------------------------------------

    pub fn start_random_captain_selection(&mut self) -> Result<(), Rejected> {
        self.require_phase(Phase::Roster)?;
        self.require_enough_players()?;
        self.captain_mode = CaptainMode::Random;
        self.roulette = Some(RouletteStep::new(Side::Messi));
        self.enter(Phase::Roulette);
        Ok(())
    }

    /// Players on the wheel for the current roulette step. The Ronaldo wheel
    /// leaves out the Messi captain.
    pub fn roulette_candidates(&self) -> Vec<&Player> {
        let Some(step) = &self.roulette else {
            return Vec::new();
        };
        let excluded = match step.side {
            Side::Messi => None,
            Side::Ronaldo => self.messi_captain.as_ref().map(|p| p.id),
        };
        self.roster
            .players()
            .iter()
            .filter(|p| Some(p.id) != excluded)
            .collect()
    }

    /// Choose this step's winner uniformly and plan the wheel motion.
    ///
    /// The winner is held as pending until `settle_roulette` is called with
    /// the returned ticket; another spin is refused in the meantime.
    pub fn spin_roulette(&mut self) -> Result<WheelSpin, Rejected> {
        self.require_phase(Phase::Roulette)?;
        let (side, rotation) = match &self.roulette {
            Some(step) if step.pending.is_some() => return Err(Rejected::SpinInProgress),
            Some(step) if step.settled => return Err(Rejected::AlreadySettled),
            Some(step) => (step.side, step.rotation),
            None => return Err(Rejected::WrongPhase { actual: self.phase }),
        };

        let candidates: Vec<Player> = self.roulette_candidates().into_iter().cloned().collect();
        if candidates.is_empty() {
            return Err(Rejected::NotEnoughPlayers {
                needed: 1,
                actual: 0,
            });
        }

        let winner_index = self.rng.gen_range(0..candidates.len());
        let plan = roulette::plan_spin(&mut self.rng, candidates.len(), winner_index, rotation);
        self.next_ticket += 1;
        let spin = WheelSpin {
            side,
            ticket: self.next_ticket,
            winner: candidates[winner_index].clone(),
            plan,
        };

        if let Some(step) = self.roulette.as_mut() {
            step.rotation = spin.plan.final_rotation;
            step.pending = Some(spin.clone());
        }
        Ok(spin)
    }

    /// Commit the pending winner as captain of the current step's side.
    pub fn settle_roulette(&mut self, ticket: u64) -> Result<Player, Rejected> {
        self.require_phase(Phase::Roulette)?;
        let step = self
            .roulette
            .as_mut()
            .ok_or(Rejected::WrongPhase { actual: self.phase })?;
        let spin = match step.pending.take() {
            Some(spin) if spin.ticket == ticket => spin,
            other => {
                step.pending = other;
                return Err(Rejected::StaleSpin(ticket));
            }
        };
        step.settled = true;

        match spin.side {
            Side::Messi => self.messi_captain = Some(spin.winner.clone()),
            Side::Ronaldo => self.ronaldo_captain = Some(spin.winner.clone()),
        }
        info!("Roulette picked {} captain: {}", spin.side.label(), spin.winner.name);
        Ok(spin.winner)
    }

    /// Move past a settled step: the Messi wheel hands over to a fresh
    /// Ronaldo wheel, and the Ronaldo wheel finishes captain selection.
    pub fn advance_roulette(&mut self) -> Result<Phase, Rejected> {
        self.require_phase(Phase::Roulette)?;
        let side = match &self.roulette {
            Some(step) if step.settled => step.side,
            Some(_) => return Err(Rejected::NotSettled),
            None => return Err(Rejected::WrongPhase { actual: self.phase }),
        };
        match side {
            Side::Messi => self.roulette = Some(RouletteStep::new(Side::Ronaldo)),
            Side::Ronaldo => {
                self.roulette = None;
                self.enter(Phase::CaptainSelect);
            }
        }
        Ok(self.phase)
    }

    /// Spin, settle and advance the current step in one go.
    pub fn resolve_roulette_step(&mut self) -> Result<Player, Rejected> {
        let spin = self.spin_roulette()?;
        let winner = self.settle_roulette(spin.ticket)?;
        self.advance_roulette()?;
        Ok(winner)
    }

    // -----------------------------------------------------------------------
    // Manual captains
    // -----------------------------------------------------------------------

    pub fn start_manual_captain_selection(&mut self) -> Result<(), Rejected> {
        self.require_phase(Phase::Roster)?;
        self.require_enough_players()?;
        self.captain_mode = CaptainMode::Manual;
        self.selecting = Some(Side::Messi);
        self.enter(Phase::CaptainSelect);
        Ok(())
    }

    /// Players offered for the next manual captain pick.
    pub fn captain_candidates(&self) -> Vec<&Player> {
        if self.selecting.is_none() {
            return Vec::new();
        }
        let messi_id = self.messi_captain.as_ref().map(|p| p.id);
        self.roster
            .players()
            .iter()
            .filter(|p| Some(p.id) != messi_id)
            .collect()
    }

    /// Set the captain the selecting indicator points at. Returns the side
    /// that was filled.
    pub fn select_manual_captain(&mut self, id: PlayerId) -> Result<Side, Rejected> {
        self.require_phase(Phase::CaptainSelect)?;
        if self.captain_mode != CaptainMode::Manual {
            return Err(Rejected::NotSelecting);
        }
        let side = self.selecting.ok_or(Rejected::NotSelecting)?;
        let player = self
            .roster
            .get(id)
            .cloned()
            .ok_or(Rejected::UnknownPlayer(id))?;

        match side {
            Side::Messi => {
                self.messi_captain = Some(player);
                self.selecting = Some(Side::Ronaldo);
            }
            Side::Ronaldo => {
                if self.messi_captain.as_ref().is_some_and(|m| m.id == id) {
                    return Err(Rejected::AlreadyCaptain(id));
                }
                self.ronaldo_captain = Some(player);
                self.selecting = None;
            }
        }
        Ok(side)
    }

    // -----------------------------------------------------------------------
    // Numbers and drafting
    // -----------------------------------------------------------------------

    /// Shuffle `1..=K` over the K non-captain players. Returns K.
    pub fn assign_numbers(&mut self) -> Result<usize, Rejected> {
        self.require_phase(Phase::CaptainSelect)?;
        if self.selecting.is_some() || !self.captains_set() {
            return Err(Rejected::CaptainsIncomplete);
        }
        if !self.numbers.is_empty() {
            return Err(Rejected::NumbersAlreadyAssigned);
        }

        let ids: Vec<PlayerId> = self.remaining().iter().map(|p| p.id).collect();
        let mut numbers: Vec<u32> = (1..=ids.len() as u32).collect();
        numbers.shuffle(&mut self.rng);
        self.numbers = ids.into_iter().zip(numbers).collect();

        self.enter(Phase::NumbersAssigned);
        Ok(self.numbers.len())
    }

    /// Begin manual drafting with Messi picking first.
    pub fn start_draft(&mut self) -> Result<Phase, Rejected> {
        self.require_phase(Phase::NumbersAssigned)?;
        self.current_picker = Side::Messi;
        self.enter(Phase::Drafting);
        if self.remaining().is_empty() {
            self.enter(Phase::Complete);
        }
        Ok(self.phase)
    }

    /// Add a pool player to the current picker's team and pass the turn.
    /// Returns the side that picked.
    pub fn pick_player(&mut self, id: PlayerId) -> Result<Side, Rejected> {
        self.require_phase(Phase::Drafting)?;
        let player = self
            .remaining()
            .into_iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(Rejected::NotInPool(id))?;

        let side = self.current_picker;
        self.team_mut(side).push(player);
        self.current_picker = side.other();

        if self.remaining().is_empty() {
            self.enter(Phase::Complete);
        }
        Ok(side)
    }

    /// Shuffle the pool once and deal it alternately, starting with the
    /// current picker. Returns how many players were dealt.
    pub fn auto_draft(&mut self) -> Result<usize, Rejected> {
        if !matches!(self.phase, Phase::NumbersAssigned | Phase::Drafting) {
            return Err(Rejected::WrongPhase { actual: self.phase });
        }

        let mut pool: Vec<Player> = self.remaining().into_iter().cloned().collect();
        pool.shuffle(&mut self.rng);
        let dealt = pool.len();

        let mut picker = self.current_picker;
        for player in pool {
            self.team_mut(picker).push(player);
            picker = picker.other();
        }

        self.enter(Phase::Complete);
        Ok(dealt)
    }

    /// Back to the roster phase. The roster itself is kept.
    pub fn reset(&mut self) {
        self.messi_captain = None;
        self.ronaldo_captain = None;
        self.numbers.clear();
        self.messi_team.clear();
        self.ronaldo_team.clear();
        self.captain_mode = CaptainMode::Random;
        self.selecting = None;
        self.roulette = None;
        self.current_picker = Side::Messi;
        self.enter(Phase::Roster);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn captain_mode(&self) -> CaptainMode {
        self.captain_mode
    }

    pub fn selecting(&self) -> Option<Side> {
        self.selecting
    }

    pub fn current_picker(&self) -> Side {
        self.current_picker
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

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

    pub fn numbers(&self) -> &BTreeMap<PlayerId, u32> {
        &self.numbers
    }

    pub fn number_of(&self, id: PlayerId) -> Option<u32> {
        self.numbers.get(&id).copied()
    }

    /// Side of the roulette wheel currently on screen, if any.
    pub fn roulette_step(&self) -> Option<Side> {
        self.roulette.as_ref().map(|step| step.side)
    }

    pub fn pending_spin(&self) -> Option<&WheelSpin> {
        self.roulette.as_ref().and_then(|step| step.pending.as_ref())
    }

    /// Roster players that are neither captains nor drafted, in roster order.
    pub fn remaining(&self) -> Vec<&Player> {
        self.roster
            .players()
            .iter()
            .filter(|p| !self.is_captain(p.id) && !self.is_drafted(p.id))
            .collect()
    }

    /// Reset is offered once the roster is locked in and no wheel is spinning.
    pub fn can_reset(&self) -> bool {
        !matches!(self.phase, Phase::Roster | Phase::Roulette)
    }

    /// Copy of the full state for the presentation layer.
    pub fn snapshot(&self) -> DraftSnapshot {
        let mut remaining: Vec<PoolEntry> = self
            .remaining()
            .into_iter()
            .map(|p| PoolEntry {
                player: p.clone(),
                number: self.number_of(p.id),
            })
            .collect();
        remaining.sort_by_key(|entry| entry.number.unwrap_or(0));

        DraftSnapshot {
            phase: self.phase,
            captain_mode: self.captain_mode,
            selecting: self.selecting,
            roulette_step: self.roulette_step(),
            spinning: self.pending_spin().is_some(),
            current_picker: self.current_picker,
            roster: self.roster.players().to_vec(),
            messi_captain: self.messi_captain.clone(),
            ronaldo_captain: self.ronaldo_captain.clone(),
            messi_team: self.messi_team.clone(),
            ronaldo_team: self.ronaldo_team.clone(),
            numbers: self.numbers.clone(),
            remaining,
            roulette_candidates: self.roulette_candidates().into_iter().cloned().collect(),
            captain_candidates: self.captain_candidates().into_iter().cloned().collect(),
            can_reset: self.can_reset(),
            min_players: self.min_players,
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn require_phase(&self, expected: Phase) -> Result<(), Rejected> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(Rejected::WrongPhase { actual: self.phase })
        }
    }

    fn require_enough_players(&self) -> Result<(), Rejected> {
        if self.roster.len() < self.min_players {
            return Err(Rejected::NotEnoughPlayers {
                needed: self.min_players,
                actual: self.roster.len(),
            });
        }
        Ok(())
    }

    fn captains_set(&self) -> bool {
        self.messi_captain.is_some() && self.ronaldo_captain.is_some()
    }

    fn is_captain(&self, id: PlayerId) -> bool {
        [&self.messi_captain, &self.ronaldo_captain]
            .into_iter()
            .flatten()
            .any(|c| c.id == id)
    }

    fn is_drafted(&self, id: PlayerId) -> bool {
        self.messi_team.iter().chain(&self.ronaldo_team).any(|p| p.id == id)
    }

    fn team_mut(&mut self, side: Side) -> &mut Vec<Player> {
        match side {
            Side::Messi => &mut self.messi_team,
            Side::Ronaldo => &mut self.ronaldo_team,
        }
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            info!("Draft phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
