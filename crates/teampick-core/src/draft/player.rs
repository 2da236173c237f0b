// Players and the ordered roster they are entered into.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque player identifier, issued once per session and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single entrant in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// Reasons a name cannot be added to the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    Empty,
    Duplicate(String),
}

/// Ordered list of players with case-insensitively unique names.
///
/// Ids come from a monotonic counter owned by the roster, so a removed
/// player's id is never handed out again.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim `name` and append it as a new player.
    pub fn add(&mut self, name: &str) -> Result<&Player, NameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        if self.contains_name(trimmed) {
            return Err(NameError::Duplicate(trimmed.to_string()));
        }

        self.next_id += 1;
        self.players.push(Player {
            id: PlayerId(self.next_id),
            name: trimmed.to_string(),
        });
        Ok(&self.players[self.players.len() - 1])
    }

    /// Remove the player with `id`, returning it if it was present.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(idx))
    }

    /// Case-insensitive name lookup.
    pub fn contains_name(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.players.iter().any(|p| p.name.to_lowercase() == needle)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Names in roster order, the shape the saved-roster store persists.
    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
