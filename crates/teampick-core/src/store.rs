// Best-effort cache of the last roster's player names.
//
// Nothing in here may take the draft down: every failure is logged and then
// treated as "no saved roster" (on load) or ignored (on save).

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

/// Fixed key the roster is stored under.
pub const SAVED_ROSTER_KEY: &str = "messi-ronaldo-players";

/// Names from a previous session, in roster order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedRoster {
    pub names: Vec<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl SavedRoster {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Storage for the saved roster. Implementations never fail outward.
pub trait RosterStore: Send {
    /// Read the saved roster; empty on absence or any error.
    fn load(&self) -> SavedRoster;

    /// Overwrite the saved roster with `names`; errors are swallowed.
    fn save(&self, names: &[String]);
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// SQLite-backed key/value store holding the saved roster.
pub struct SqliteRosterStore {
    conn: Mutex<Connection>,
}

impl SqliteRosterStore {
    /// Open (or create) the database at `path`. Pass `":memory:"` for an
    /// ephemeral database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open roster database at {path}"))?;

        conn.execute_batch("PRAGMA busy_timeout = 5000;")
            .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS saved_state (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_load(&self) -> Result<SavedRoster> {
        let conn = self.conn();
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT value, updated_at FROM saved_state WHERE key = ?1",
                params![SAVED_ROSTER_KEY],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("failed to query saved roster")?;

        let Some((value, updated_at)) = row else {
            return Ok(SavedRoster::default());
        };

        let names: Vec<String> =
            serde_json::from_str(&value).context("failed to parse saved roster")?;
        let saved_at = DateTime::parse_from_rfc3339(&updated_at)
            .ok()
            .map(|t| t.with_timezone(&Utc));

        Ok(SavedRoster { names, saved_at })
    }

    fn try_save(&self, names: &[String]) -> Result<()> {
        let value = serde_json::to_string(names).context("failed to serialize roster")?;
        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO saved_state (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![SAVED_ROSTER_KEY, value, now],
            )
            .context("failed to save roster")?;
        Ok(())
    }
}

impl RosterStore for SqliteRosterStore {
    fn load(&self) -> SavedRoster {
        match self.try_load() {
            Ok(saved) => {
                debug!("Loaded {} saved player names", saved.names.len());
                saved
            }
            Err(e) => {
                warn!("Ignoring saved roster: {:#}", e);
                SavedRoster::default()
            }
        }
    }

    fn save(&self, names: &[String]) {
        if let Err(e) = self.try_save(names) {
            warn!("Could not save roster: {:#}", e);
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Store that lives only as long as the process. Used when the database
/// cannot be opened, and in tests.
#[derive(Default)]
pub struct MemoryRosterStore {
    saved: Mutex<SavedRoster>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(names: &[&str]) -> Self {
        let saved = SavedRoster {
            names: names.iter().map(|n| n.to_string()).collect(),
            saved_at: Some(Utc::now()),
        };
        Self {
            saved: Mutex::new(saved),
        }
    }
}

impl RosterStore for MemoryRosterStore {
    fn load(&self) -> SavedRoster {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, names: &[String]) {
        let mut saved = self.saved.lock().unwrap_or_else(PoisonError::into_inner);
        saved.names = names.to_vec();
        saved.saved_at = Some(Utc::now());
    }
}

/// Open the SQLite store at `path`, falling back to memory if that fails.
pub fn open_store(path: &str) -> Box<dyn RosterStore> {
    match SqliteRosterStore::open(path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("Saved rosters disabled, using in-memory store: {:#}", e);
            Box::new(MemoryRosterStore::new())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> SqliteRosterStore {
        SqliteRosterStore::open(":memory:").expect("in-memory database should open")
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn empty_database_loads_nothing() {
        let store = test_store();
        assert_eq!(store.load(), SavedRoster::default());
    }

    #[test]
    fn save_then_load_keeps_order_and_timestamp() {
        let store = test_store();
        store.save(&names(&["Leo", "Cris", "Kaka"]));
        let saved = store.load();
        assert_eq!(saved.names, names(&["Leo", "Cris", "Kaka"]));
        assert!(saved.saved_at.is_some());
    }

    #[test]
    fn save_overwrites_previous_roster() {
        let store = test_store();
        store.save(&names(&["A", "B"]));
        store.save(&names(&["C"]));
        assert_eq!(store.load().names, names(&["C"]));
    }

    #[test]
    fn corrupt_value_is_treated_as_empty() {
        let store = test_store();
        store
            .conn()
            .execute(
                "INSERT INTO saved_state (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![SAVED_ROSTER_KEY, "{not json", "yesterday"],
            )
            .unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn wrong_json_shape_is_treated_as_empty() {
        let store = test_store();
        store
            .conn()
            .execute(
                "INSERT INTO saved_state (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![SAVED_ROSTER_KEY, "[1, 2, 3]", "2026-01-01T00:00:00Z"],
            )
            .unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn unparseable_timestamp_keeps_names() {
        let store = test_store();
        store
            .conn()
            .execute(
                "INSERT INTO saved_state (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![SAVED_ROSTER_KEY, "[\"Leo\"]", "yesterday"],
            )
            .unwrap();
        let saved = store.load();
        assert_eq!(saved.names, names(&["Leo"]));
        assert!(saved.saved_at.is_none());
    }

    #[test]
    fn missing_table_is_treated_as_empty() {
        let store = test_store();
        store.conn().execute_batch("DROP TABLE saved_state;").unwrap();
        assert!(store.load().is_empty());
        // Saving fails quietly too.
        store.save(&names(&["A"]));
    }

    #[test]
    fn unopenable_path_falls_back_to_memory() {
        let dir = std::env::temp_dir().join(format!("teampick_store_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        // A directory cannot be opened as a database file.
        let store = open_store(dir.to_str().unwrap());
        store.save(&names(&["A", "B"]));
        assert_eq!(store.load().names, names(&["A", "B"]));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!("teampick_reopen_{}.db", std::process::id()));
        let path_str = path.to_str().unwrap();
        let _ = std::fs::remove_file(&path);
        {
            let store = SqliteRosterStore::open(path_str).unwrap();
            store.save(&names(&["Leo", "Cris"]));
        }
        let store = SqliteRosterStore::open(path_str).unwrap();
        assert_eq!(store.load().names, names(&["Leo", "Cris"]));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryRosterStore::with_names(&["X"]);
        assert_eq!(store.load().names, names(&["X"]));
        store.save(&names(&["Y", "Z"]));
        assert_eq!(store.load().names, names(&["Y", "Z"]));
    }
}
