// Configuration loading and parsing (config/teampick.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::draft::state::MIN_PLAYERS;

/// Name of the config file inside `config/` (and `defaults/`).
pub const CONFIG_FILE: &str = "teampick.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file for the saved roster. Empty means the platform data dir.
    pub db_path: String,
    pub draft: DraftConfig,
    pub timing: TimingConfig,
}

/// Raw deserialization target for teampick.toml.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    database: DatabaseSection,
    #[serde(default)]
    draft: DraftConfig,
    #[serde(default)]
    timing: TimingConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    #[serde(default)]
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Roster size needed before captains can be chosen.
    pub min_players: usize,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            min_players: MIN_PLAYERS,
            seed: None,
        }
    }
}

/// Presentation delays, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long the roulette wheel turns.
    pub spin_ms: u64,
    /// How long the winner is shown before the captain is committed.
    pub reveal_ms: u64,
    /// Pause between committing a captain and moving to the next wheel.
    pub advance_ms: u64,
    pub banner_ms: u64,
    pub celebration_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            spin_ms: 6000,
            reveal_ms: 1500,
            advance_ms: 500,
            banner_ms: 800,
            celebration_ms: 3000,
        }
    }
}

impl TimingConfig {
    pub fn spin(&self) -> Duration {
        Duration::from_millis(self.spin_ms)
    }

    pub fn reveal(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    pub fn advance(&self) -> Duration {
        Duration::from_millis(self.advance_ms)
    }

    pub fn banner(&self) -> Duration {
        Duration::from_millis(self.banner_ms)
    }

    pub fn celebration(&self) -> Duration {
        Duration::from_millis(self.celebration_ms)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/teampick.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        db_path: file.database.path,
        draft: file.draft,
        timing: file.timing,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy any file in `defaults/` that is missing from `config/`. Returns the
/// files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }

        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", path.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

/// Turn the configured database path into one SQLite can open. An empty
/// path resolves to `teampick.db` in the platform data directory, falling
/// back to the working directory when no home directory is known.
pub fn resolve_db_path(configured: &str) -> PathBuf {
    if !configured.is_empty() {
        return PathBuf::from(configured);
    }
    match directories::ProjectDirs::from("", "", "teampick") {
        Some(dirs) => {
            let dir = dirs.data_dir();
            // Best effort: an unwritable dir surfaces later as a store warning.
            let _ = std::fs::create_dir_all(dir);
            dir.join("teampick.db")
        }
        None => PathBuf::from("teampick.db"),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draft.min_players < MIN_PLAYERS {
        return Err(ConfigError::ValidationError {
            field: "draft.min_players".into(),
            message: format!("must be at least {MIN_PLAYERS}, got {}", config.draft.min_players),
        });
    }

    let timing = &config.timing;
    let positive: &[(&str, u64)] = &[
        ("timing.spin_ms", timing.spin_ms),
        ("timing.banner_ms", timing.banner_ms),
        ("timing.celebration_ms", timing.celebration_ms),
    ];
    for (name, val) in positive {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, where the shipped `defaults/` lives.
    fn project_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    /// Fresh temp dir with `config/teampick.toml` containing `contents`.
    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), contents).unwrap();
        tmp
    }

    #[test]
    fn shipped_defaults_load() {
        let tmp = std::env::temp_dir().join(format!("config_test_defaults_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        let copied = ensure_config_files(&tmp).expect("should copy default config");
        assert_eq!(copied.len(), 1);
        let config = load_config_from(&tmp).expect("defaults should be valid");

        assert_eq!(config.db_path, "teampick.db");
        assert_eq!(config.draft.min_players, 2);
        assert!(config.draft.seed.is_none());
        assert_eq!(config.timing, TimingConfig::default());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let tmp = temp_config("config_test_minimal", "[database]\npath = \"x.db\"\n");
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.db_path, "x.db");
        assert_eq!(config.draft.min_players, MIN_PLAYERS);
        assert_eq!(config.timing.spin(), Duration::from_secs(6));
        assert_eq!(config.timing.reveal(), Duration::from_millis(1500));
        assert_eq!(config.timing.advance(), Duration::from_millis(500));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seed_and_timing_overrides() {
        let tmp = temp_config(
            "config_test_overrides",
            "[database]\npath = \"\"\n\n[draft]\nseed = 42\nmin_players = 4\n\n[timing]\nspin_ms = 100\nadvance_ms = 0\n",
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.draft.seed, Some(42));
        assert_eq!(config.draft.min_players, 4);
        assert_eq!(config.timing.spin_ms, 100);
        assert_eq!(config.timing.advance_ms, 0);
        assert_eq!(config.timing.banner_ms, 800);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_min_players_below_two() {
        let tmp = temp_config(
            "config_test_min_players",
            "[database]\npath = \"x.db\"\n[draft]\nmin_players = 1\n",
        );
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "draft.min_players"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_spin() {
        let tmp = temp_config(
            "config_test_zero_spin",
            "[database]\npath = \"x.db\"\n[timing]\nspin_ms = 0\n",
        );
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "timing.spin_ms"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join(format!("config_test_missing_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::FileNotFound { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("config_test_invalid", "[database\npath = ");
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = temp_config("config_test_skip_existing", "[database]\npath = \"mine.db\"\n");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), "[database]\npath = \"other.db\"\n")
            .unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        assert_eq!(load_config_from(&tmp).unwrap().db_path, "mine.db");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join(format!("config_test_no_dirs_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp).unwrap_err(),
            ConfigError::DefaultsCopyError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn resolve_db_path_keeps_explicit_path() {
        assert_eq!(resolve_db_path("here.db"), PathBuf::from("here.db"));
        assert!(resolve_db_path("").ends_with("teampick.db"));
    }
}
