// Configuration loading and parsing (config/draft.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::sequencer::DEFAULT_PICKS_PER_TEAM;

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
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftConfig,
    pub league: LeagueConfig,
    /// Database file path. Empty means "use the platform data directory",
    /// see [`resolve_db_path`].
    pub db_path: String,
    pub catalog: CatalogConfig,
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    #[serde(default)]
    draft: DraftConfig,
    #[serde(default)]
    league: LeagueConfig,
    #[serde(default)]
    database: DatabaseSection,
    catalog: CatalogConfig,
}

/// Rules of the snake draft itself.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    #[serde(default = "default_picks_per_team")]
    pub picks_per_team: u32,
    #[serde(default = "default_min_teams")]
    pub min_teams: usize,
    /// Total attempts for an operation that loses a storage race.
    #[serde(default = "default_commit_retries")]
    pub commit_retries: u32,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            picks_per_team: default_picks_per_team(),
            min_teams: default_min_teams(),
            commit_retries: default_commit_retries(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_league_name")]
    pub default_league_name: String,
    #[serde(default = "default_team_name")]
    pub default_team_name: String,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            default_league_name: default_league_name(),
            default_team_name: default_team_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabaseSection {
    #[serde(default)]
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Player catalog CSV, relative to the working directory.
    pub players: String,
}

/// Upper bound on squad size accepted from config.
pub const MAX_PICKS_PER_TEAM: u32 = 64;

fn default_picks_per_team() -> u32 {
    DEFAULT_PICKS_PER_TEAM
}

fn default_min_teams() -> usize {
    2
}

fn default_commit_retries() -> u32 {
    3
}

fn default_code_length() -> usize {
    6
}

fn default_league_name() -> String {
    "My SixASide League".to_string()
}

fn default_team_name() -> String {
    "My SixASide Team".to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/draft.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let draft_path = base_dir.join("config").join("draft.toml");
    let text = read_file(&draft_path)?;
    let file: DraftFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: draft_path.clone(),
        source: e,
    })?;

    let config = Config {
        draft: file.draft,
        league: file.league,
        db_path: file.database.path,
        catalog: file.catalog,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/` from the shipped `defaults/` directory.
///
/// Each default file (other than `*.example` templates) is copied only when
/// `config/` has no file of that name, so local edits always win. Returns the
/// paths written. Having neither directory is an error; having only
/// `config/` is fine.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        return if config_dir.is_dir() {
            Ok(Vec::new())
        } else {
            Err(seed_error(format!(
                "no defaults/ or config/ directory under {}",
                base_dir.display()
            )))
        };
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| seed_error(format!("cannot create {}: {e}", config_dir.display())))?;

    let mut written = Vec::new();
    for source in default_files(&defaults_dir)? {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(name);
        if copy_if_missing(&source, &target)? {
            written.push(target);
        }
    }
    written.sort();
    Ok(written)
}

/// Regular files in `dir`, leaving out `*.example` templates.
fn default_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let listing = std::fs::read_dir(dir)
        .map_err(|e| seed_error(format!("cannot list {}: {e}", dir.display())))?;

    let mut files = Vec::new();
    for entry in listing {
        let path = entry
            .map_err(|e| seed_error(format!("cannot list {}: {e}", dir.display())))?
            .path();
        let is_template = path.extension().is_some_and(|ext| ext == "example");
        if path.is_file() && !is_template {
            files.push(path);
        }
    }
    Ok(files)
}

/// Copy `source` to `target` unless `target` already exists. Creation uses
/// `create_new`, so two processes seeding at once cannot clobber each other.
fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    use std::io::{ErrorKind, Write};

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(seed_error(format!("cannot create {}: {e}", target.display()))),
    };
    let bytes = std::fs::read(source)
        .map_err(|e| seed_error(format!("cannot read {}: {e}", source.display())))?;
    dest.write_all(&bytes)
        .map_err(|e| seed_error(format!("cannot write {}: {e}", target.display())))?;
    Ok(true)
}

fn seed_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

/// Turn the configured database path into a concrete file path. An empty
/// setting resolves to `sixaside.db` in the platform data directory, which is
/// created if missing. `:memory:` passes through unchanged.
pub fn resolve_db_path(configured: &str) -> Result<String, ConfigError> {
    if !configured.is_empty() {
        return Ok(configured.to_string());
    }

    let dirs = directories::ProjectDirs::from("", "", "sixaside").ok_or_else(|| {
        ConfigError::ValidationError {
            field: "database.path".into(),
            message: "empty and no platform data directory is available".into(),
        }
    })?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(|e| ConfigError::ValidationError {
        field: "database.path".into(),
        message: format!("failed to create {}: {e}", data_dir.display()),
    })?;
    Ok(data_dir.join("sixaside.db").display().to_string())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draft.picks_per_team == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.picks_per_team".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.draft.picks_per_team > MAX_PICKS_PER_TEAM {
        return Err(ConfigError::ValidationError {
            field: "draft.picks_per_team".into(),
            message: format!(
                "must be at most {MAX_PICKS_PER_TEAM}, got {}",
                config.draft.picks_per_team
            ),
        });
    }

    if config.draft.min_teams < 2 {
        return Err(ConfigError::ValidationError {
            field: "draft.min_teams".into(),
            message: format!("must be at least 2, got {}", config.draft.min_teams),
        });
    }

    if config.draft.commit_retries == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.commit_retries".into(),
            message: "must be at least 1".into(),
        });
    }

    if config.league.code_length < 4 {
        return Err(ConfigError::ValidationError {
            field: "league.code_length".into(),
            message: format!("must be at least 4, got {}", config.league.code_length),
        });
    }

    if config.catalog.players.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "catalog.players".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
