// League registry: creating leagues with short join codes and joining them.

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::LeagueConfig;
use crate::db;

/// Join-code alphabet. Leaves out 0/O and 1/I, which are easy to misread.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Code generation attempts before giving up on finding an unused code.
const MAX_CODE_ATTEMPTS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    /// Short code managers share to let others join.
    pub code: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// A manager's team within one league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub league_id: String,
    /// The managing user.
    pub user_id: String,
    pub name: String,
    /// Join time; fixes the team's slot in the draft order.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("league code is required")]
    EmptyCode,

    #[error("league not found for code {code}")]
    LeagueCodeNotFound { code: String },

    #[error("you already have a team in this league")]
    AlreadyInLeague,

    #[error("the draft for this league has already started")]
    DraftAlreadyStarted,

    #[error("could not find an unused league code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LeagueError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LeagueError::EmptyCode => "EmptyCode",
            LeagueError::LeagueCodeNotFound { .. } => "LeagueCodeNotFound",
            LeagueError::AlreadyInLeague => "AlreadyInLeague",
            LeagueError::DraftAlreadyStarted => "DraftAlreadyStarted",
            LeagueError::CodeSpaceExhausted { .. } => "CodeSpaceExhausted",
            LeagueError::Storage(_) => "Storage",
        }
    }
}

/// Random join code of `length` characters from [`CODE_ALPHABET`].
pub fn generate_code(rng: &mut impl Rng, length: usize) -> String {
    (0..length)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Normalize a user-typed code: surrounding whitespace dropped, uppercased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Create a league owned by `owner_id`. A blank name falls back to the
/// configured default. Run inside a write transaction so the unused-code
/// check and the insert are atomic.
pub fn create_league(
    conn: &Connection,
    owner_id: &str,
    name: &str,
    settings: &LeagueConfig,
) -> Result<League, LeagueError> {
    let mut rng = rand::rng();
    let mut code = None;
    for _ in 0..MAX_CODE_ATTEMPTS {
        let candidate = generate_code(&mut rng, settings.code_length);
        if !db::league_code_exists(conn, &candidate)? {
            code = Some(candidate);
            break;
        }
    }
    let code = code.ok_or(LeagueError::CodeSpaceExhausted {
        attempts: MAX_CODE_ATTEMPTS,
    })?;

    let name = name.trim();
    let league = League {
        id: Uuid::new_v4().to_string(),
        name: if name.is_empty() {
            settings.default_league_name.clone()
        } else {
            name.to_string()
        },
        code,
        owner_id: owner_id.to_string(),
        created_at: db::now(),
    };
    db::insert_league(conn, &league)?;

    info!("League {} ({}) created by {}", league.id, league.code, owner_id);
    Ok(league)
}

/// Join the league identified by `code` with a new team for `user_id`.
///
/// Owners join their own league this way too. Membership is frozen once the
/// draft starts, so joining after that is rejected.
pub fn join_league(
    conn: &Connection,
    user_id: &str,
    code: &str,
    team_name: &str,
    settings: &LeagueConfig,
) -> Result<(League, Team), LeagueError> {
    let code = normalize_code(code);
    if code.is_empty() {
        return Err(LeagueError::EmptyCode);
    }

    let league = db::league_by_code(conn, &code)?.ok_or(LeagueError::LeagueCodeNotFound { code })?;

    if db::team_for_user(conn, &league.id, user_id)?.is_some() {
        return Err(LeagueError::AlreadyInLeague);
    }

    if db::league_has_started_session(conn, &league.id)? {
        return Err(LeagueError::DraftAlreadyStarted);
    }

    let team_name = team_name.trim();
    let team = Team {
        id: Uuid::new_v4().to_string(),
        league_id: league.id.clone(),
        user_id: user_id.to_string(),
        name: if team_name.is_empty() {
            settings.default_team_name.clone()
        } else {
            team_name.to_string()
        },
        created_at: db::now(),
    };
    db::insert_team(conn, &team)?;

    info!("{} joined league {} as team {}", user_id, league.id, team.name);
    Ok((league, team))
}
