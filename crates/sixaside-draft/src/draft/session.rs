// Draft session lifecycle: starting a draft and deriving completion.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::error::DraftError;
use super::order::{DraftOrder, OrderEntry};
use super::sequencer::total_picks;
use crate::config::DraftConfig;
use crate::db;

/// One run of the snake draft for a league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSession {
    pub id: String,
    pub league_id: String,
    /// `None` until the owner starts the draft.
    pub started_at: Option<DateTime<Utc>>,
}

impl DraftSession {
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }
}

/// What `start_draft` hands back: the new session and its order.
#[derive(Debug, Clone, Serialize)]
pub struct DraftSessionSummary {
    pub session: DraftSession,
    pub order: Vec<OrderEntry>,
}

/// A session is complete exactly when every team has made all its picks.
/// There is no stored flag; this is recomputed from the pick count.
pub fn is_complete(pick_count: u32, team_count: usize, picks_per_team: u32) -> bool {
    pick_count >= total_picks(team_count, picks_per_team)
}

/// Start the draft for `league_id` on behalf of `user_id`.
///
/// Must run inside a write transaction: the "no started session" check and
/// the inserts commit together, and the `UNIQUE(league_id)` constraint on
/// sessions rejects a concurrent second start that slipped past the check.
/// Teams pick in join order in round one.
pub fn start_draft(
    conn: &Connection,
    league_id: &str,
    user_id: &str,
    rules: &DraftConfig,
) -> Result<DraftSessionSummary, DraftError> {
    let league = db::league_by_id(conn, league_id)?.ok_or_else(|| DraftError::LeagueNotFound {
        league_id: league_id.to_string(),
    })?;

    if league.owner_id != user_id {
        return Err(DraftError::NotOwner);
    }

    let teams = db::teams_in_join_order(conn, league_id)?;
    if teams.len() < rules.min_teams {
        return Err(DraftError::InsufficientTeams {
            required: rules.min_teams,
            found: teams.len(),
        });
    }

    if db::league_has_started_session(conn, league_id)? {
        return Err(DraftError::AlreadyStarted);
    }

    let session = DraftSession {
        id: Uuid::new_v4().to_string(),
        league_id: league_id.to_string(),
        started_at: Some(db::now()),
    };
    db::insert_session(conn, &session)?;

    let order = DraftOrder::from_teams(&session.id, &teams);
    for entry in order.entries() {
        db::insert_order_entry(conn, entry)?;
    }

    info!(
        "Draft {} started for league {} with {} teams",
        session.id,
        league_id,
        order.entries().len()
    );

    Ok(DraftSessionSummary {
        session,
        order: order.into_entries(),
    })
}
