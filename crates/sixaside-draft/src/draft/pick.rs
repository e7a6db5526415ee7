// Pick validation and commit.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::DraftError;
use super::order::DraftOrder;
use super::session::is_complete;
use crate::config::DraftConfig;
use crate::db;

/// A committed draft pick. Picks are append-only: never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub id: String,
    pub session_id: String,
    pub team_id: String,
    pub player_id: String,
    /// 1-based round the pick was made in.
    pub round: u32,
    /// Sequential pick number (1-indexed, gapless within a session).
    pub pick_number: u32,
    pub created_at: DateTime<Utc>,
}

/// Validate and commit one pick.
///
/// Checks run in a fixed order and the first failure wins:
/// session started, user has a team, player exists, player not yet drafted,
/// draft not complete, acting team on the clock. On success the pick row and
/// the team's ownership of the player are written.
///
/// Must run inside a write transaction so the count read for sequencing and
/// the insert are serialized with every other writer, and so the two inserts
/// land together or not at all.
pub fn submit_pick(
    conn: &Connection,
    league_id: &str,
    session_id: &str,
    user_id: &str,
    player_id: &str,
    rules: &DraftConfig,
) -> Result<Pick, DraftError> {
    let session = db::session_by_id(conn, session_id)?
        .filter(|s| s.league_id == league_id && s.is_started())
        .ok_or(DraftError::NotStarted)?;

    let team = db::team_for_user(conn, league_id, user_id)?.ok_or(DraftError::NoTeamInLeague)?;

    if db::player_by_id(conn, player_id)?.is_none() {
        return Err(DraftError::PlayerNotFound {
            player_id: player_id.to_string(),
        });
    }

    if db::player_drafted(conn, &session.id, player_id)? {
        return Err(DraftError::PlayerAlreadyDrafted {
            player_id: player_id.to_string(),
        });
    }

    let order = DraftOrder::from_entries(&session.id, db::order_for_session(conn, &session.id)?)?;
    let picks_so_far = db::pick_count(conn, &session.id)?;

    if is_complete(picks_so_far, order.entries().len(), rules.picks_per_team) {
        return Err(DraftError::DraftComplete);
    }
    let slot = order
        .on_clock(picks_so_far, rules.picks_per_team)
        .into_on_clock()
        .ok_or(DraftError::DraftComplete)?;

    if slot.team.team_id != team.id {
        debug!(
            "Rejected pick from {} in session {}: pick {} belongs to {}",
            team.id, session.id, slot.pick_number, slot.team.team_id
        );
        return Err(DraftError::NotYourTurn {
            pick_number: slot.pick_number,
            on_clock_team: slot.team.team_name.clone(),
        });
    }

    let now = db::now();
    let pick = Pick {
        id: Uuid::new_v4().to_string(),
        session_id: session.id.clone(),
        team_id: team.id.clone(),
        player_id: player_id.to_string(),
        round: slot.round,
        pick_number: slot.pick_number,
        created_at: now,
    };
    db::insert_pick(conn, &pick)?;
    db::grant_ownership(conn, &team.id, player_id, &now)?;

    info!(
        "Pick {} (round {}) in session {}: {} took {}",
        pick.pick_number, pick.round, pick.session_id, team.name, pick.player_id
    );

    Ok(pick)
}
