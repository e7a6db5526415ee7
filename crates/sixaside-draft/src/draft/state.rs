// Read-only draft state projection for display.

use rusqlite::Connection;
use serde::Serialize;

use super::error::DraftError;
use super::order::{DraftOrder, OrderEntry};
use super::pick::Pick;
use super::sequencer::{total_picks, OnClock};
use super::session::{is_complete, DraftSession};
use crate::db;

/// Everything a draft room needs to render: order, picks so far, whose turn
/// it is, and whether the draft is over.
#[derive(Debug, Clone, Serialize)]
pub struct DraftStateView {
    pub session: DraftSession,
    pub ordered_teams: Vec<OrderEntry>,
    pub picks: Vec<Pick>,
    /// `None` once the draft is complete or before it has started.
    pub on_clock: Option<OnClock<OrderEntry>>,
    pub is_complete: bool,
    pub total_picks: u32,
    pub picks_per_team: u32,
}

impl DraftStateView {
    /// Picks made by one team, in pick order.
    pub fn picks_for_team<'a>(&'a self, team_id: &'a str) -> impl Iterator<Item = &'a Pick> + 'a {
        self.picks.iter().filter(move |p| p.team_id == team_id)
    }

    pub fn picks_remaining(&self) -> u32 {
        self.total_picks.saturating_sub(self.picks.len() as u32)
    }
}

/// Build the projection for `session_id` from persisted order and picks.
pub fn load_draft_state(
    conn: &Connection,
    session_id: &str,
    picks_per_team: u32,
) -> Result<DraftStateView, DraftError> {
    let session = db::session_by_id(conn, session_id)?.ok_or_else(|| DraftError::SessionNotFound {
        session_id: session_id.to_string(),
    })?;

    let picks = db::picks_for_session(conn, session_id)?;
    let entries = db::order_for_session(conn, session_id)?;

    if !session.is_started() || entries.is_empty() {
        return Ok(DraftStateView {
            total_picks: total_picks(entries.len(), picks_per_team),
            session,
            ordered_teams: entries,
            picks,
            on_clock: None,
            is_complete: false,
            picks_per_team,
        });
    }

    let order = DraftOrder::from_entries(session_id, entries)?;
    let team_count = order.entries().len();
    let pick_count = picks.len() as u32;
    let on_clock = order
        .on_clock(pick_count, picks_per_team)
        .map(OrderEntry::clone)
        .into_on_clock();

    Ok(DraftStateView {
        total_picks: total_picks(team_count, picks_per_team),
        is_complete: is_complete(pick_count, team_count, picks_per_team),
        on_clock,
        session,
        ordered_teams: order.into_entries(),
        picks,
        picks_per_team,
    })
}
