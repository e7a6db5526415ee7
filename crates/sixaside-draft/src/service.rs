// Draft service: the outward-facing API over the database.
//
// Every operation takes the acting user's id explicitly; nothing here knows
// about sessions, cookies or requests.

use std::path::Path;

use tracing::{info, warn};

use crate::catalog::{self, CatalogError, Player};
use crate::config::{Config, DraftConfig, LeagueConfig};
use crate::db::{self, Database};
use crate::draft::pick::{submit_pick, Pick};
use crate::draft::session::{start_draft, DraftSession, DraftSessionSummary};
use crate::draft::state::{load_draft_state, DraftStateView};
use crate::draft::DraftError;
use crate::league::{self, League, LeagueError, Team};

pub struct DraftService {
    db: Database,
    draft: DraftConfig,
    league: LeagueConfig,
}

impl DraftService {
    pub fn new(db: Database, draft: DraftConfig, league: LeagueConfig) -> Self {
        Self { db, draft, league }
    }

    pub fn from_config(db: Database, config: &Config) -> Self {
        Self::new(db, config.draft.clone(), config.league.clone())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // ------------------------------------------------------------------
    // Draft lifecycle
    // ------------------------------------------------------------------

    /// Start the league's draft. Only the owner may do this, and only once.
    pub fn start_draft(&self, league_id: &str, user_id: &str) -> Result<DraftSessionSummary, DraftError> {
        self.with_retry("start_draft", |tx| start_draft(tx, league_id, user_id, &self.draft))
    }

    /// Submit a pick for the acting user's team.
    pub fn submit_pick(
        &self,
        league_id: &str,
        session_id: &str,
        user_id: &str,
        player_id: &str,
    ) -> Result<Pick, DraftError> {
        self.with_retry("submit_pick", |tx| {
            submit_pick(tx, league_id, session_id, user_id, player_id, &self.draft)
        })
    }

    /// Read-only projection of a session for display.
    pub fn get_draft_state(&self, session_id: &str) -> Result<DraftStateView, DraftError> {
        self.db
            .read(|conn| load_draft_state(conn, session_id, self.draft.picks_per_team))
    }

    /// The league's draft session, if one has been created.
    pub fn latest_session(&self, league_id: &str) -> Result<Option<DraftSession>, DraftError> {
        self.db
            .read(|conn| Ok(db::latest_session_for_league(conn, league_id)?))
    }

    /// Run one write transaction, rerunning it from scratch when it loses a
    /// storage race. Each attempt re-reads the pick count, so a retried pick
    /// is validated against the state the winner left behind.
    fn with_retry<T, F>(&self, op: &str, f: F) -> Result<T, DraftError>
    where
        F: Fn(&rusqlite::Transaction<'_>) -> Result<T, DraftError>,
    {
        let attempts = self.draft.commit_retries.max(1);
        for attempt in 1..=attempts {
            match self.db.write(&f) {
                Err(e) if e.is_transient() => {
                    warn!("{op}: attempt {attempt}/{attempts} lost a storage race: {e}");
                }
                other => return other,
            }
        }
        Err(DraftError::Conflict { attempts })
    }

    // ------------------------------------------------------------------
    // Leagues
    // ------------------------------------------------------------------

    pub fn create_league(&self, owner_id: &str, name: &str) -> Result<League, LeagueError> {
        self.db
            .write(|tx| league::create_league(tx, owner_id, name, &self.league))
    }

    pub fn join_league(
        &self,
        user_id: &str,
        code: &str,
        team_name: &str,
    ) -> Result<(League, Team), LeagueError> {
        self.db
            .write(|tx| league::join_league(tx, user_id, code, team_name, &self.league))
    }

    /// Teams of a league in join (and therefore first-round) order.
    pub fn teams(&self, league_id: &str) -> Result<Vec<Team>, LeagueError> {
        self.db
            .read(|conn| Ok(db::teams_in_join_order(conn, league_id)?))
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Load a catalog CSV and upsert its players. Returns how many were
    /// written.
    pub fn import_players(&self, path: &Path) -> Result<usize, CatalogError> {
        let players = catalog::load_players(path)?;
        info!("Loaded {} players from {}", players.len(), path.display());
        catalog::import_players(&self.db, &players)
    }

    /// Players still undrafted in a session.
    pub fn available_players(&self, session_id: &str) -> Result<Vec<Player>, DraftError> {
        self.db
            .read(|conn| Ok(db::available_players(conn, session_id)?))
    }
}
