// Draft error taxonomy.

use thiserror::Error;

/// Every way a draft operation can fail. Validation variants are final and
/// never retried; only [`DraftError::Storage`] can be transient.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("league {league_id} not found")]
    LeagueNotFound { league_id: String },

    #[error("only the league owner can start the draft")]
    NotOwner,

    #[error("at least {required} teams are required to start a draft, league has {found}")]
    InsufficientTeams { required: usize, found: usize },

    #[error("draft has already been started for this league")]
    AlreadyStarted,

    #[error("draft has not been started")]
    NotStarted,

    #[error("draft session {session_id} not found")]
    SessionNotFound { session_id: String },

    #[error("you do not have a team in this league")]
    NoTeamInLeague,

    #[error("player {player_id} not found")]
    PlayerNotFound { player_id: String },

    #[error("player {player_id} already drafted")]
    PlayerAlreadyDrafted { player_id: String },

    #[error("draft is already complete")]
    DraftComplete,

    #[error("it is not your turn to pick (pick {pick_number} belongs to {on_clock_team})")]
    NotYourTurn {
        pick_number: u32,
        on_clock_team: String,
    },

    #[error("draft order for session {session_id} is corrupt: {reason}")]
    CorruptOrder { session_id: String, reason: String },

    #[error("gave up after {attempts} attempts lost to concurrent writers")]
    Conflict { attempts: u32 },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl DraftError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DraftError::LeagueNotFound { .. } => "LeagueNotFound",
            DraftError::NotOwner => "NotOwner",
            DraftError::InsufficientTeams { .. } => "InsufficientTeams",
            DraftError::AlreadyStarted => "AlreadyStarted",
            DraftError::NotStarted => "NotStarted",
            DraftError::SessionNotFound { .. } => "SessionNotFound",
            DraftError::NoTeamInLeague => "NoTeamInLeague",
            DraftError::PlayerNotFound { .. } => "PlayerNotFound",
            DraftError::PlayerAlreadyDrafted { .. } => "PlayerAlreadyDrafted",
            DraftError::DraftComplete => "DraftComplete",
            DraftError::NotYourTurn { .. } => "NotYourTurn",
            DraftError::CorruptOrder { .. } => "CorruptOrder",
            DraftError::Conflict { .. } => "Conflict",
            DraftError::Storage(_) => "Storage",
        }
    }

    /// Whether rerunning the whole operation could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            DraftError::Storage(e) => crate::db::is_transient(e),
            _ => false,
        }
    }
}
