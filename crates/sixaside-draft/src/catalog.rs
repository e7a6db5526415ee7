// Player catalog: CSV loading and the position model.
//
// The catalog CSV has the header `id,name,position,club`. Extra columns are
// ignored so exports from other tools can be dropped in unchanged.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::{self, Database};

/// Six-a-side positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Accepts the short codes (GK, DEF, MID, FWD), the single-letter forms
    /// (G, D, M, F) and the full names, case-insensitively.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GK" | "G" | "GOALKEEPER" => Some(Position::Goalkeeper),
            "DEF" | "D" | "DEFENDER" => Some(Position::Defender),
            "MID" | "M" | "MIDFIELDER" => Some(Position::Midfielder),
            "FWD" | "F" | "FORWARD" => Some(Position::Forward),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A draftable player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    /// Real-world club, empty when unknown.
    pub club: String,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    id: String,
    name: String,
    position: String,
    #[serde(default)]
    club: String,
}

/// Load players from a catalog CSV file on disk.
pub fn load_players(path: &Path) -> Result<Vec<Player>, CatalogError> {
    let path_str = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| CatalogError::Io {
        path: path_str.clone(),
        source: e,
    })?;
    parse_players(file, &path_str)
}

/// Parse catalog rows from any reader. `source_name` labels errors.
///
/// Rows with a blank id or name are skipped with a warning. An unknown
/// position or a repeated id rejects the whole file.
pub fn parse_players<R: Read>(reader: R, source_name: &str) -> Result<Vec<Player>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut players = Vec::new();
    let mut seen = HashSet::new();

    for (line, result) in rdr.deserialize::<RawPlayerRow>().enumerate() {
        let row = result.map_err(|e| CatalogError::Csv {
            path: source_name.to_string(),
            source: e,
        })?;

        if row.id.is_empty() || row.name.is_empty() {
            warn!("{source_name}: skipping row {} with blank id or name", line + 2);
            continue;
        }

        let position = Position::from_str_pos(&row.position).ok_or_else(|| {
            CatalogError::Validation(format!(
                "{source_name}: player {} has unknown position {:?}",
                row.id, row.position
            ))
        })?;

        if !seen.insert(row.id.clone()) {
            return Err(CatalogError::Validation(format!(
                "{source_name}: duplicate player id {}",
                row.id
            )));
        }

        players.push(Player {
            id: row.id,
            name: row.name,
            position,
            club: row.club,
        });
    }

    Ok(players)
}

/// Upsert every player into the database in a single transaction. Returns
/// the number of rows written.
pub fn import_players(db: &Database, players: &[Player]) -> Result<usize, CatalogError> {
    let count = db.write(|tx| {
        for player in players {
            db::upsert_player(tx, player)?;
        }
        Ok::<_, CatalogError>(players.len())
    })?;
    info!("Imported {count} players into the catalog");
    Ok(count)
}
