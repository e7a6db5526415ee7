// SQLite persistence layer for leagues, teams, players and draft sessions.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

use crate::catalog::{Player, Position};
use crate::draft::order::OrderEntry;
use crate::draft::pick::Pick;
use crate::draft::session::DraftSession;
use crate::league::{League, Team};

/// SQLite-backed store for everything the draft core reads and writes.
///
/// All access goes through a single connection guarded by a mutex. Writers
/// additionally take SQLite's reserved lock up front (`BEGIN IMMEDIATE`), so
/// two processes sharing one database file serialize the same way two
/// threads sharing one `Database` do.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS leagues (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                code       TEXT NOT NULL UNIQUE,
                owner_id   TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS teams (
                id         TEXT PRIMARY KEY,
                league_id  TEXT NOT NULL REFERENCES leagues(id),
                user_id    TEXT NOT NULL,
                name       TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(league_id, user_id)
            );

            CREATE TABLE IF NOT EXISTS players (
                id       TEXT PRIMARY KEY,
                name     TEXT NOT NULL,
                position TEXT NOT NULL,
                club     TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS draft_sessions (
                id         TEXT PRIMARY KEY,
                league_id  TEXT NOT NULL UNIQUE REFERENCES leagues(id),
                started_at TEXT
            );

            CREATE TABLE IF NOT EXISTS draft_orders (
                session_id  TEXT NOT NULL REFERENCES draft_sessions(id) ON DELETE CASCADE,
                order_index INTEGER NOT NULL,
                team_id     TEXT NOT NULL REFERENCES teams(id),
                PRIMARY KEY (session_id, order_index),
                UNIQUE (session_id, team_id)
            );

            CREATE TABLE IF NOT EXISTS draft_picks (
                id          TEXT PRIMARY KEY,
                session_id  TEXT NOT NULL REFERENCES draft_sessions(id) ON DELETE CASCADE,
                team_id     TEXT NOT NULL REFERENCES teams(id),
                player_id   TEXT NOT NULL REFERENCES players(id),
                round       INTEGER NOT NULL,
                pick_number INTEGER NOT NULL,
                created_at  TEXT NOT NULL,
                UNIQUE (session_id, pick_number),
                UNIQUE (session_id, player_id)
            );

            CREATE TABLE IF NOT EXISTS team_players (
                team_id     TEXT NOT NULL REFERENCES teams(id),
                player_id   TEXT NOT NULL REFERENCES players(id),
                acquired_at TEXT NOT NULL,
                active      INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (team_id, player_id)
            );

            CREATE INDEX IF NOT EXISTS idx_teams_league_id ON teams(league_id);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// A panic while the lock was held leaves at worst an uncommitted
    /// transaction, which rusqlite rolls back on drop, so a poisoned lock is
    /// still safe to reuse.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction. The transaction commits
    /// when `f` returns `Ok` and rolls back otherwise.
    pub fn write<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Run `f` inside a deferred (read) transaction so multi-table reads see
    /// one consistent snapshot.
    pub fn read<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Whether `err` is a lost race rather than a logical failure: the database
/// was busy or locked, or a uniqueness constraint fired because another
/// writer committed the same row first. Such operations are safe to rerun
/// from the top.
pub fn is_transient(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            matches!(
                failure.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) || failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

// ------------------------------------------------------------------
// Timestamps
// ------------------------------------------------------------------

/// Current time at the precision timestamps are stored with. Records built
/// from this compare equal to the same records read back from storage.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Timestamps are stored as fixed-width RFC 3339 text (microsecond precision,
/// `Z` suffix) so lexical order matches chronological order.
pub(crate) fn sql_time(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn time_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_time(&text, idx)
}

fn parse_time(text: &str, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ------------------------------------------------------------------
// Leagues and teams
// ------------------------------------------------------------------

fn league_from_row(row: &Row<'_>) -> rusqlite::Result<League> {
    Ok(League {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        owner_id: row.get(3)?,
        created_at: time_at(row, 4)?,
    })
}

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        league_id: row.get(1)?,
        user_id: row.get(2)?,
        name: row.get(3)?,
        created_at: time_at(row, 4)?,
    })
}

pub fn insert_league(conn: &Connection, league: &League) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO leagues (id, name, code, owner_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            league.id,
            league.name,
            league.code,
            league.owner_id,
            sql_time(&league.created_at),
        ],
    )?;
    Ok(())
}

pub fn league_by_id(conn: &Connection, league_id: &str) -> rusqlite::Result<Option<League>> {
    conn.query_row(
        "SELECT id, name, code, owner_id, created_at FROM leagues WHERE id = ?1",
        params![league_id],
        league_from_row,
    )
    .optional()
}

pub fn league_by_code(conn: &Connection, code: &str) -> rusqlite::Result<Option<League>> {
    conn.query_row(
        "SELECT id, name, code, owner_id, created_at FROM leagues WHERE code = ?1",
        params![code],
        league_from_row,
    )
    .optional()
}

pub fn league_code_exists(conn: &Connection, code: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM leagues WHERE code = ?1)",
        params![code],
        |row| row.get(0),
    )
}

pub fn insert_team(conn: &Connection, team: &Team) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO teams (id, league_id, user_id, name, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            team.id,
            team.league_id,
            team.user_id,
            team.name,
            sql_time(&team.created_at),
        ],
    )?;
    Ok(())
}

/// The team `user_id` manages in `league_id`, if any.
pub fn team_for_user(
    conn: &Connection,
    league_id: &str,
    user_id: &str,
) -> rusqlite::Result<Option<Team>> {
    conn.query_row(
        "SELECT id, league_id, user_id, name, created_at
         FROM teams WHERE league_id = ?1 AND user_id = ?2",
        params![league_id, user_id],
        team_from_row,
    )
    .optional()
}

/// All teams of a league in the order they joined. Insertion order (rowid)
/// breaks ties between teams created within the same microsecond.
pub fn teams_in_join_order(conn: &Connection, league_id: &str) -> rusqlite::Result<Vec<Team>> {
    let mut stmt = conn.prepare(
        "SELECT id, league_id, user_id, name, created_at
         FROM teams WHERE league_id = ?1 ORDER BY created_at, rowid",
    )?;
    let teams = stmt
        .query_map(params![league_id], team_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(teams)
}

// ------------------------------------------------------------------
// Players
// ------------------------------------------------------------------

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    let position: String = row.get(2)?;
    let position = Position::from_str_pos(&position).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown position {position:?}").into(),
        )
    })?;
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        position,
        club: row.get(3)?,
    })
}

/// Insert a player or refresh their catalog fields if the id already exists.
pub fn upsert_player(conn: &Connection, player: &Player) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO players (id, name, position, club)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            name     = excluded.name,
            position = excluded.position,
            club     = excluded.club",
        params![
            player.id,
            player.name,
            player.position.display_str(),
            player.club,
        ],
    )?;
    Ok(())
}

pub fn player_by_id(conn: &Connection, player_id: &str) -> rusqlite::Result<Option<Player>> {
    conn.query_row(
        "SELECT id, name, position, club FROM players WHERE id = ?1",
        params![player_id],
        player_from_row,
    )
    .optional()
}

/// Catalog players not yet picked in `session_id`, ordered by name.
pub fn available_players(conn: &Connection, session_id: &str) -> rusqlite::Result<Vec<Player>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, p.position, p.club FROM players p
         WHERE NOT EXISTS (
             SELECT 1 FROM draft_picks dp
             WHERE dp.session_id = ?1 AND dp.player_id = p.id
         )
         ORDER BY p.name, p.id",
    )?;
    let players = stmt
        .query_map(params![session_id], player_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(players)
}

// ------------------------------------------------------------------
// Draft sessions and order
// ------------------------------------------------------------------

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<DraftSession> {
    let started_at: Option<String> = row.get(2)?;
    Ok(DraftSession {
        id: row.get(0)?,
        league_id: row.get(1)?,
        started_at: started_at.map(|text| parse_time(&text, 2)).transpose()?,
    })
}

pub fn insert_session(conn: &Connection, session: &DraftSession) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO draft_sessions (id, league_id, started_at) VALUES (?1, ?2, ?3)",
        params![
            session.id,
            session.league_id,
            session.started_at.as_ref().map(sql_time),
        ],
    )?;
    Ok(())
}

pub fn session_by_id(conn: &Connection, session_id: &str) -> rusqlite::Result<Option<DraftSession>> {
    conn.query_row(
        "SELECT id, league_id, started_at FROM draft_sessions WHERE id = ?1",
        params![session_id],
        session_from_row,
    )
    .optional()
}

/// The most recent session for a league, started or not.
pub fn latest_session_for_league(
    conn: &Connection,
    league_id: &str,
) -> rusqlite::Result<Option<DraftSession>> {
    conn.query_row(
        "SELECT id, league_id, started_at FROM draft_sessions
         WHERE league_id = ?1 ORDER BY started_at DESC LIMIT 1",
        params![league_id],
        session_from_row,
    )
    .optional()
}

pub fn league_has_started_session(conn: &Connection, league_id: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(
             SELECT 1 FROM draft_sessions
             WHERE league_id = ?1 AND started_at IS NOT NULL
         )",
        params![league_id],
        |row| row.get(0),
    )
}

pub fn insert_order_entry(conn: &Connection, entry: &OrderEntry) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO draft_orders (session_id, order_index, team_id) VALUES (?1, ?2, ?3)",
        params![entry.session_id, entry.order_index, entry.team_id],
    )?;
    Ok(())
}

/// Order entries for a session by ascending index, joined with team names.
pub fn order_for_session(conn: &Connection, session_id: &str) -> rusqlite::Result<Vec<OrderEntry>> {
    let mut stmt = conn.prepare(
        "SELECT o.session_id, o.order_index, o.team_id, t.name, t.user_id
         FROM draft_orders o JOIN teams t ON t.id = o.team_id
         WHERE o.session_id = ?1 ORDER BY o.order_index",
    )?;
    let entries = stmt
        .query_map(params![session_id], |row| {
            Ok(OrderEntry {
                session_id: row.get(0)?,
                order_index: row.get(1)?,
                team_id: row.get(2)?,
                team_name: row.get(3)?,
                manager_id: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

// ------------------------------------------------------------------
// Picks and ownership
// ------------------------------------------------------------------

pub fn insert_pick(conn: &Connection, pick: &Pick) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO draft_picks
            (id, session_id, team_id, player_id, round, pick_number, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            pick.id,
            pick.session_id,
            pick.team_id,
            pick.player_id,
            pick.round,
            pick.pick_number,
            sql_time(&pick.created_at),
        ],
    )?;
    Ok(())
}

/// Picks of a session ordered by pick number.
pub fn picks_for_session(conn: &Connection, session_id: &str) -> rusqlite::Result<Vec<Pick>> {
    let mut stmt = conn.prepare(
        "SELECT id, session_id, team_id, player_id, round, pick_number, created_at
         FROM draft_picks WHERE session_id = ?1 ORDER BY pick_number",
    )?;
    let picks = stmt
        .query_map(params![session_id], |row| {
            Ok(Pick {
                id: row.get(0)?,
                session_id: row.get(1)?,
                team_id: row.get(2)?,
                player_id: row.get(3)?,
                round: row.get(4)?,
                pick_number: row.get(5)?,
                created_at: time_at(row, 6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(picks)
}

pub fn pick_count(conn: &Connection, session_id: &str) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COUNT(*) FROM draft_picks WHERE session_id = ?1",
        params![session_id],
        |row| row.get(0),
    )
}

pub fn player_drafted(conn: &Connection, session_id: &str, player_id: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM draft_picks WHERE session_id = ?1 AND player_id = ?2)",
        params![session_id, player_id],
        |row| row.get(0),
    )
}

/// Record that `team_id` now owns `player_id`.
pub fn grant_ownership(
    conn: &Connection,
    team_id: &str,
    player_id: &str,
    acquired_at: &DateTime<Utc>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO team_players (team_id, player_id, acquired_at, active)
         VALUES (?1, ?2, ?3, 1)",
        params![team_id, player_id, sql_time(acquired_at)],
    )?;
    Ok(())
}

/// Player ids currently owned by a team.
pub fn players_owned_by(conn: &Connection, team_id: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT player_id FROM team_players
         WHERE team_id = ?1 AND active = 1 ORDER BY acquired_at, rowid",
    )?;
    let ids = stmt
        .query_map(params![team_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: create a fresh in-memory database for each test.
    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    fn sample_league(id: &str, code: &str) -> League {
        League {
            id: id.to_string(),
            name: "Sunday Five".to_string(),
            code: code.to_string(),
            owner_id: "owner".to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample_team(id: &str, league_id: &str, user_id: &str) -> Team {
        Team {
            id: id.to_string(),
            league_id: league_id.to_string(),
            user_id: user_id.to_string(),
            name: format!("{user_id} FC"),
            created_at: Utc::now(),
        }
    }

    fn sample_player(id: &str) -> Player {
        Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            position: Position::Midfielder,
            club: "Rovers".to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Schema / open
    // ------------------------------------------------------------------

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        for table in [
            "leagues",
            "teams",
            "players",
            "draft_sessions",
            "draft_orders",
            "draft_picks",
            "team_players",
        ] {
            assert!(tables.contains(&table.to_string()), "missing table {table}");
        }
    }

    #[test]
    fn foreign_keys_enforced() {
        let db = test_db();
        let result: rusqlite::Result<()> =
            db.write(|tx| insert_team(tx, &sample_team("t1", "no-such-league", "u1")));
        assert!(result.is_err());
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    #[test]
    fn write_rolls_back_on_error() {
        let db = test_db();
        let result: rusqlite::Result<()> = db.write(|tx| {
            insert_league(tx, &sample_league("l1", "ABCDEF"))?;
            Err(rusqlite::Error::QueryReturnedNoRows)
        });
        assert!(result.is_err());

        let found: rusqlite::Result<Option<League>> = db.read(|conn| league_by_id(conn, "l1"));
        assert!(found.unwrap().is_none());
    }

    #[test]
    fn duplicate_pick_number_is_transient() {
        let db = test_db();
        let now = Utc::now();
        db.write::<_, rusqlite::Error, _>(|tx| {
            insert_league(tx, &sample_league("l1", "ABCDEF"))?;
            insert_team(tx, &sample_team("t1", "l1", "u1"))?;
            upsert_player(tx, &sample_player("p1"))?;
            upsert_player(tx, &sample_player("p2"))?;
            insert_session(
                tx,
                &DraftSession {
                    id: "s1".into(),
                    league_id: "l1".into(),
                    started_at: Some(now),
                },
            )?;
            insert_pick(
                tx,
                &Pick {
                    id: "k1".into(),
                    session_id: "s1".into(),
                    team_id: "t1".into(),
                    player_id: "p1".into(),
                    round: 1,
                    pick_number: 1,
                    created_at: now,
                },
            )
        })
        .unwrap();

        let err = db
            .write(|tx| {
                insert_pick(
                    tx,
                    &Pick {
                        id: "k2".into(),
                        session_id: "s1".into(),
                        team_id: "t1".into(),
                        player_id: "p2".into(),
                        round: 1,
                        pick_number: 1,
                        created_at: now,
                    },
                )
            })
            .unwrap_err();
        assert!(is_transient(&err));
        assert!(!is_transient(&rusqlite::Error::QueryReturnedNoRows));
    }

    // ------------------------------------------------------------------
    // Leagues and teams
    // ------------------------------------------------------------------

    #[test]
    fn league_lookup_by_id_and_code() {
        let db = test_db();
        db.write(|tx| insert_league(tx, &sample_league("l1", "XKCD42")))
            .unwrap();

        db.read::<_, rusqlite::Error, _>(|conn| {
            let by_id = league_by_id(conn, "l1")?.unwrap();
            assert_eq!(by_id.code, "XKCD42");
            let by_code = league_by_code(conn, "XKCD42")?.unwrap();
            assert_eq!(by_code.id, "l1");
            assert!(league_code_exists(conn, "XKCD42")?);
            assert!(!league_code_exists(conn, "ZZZZZZ")?);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn one_team_per_user_per_league() {
        let db = test_db();
        db.write::<_, rusqlite::Error, _>(|tx| {
            insert_league(tx, &sample_league("l1", "ABCDEF"))?;
            insert_team(tx, &sample_team("t1", "l1", "u1"))
        })
        .unwrap();

        let err = db
            .write(|tx| insert_team(tx, &sample_team("t2", "l1", "u1")))
            .unwrap_err();
        assert!(is_transient(&err), "unique violation expected: {err}");
    }

    #[test]
    fn teams_come_back_in_join_order() {
        let db = test_db();
        let base = Utc::now();
        db.write::<_, rusqlite::Error, _>(|tx| {
            insert_league(tx, &sample_league("l1", "ABCDEF"))?;
            // Same timestamp for all three: insertion order decides.
            for (id, user) in [("tc", "u3"), ("ta", "u1"), ("tb", "u2")] {
                let mut team = sample_team(id, "l1", user);
                team.created_at = base;
                insert_team(tx, &team)?;
            }
            Ok(())
        })
        .unwrap();

        let teams: Vec<Team> = db
            .read::<_, rusqlite::Error, _>(|conn| teams_in_join_order(conn, "l1"))
            .unwrap();
        let ids: Vec<&str> = teams.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tc", "ta", "tb"]);
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    #[test]
    fn upsert_player_refreshes_fields() {
        let db = test_db();
        db.write(|tx| upsert_player(tx, &sample_player("p1")))
            .unwrap();
        let mut moved = sample_player("p1");
        moved.club = "United".to_string();
        moved.position = Position::Forward;
        db.write(|tx| upsert_player(tx, &moved)).unwrap();

        let player = db
            .read::<_, rusqlite::Error, _>(|conn| player_by_id(conn, "p1"))
            .unwrap()
            .unwrap();
        assert_eq!(player.club, "United");
        assert_eq!(player.position, Position::Forward);
    }

    #[test]
    fn now_survives_storage_unchanged() {
        for _ in 0..50 {
            let ts = now();
            assert_eq!(parse_time(&sql_time(&ts), 0).unwrap(), ts);
        }
    }

    #[test]
    fn stored_league_equals_inserted_league() {
        let db = test_db();
        let mut league = sample_league("l1", "ABCDEF");
        league.created_at = now();
        db.write(|tx| insert_league(tx, &league)).unwrap();
        let stored = db
            .read::<_, rusqlite::Error, _>(|conn| league_by_id(conn, "l1"))
            .unwrap();
        assert_eq!(stored, Some(league));
    }

    #[test]
    fn timestamps_round_trip_through_text() {
        let now = Utc::now();
        let text = sql_time(&now);
        let parsed = parse_time(&text, 0).unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
        assert!(text.ends_with('Z'));
    }
}
