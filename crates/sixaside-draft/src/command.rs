// Line-oriented command parsing and dispatch for the `sixaside` binary.
//
// Each stdin line becomes a Command; executing it against the DraftService
// yields one JSON value to print. Errors are reported as
// `{"error": <message>, "kind": <kind>}` rather than aborting the loop.

use serde::Serialize;
use serde_json::{json, Value};

use crate::draft::DraftError;
use crate::service::DraftService;

pub const HELP: &str = "\
commands:
  create-league <user> [name...]
  join <user> <code> [team name...]
  start <league> <user>
  pick <league> <session> <user> <player>
  session <league>
  state <session>
  players <session>
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateLeague { user: String, name: String },
    Join { user: String, code: String, team_name: String },
    Start { league: String, user: String },
    Pick { league: String, session: String, user: String, player: String },
    Session { league: String },
    State { session: String },
    Players { session: String },
    Help,
    Quit,
}

/// Parse one input line. Blank lines and `#` comments parse to `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let (verb, args) = (words[0], &words[1..]);
    let rest = |from: usize| args.get(from..).map(|w| w.join(" ")).unwrap_or_default();

    let command = match (verb, args.len()) {
        ("create-league", n) if n >= 1 => Command::CreateLeague {
            user: args[0].to_string(),
            name: rest(1),
        },
        ("join", n) if n >= 2 => Command::Join {
            user: args[0].to_string(),
            code: args[1].to_string(),
            team_name: rest(2),
        },
        ("start", 2) => Command::Start {
            league: args[0].to_string(),
            user: args[1].to_string(),
        },
        ("pick", 4) => Command::Pick {
            league: args[0].to_string(),
            session: args[1].to_string(),
            user: args[2].to_string(),
            player: args[3].to_string(),
        },
        ("session", 1) => Command::Session {
            league: args[0].to_string(),
        },
        ("state", 1) => Command::State {
            session: args[0].to_string(),
        },
        ("players", 1) => Command::Players {
            session: args[0].to_string(),
        },
        ("help", 0) => Command::Help,
        ("quit" | "exit", 0) => Command::Quit,
        ("create-league" | "join" | "start" | "pick" | "session" | "state" | "players" | "help" | "quit"
        | "exit", _) => return Err(format!("wrong number of arguments for `{verb}`")),
        _ => return Err(format!("unknown command `{verb}`")),
    };
    Ok(Some(command))
}

/// Execute a parsed command. `Quit` is handled by the caller and yields
/// `null` here.
pub fn execute(service: &DraftService, command: &Command) -> Value {
    match command {
        Command::CreateLeague { user, name } => {
            to_json(service.create_league(user, name).map_err(|e| (e.kind(), e.to_string())))
        }
        Command::Join {
            user,
            code,
            team_name,
        } => to_json(
            service
                .join_league(user, code, team_name)
                .map(|(league, team)| json!({ "league": league, "team": team }))
                .map_err(|e| (e.kind(), e.to_string())),
        ),
        Command::Start { league, user } => {
            to_json(service.start_draft(league, user).map_err(|e| (e.kind(), e.to_string())))
        }
        Command::Pick {
            league,
            session,
            user,
            player,
        } => to_json(
            service
                .submit_pick(league, session, user, player)
                .map_err(|e| (e.kind(), e.to_string())),
        ),
        Command::Session { league } => to_json(
            service
                .latest_session(league)
                .and_then(|session| session.ok_or(DraftError::NotStarted))
                .map_err(|e| (e.kind(), e.to_string())),
        ),
        Command::State { session } => {
            to_json(service.get_draft_state(session).map_err(|e| (e.kind(), e.to_string())))
        }
        Command::Players { session } => to_json(
            service
                .available_players(session)
                .map_err(|e| (e.kind(), e.to_string())),
        ),
        Command::Help => Value::String(HELP.to_string()),
        Command::Quit => Value::Null,
    }
}

/// Error body for a line that failed to parse.
pub fn parse_error(message: &str) -> Value {
    json!({ "error": message, "kind": "BadCommand" })
}

fn to_json<T: Serialize>(result: Result<T, (&'static str, String)>) -> Value {
    match result {
        Ok(value) => serde_json::to_value(value)
            .unwrap_or_else(|e| json!({ "error": e.to_string(), "kind": "Serialization" })),
        Err((kind, message)) => json!({ "error": message, "kind": kind }),
    }
}
