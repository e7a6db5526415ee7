// SixASide draft entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries command output)
// 2. Load config
// 3. Open database
// 4. Import the player catalog
// 5. Read commands from stdin until EOF or `quit`

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use sixaside_draft::command::{self, Command};
use sixaside_draft::config;
use sixaside_draft::db::Database;
use sixaside_draft::service::DraftService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("SixASide draft starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} picks per team, {} teams minimum",
        config.draft.picks_per_team, config.draft.min_teams
    );

    // 3. Open database
    let db_path = config::resolve_db_path(&config.db_path).context("failed to resolve database path")?;
    let db = Database::open(&db_path).context("failed to open database")?;
    info!("Database opened at {db_path}");

    let service = Arc::new(DraftService::from_config(db, &config));

    // 4. Import the player catalog
    let catalog_path = Path::new(&config.catalog.players);
    if catalog_path.exists() {
        let count = service
            .import_players(catalog_path)
            .with_context(|| format!("failed to import {}", catalog_path.display()))?;
        info!("Catalog ready: {count} players");
    } else {
        warn!(
            "Player catalog {} not found; picks will fail with PlayerNotFound",
            catalog_path.display()
        );
    }

    // 5. Command loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let parsed = match command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", command::parse_error(&message));
                continue;
            }
        };
        if parsed == Command::Quit {
            break;
        }

        let svc = Arc::clone(&service);
        match tokio::task::spawn_blocking(move || command::execute(&svc, &parsed)).await {
            Ok(output) => println!("{output}"),
            Err(e) => error!("Command task failed: {e}"),
        }
    }

    info!("SixASide draft shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file so stdout stays machine-readable.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("sixaside.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sixaside_draft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
