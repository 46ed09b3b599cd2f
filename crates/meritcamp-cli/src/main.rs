//! meritcamp - command-line tool for merit badge event registration.
//!
//! Talks to a registration server, or with `--local <dir>` to a snapshot
//! managed by the in-process engine.

mod app;
mod commands;

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use meritcamp_core::Config;

const USAGE: &str = "\
Usage: meritcamp [--local [DIR]] <command> [args]

Commands:
  login                 Log in to the configured server
  logout                Forget the saved session and password
  whoami                Show the logged-in user
  events                List events
  badges                List badges
  offerings [EVENT]     List an event's offerings
  assignees [EVENT]     Show class rosters by period
  roster [EVENT]        List registered scouts
  stats [EVENT]         Show registration and income totals
  export [EVENT]        Print an event's registrations as JSON
  seed                  Write a demo snapshot (with --local)

EVENT is an event id or `current` (the default).
Set RUST_LOG to control logging, MERITCAMP_API_URL and MERITCAMP_DATA_DIR
to override the config file.";

/// Initialize the tracing subscriber: stderr, plus a daily log file in the
/// cache directory when one is available
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = Config::load()
        .and_then(|c| c.cache_dir())
        .map(|dir| dir.join("logs"))
        .ok();
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "meritcamp.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();
    guard
}

struct Args {
    local: Option<Option<PathBuf>>,
    command: String,
    rest: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Args {
    let mut args = args.into_iter().peekable();
    let mut local = None;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--local" => {
                // Optional directory: anything that is not a command name
                let dir = match args.peek() {
                    Some(next) if !commands::is_command(next) && !next.starts_with("--") => {
                        args.next().map(PathBuf::from)
                    }
                    _ => None,
                };
                local = Some(dir);
            }
            "-h" | "--help" => positional.push("help".to_string()),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = positional.next().unwrap_or_else(|| "help".to_string());
    Args {
        local,
        command,
        rest: positional.collect(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    let _guard = init_tracing();

    let args = parse_args(std::env::args().skip(1));
    if args.command == "help" {
        println!("{}", USAGE);
        return Ok(());
    }
    if !commands::is_command(&args.command) {
        bail!("Unknown command: {}\n\n{}", args.command, USAGE);
    }
    info!(command = %args.command, local = args.local.is_some(), "meritcamp starting");

    let mut app = match args.local {
        Some(dir) => {
            let dir = match dir {
                Some(dir) => dir,
                None => App::default_data_dir()?,
            };
            App::local(&dir)?
        }
        None => App::remote()?,
    };

    commands::run(&mut app, &args.command, &args.rest).await
}
