use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use gamedb::cmd::Command;
use gamedb::config::{self, Config};
use gamedb::db;
use gamedb::error::Error;

/// A gamer information database with a console UI
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// SQLite database to use. Defaults to the configured one, or an in-memory database
    database: Option<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match args.config {
        Some(ref path) => config::load_config(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?,
        None => Config::default(),
    };
    if let Some(database) = args.database {
        config.db_config.database_url = database;
    }

    // Logs go to stderr so they never mix with command output
    let subscriber = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_config.filter)));
    tracing::subscriber::set_global_default(subscriber)?;

    if config.db_config.database_url == db::MEMORY_DATABASE {
        println!("NOTE: Connecting to a transient in-memory database. All data will be discarded upon exit.");
    }

    tracing::info!(database = %config.db_config.database_url, "Opening database...");
    let mut conn = db::establish(&config.db_config.database_url)?;

    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            print!("{}", config.console_config.prompt);
            io::stdout().flush()?;
        }

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match Command::parse(line).and_then(|cmd| cmd.run(&mut conn)) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                if let Error::Db(_) | Error::Connection(_) = e {
                    tracing::error!("Command failed: {}", e);
                }
                eprintln!("ERROR: {}", e.as_message());
            }
        }
    }

    tracing::info!("Bye");
    Ok(())
}
