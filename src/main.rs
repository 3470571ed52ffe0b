use std::path::PathBuf;

mod ai;
mod app;
mod config;
mod db;
mod digest;
mod error;
mod feed;
mod models;
mod output;
mod services;
mod tui;

use app::App;
use config::Config;
use db::Store;
use error::{AppError, Result};
use output::TerminalWriter;

const USAGE: &str = "Usage: daily-digest [--generate-all] [--terminal] [--config <path>]

  --generate-all     Rebuild the markdown digest of every archived day
  --terminal         Show today's digest in the terminal instead of a file
  --config <path>    Read configuration from <path>
  --help             Show this message";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    generate_all: bool,
    terminal: bool,
    config_path: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--generate-all" => parsed.generate_all = true,
                "--terminal" => parsed.terminal = true,
                "--help" | "-h" => parsed.help = true,
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| AppError::Config("--config needs a path".to_string()))?;
                    parsed.config_path = Some(PathBuf::from(path));
                }
                other => {
                    return Err(AppError::Config(format!("unknown argument: {other}")));
                }
            }
        }
        Ok(parsed)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut config = match &args.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if args.terminal {
        config.terminal_mode = true;
    }

    // The whole run works against this one date.
    let today = chrono::Local::now().date_naive();
    let store = Store::open(&config.db_path, today).await?;

    let result = run(&config, &store, args.generate_all).await;
    store.close().await?;
    result
}

async fn run(config: &Config, store: &Store, generate_all: bool) -> Result<()> {
    let app = App::new(config, store)?;

    if generate_all {
        println!("🍵 Regenerating all daily digests from database...");
        let report = app.run_generate_all().await?;
        for date in &report.failed {
            eprintln!("Failed to regenerate {date}");
        }
        println!("Done. {} digests written.", report.rendered.len());
        return Ok(());
    }

    if config.terminal_mode {
        let mut writer = TerminalWriter::new();
        app.run_live(&mut writer).await?;
        writer.finish(&format!("Daily Digest {}", store.today_key()))
    } else {
        let mut writer = app.today_writer()?;
        app.run_live(&mut writer).await?;
        println!("Wrote {}", writer.path().display());
        Ok(())
    }
}
