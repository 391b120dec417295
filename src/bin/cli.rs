// src/bin/cli.rs

//! pharmawatch CLI
//!
//! Runs exactly one pass and exits. Meant to be triggered by an external
//! scheduler (cron, CI schedule). Secrets come from `TELEGRAM_TOKEN` and
//! `TELEGRAM_CHAT_ID`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pharmawatch::{
    error::Result,
    models::{Config, Credentials},
    pipeline::{self, PassReport},
};

/// pharmawatch - recruitment notice watcher
#[derive(Parser, Debug)]
#[command(
    name = "pharmawatch",
    version,
    about = "Checks recruitment pages once and pushes new pharmacy notices to Telegram"
)]
struct Cli {
    /// Path to the TOML configuration (built-in defaults if absent)
    #[arg(short, long, env = "PHARMAWATCH_CONFIG", default_value = "pharmawatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, env = "PHARMAWATCH_VERBOSE")]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: &Cli) -> Result<PassReport> {
    let config = if cli.config.exists() {
        let config = Config::load(&cli.config)?;
        log::info!("Loaded configuration from {}", cli.config.display());
        config
    } else {
        Config::load_or_default(&cli.config)
    };
    config.validate()?;

    let credentials = Credentials::from_env()?;

    pipeline::run_once(&config, &credentials)
}

/// Main entry point for the CLI application.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("pharmawatch starting...");

    match run(&cli) {
        Ok(report) if report.persist_failed() => {
            log::error!("Pass finished but link memory was not saved");
            ExitCode::FAILURE
        }
        Ok(_) => {
            log::info!("Done!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
