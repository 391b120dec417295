// src/pipeline/mod.rs

//! Pipeline entry points.
//!
//! - `Orchestrator`: drives one pass over injected collaborators
//! - `run_once`: wires the production collaborators and runs one pass

pub mod pass;

pub use pass::{Orchestrator, PassReport};

use crate::error::Result;
use crate::models::{Config, Credentials};
use crate::services::{HttpFetcher, TelegramNotifier};
use crate::storage::JsonFileStore;

/// Run a single pass with the HTTP fetcher, Telegram and JSON file stores.
pub fn run_once(config: &Config, credentials: &Credentials) -> Result<PassReport> {
    let fetcher = HttpFetcher::new(&config.http)?;
    let notifier = TelegramNotifier::new(&config.http, &config.notify, credentials)?;
    let links = JsonFileStore::new(&config.storage.path).with_max_links(config.storage.max_links);
    let outages = JsonFileStore::new(&config.storage.outage_path);

    let orchestrator = Orchestrator::new(config, &fetcher, &notifier, &links, &outages);
    Ok(orchestrator.run_pass())
}
