// src/models/mod.rs

//! Domain models for the watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod notice;
mod site;

// Re-export all public types
pub use config::{
    CHAT_ID_ENV, Config, Credentials, HttpConfig, NotifyConfig, SiteDownAlerts, StorageConfig,
    TOKEN_ENV,
};
pub use notice::{CandidateNotice, Notice, escape_html, fill_template};
pub use site::{ExtractionRule, SiteConfig};
