// src/services/mod.rs

//! Service layer for the watcher.
//!
//! This module contains the per-site stages of a pass:
//! - Page fetching (`Fetcher`, `HttpFetcher`)
//! - Notice extraction (`NoticeExtractor`)
//! - Keyword matching (`KeywordMatcher`)
//! - Message delivery (`Notifier`, `TelegramNotifier`)

mod extractor;
mod fetcher;
mod matcher;
mod notifier;

pub use extractor::NoticeExtractor;
pub use fetcher::{FetchedPage, Fetcher, HttpFetcher};
pub use matcher::KeywordMatcher;
pub use notifier::{DeliveryFailure, NotificationResult, Notifier, TelegramNotifier};
