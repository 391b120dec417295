// src/storage/mod.rs

//! Durable memory between passes.
//!
//! The watcher's only state is a set of strings: canonical links already
//! notified, and (separately) URLs of sites currently known to be down.
//!
//! ## Storage Layout
//!
//! ```text
//! {working dir}/
//! ├── sent_links.json       # Links already announced (grows monotonically)
//! └── site_outages.json     # Sites down at the end of the last pass
//! ```

pub mod local;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// Re-export for convenience
pub use local::JsonFileStore;

/// Insertion-ordered set of strings.
///
/// Order is kept so a size bound can evict the oldest entries first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentLinks {
    links: IndexSet<String>,
}

impl SentLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Add a link; returns `false` if it was already present.
    pub fn insert(&mut self, link: impl Into<String>) -> bool {
        self.links.insert(link.into())
    }

    /// Remove an entry; returns `false` if it was absent.
    pub fn remove(&mut self, link: &str) -> bool {
        self.links.shift_remove(link)
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.links.retain(|link| keep(link));
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }

    /// The newest `max` entries, oldest first.
    pub fn newest(&self, max: usize) -> impl Iterator<Item = &str> {
        self.iter().skip(self.len().saturating_sub(max))
    }
}

impl<S: Into<String>> FromIterator<S> for SentLinks {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// On-disk layout of a store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredLinks {
    /// ISO 8601 timestamp of last write
    pub updated_at: DateTime<Utc>,
    /// Number of entries
    pub count: usize,
    /// Entries, oldest first
    pub links: Vec<String>,
}

impl StoredLinks {
    pub fn new(links: Vec<String>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: links.len(),
            links,
        }
    }
}

/// Trait for link memory backends.
pub trait DedupStore {
    /// Load the stored set.
    ///
    /// Never fails: missing or unreadable state yields an empty set.
    fn load(&self) -> SentLinks;

    /// Replace the stored set with `links`, all-or-nothing.
    fn save(&self, links: &SentLinks) -> Result<()>;
}
