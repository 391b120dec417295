// src/storage/local.rs

//! Local filesystem storage implementation.
//!
//! Each store is one JSON file, replaced wholesale on every save by writing
//! a sibling temp file and renaming it over the target.

use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::storage::{DedupStore, SentLinks, StoredLinks};

/// JSON file backed link store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    max_links: Option<usize>,
}

impl JsonFileStore {
    /// Create an unbounded store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_links: None,
        }
    }

    /// Keep at most `max_links` entries on save, dropping the oldest.
    pub fn with_max_links(mut self, max_links: Option<usize>) -> Self {
        self.max_links = max_links;
        self
    }

    /// Sibling temp file: the target's file name with `.tmp` appended.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Ensure parent directory exists.
    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir()?;

        let tmp = self.tmp_path();
        let written = fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(bytes)?;
            file.flush()?;
            file.sync_all()
        });

        if let Err(e) = written.and_then(|()| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(AppError::Io(e));
        }
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Accept the current layout or a bare array of strings.
    fn parse(bytes: &[u8]) -> Result<Vec<String>> {
        match serde_json::from_slice::<StoredLinks>(bytes) {
            Ok(stored) => Ok(stored.links),
            Err(e) => serde_json::from_slice::<Vec<String>>(bytes).map_err(|_| AppError::Json(e)),
        }
    }
}

impl DedupStore for JsonFileStore {
    fn load(&self) -> SentLinks {
        let bytes = match self.read_bytes() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!(
                    "No state at {}; starting with empty memory",
                    self.path.display()
                );
                return SentLinks::new();
            }
            Err(e) => {
                log::warn!(
                    "Could not read {}: {}. Starting with empty memory",
                    self.path.display(),
                    e
                );
                return SentLinks::new();
            }
        };

        match Self::parse(&bytes) {
            Ok(links) => {
                let links: SentLinks = links.into_iter().collect();
                log::debug!("Loaded {} entries from {}", links.len(), self.path.display());
                links
            }
            Err(e) => {
                log::warn!(
                    "State at {} is corrupt ({}). Starting with empty memory",
                    self.path.display(),
                    e
                );
                SentLinks::new()
            }
        }
    }

    fn save(&self, links: &SentLinks) -> Result<()> {
        let kept: Vec<String> = match self.max_links {
            Some(max) => links.newest(max).map(String::from).collect(),
            None => links.iter().map(String::from).collect(),
        };
        let evicted = links.len() - kept.len();
        if evicted > 0 {
            log::info!("Evicting {} oldest entries from {}", evicted, self.path.display());
        }

        let bytes = serde_json::to_vec_pretty(&StoredLinks::new(kept))?;
        self.write_bytes(&bytes)?;
        log::debug!("Saved {} entries to {}", links.len() - evicted, self.path.display());
        Ok(())
    }
}
