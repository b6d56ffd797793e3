// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file change detection
//!
//! The daemon polls the file and compares a content hash. Parse failures on
//! a changed file are surfaced to the caller, which keeps the previous
//! configuration running.

use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tend_core::{Config, ConfigError};

pub struct ConfigWatcher {
    path: PathBuf,
    last_hash: Option<[u8; 32]>,
}

impl ConfigWatcher {
    /// Start watching; the file's current contents count as already seen.
    pub fn new(path: PathBuf) -> Self {
        let last_hash = std::fs::read(&path).ok().map(|content| content_hash(&content));
        Self { path, last_hash }
    }

    /// Check the file once. `None` when nothing changed (or the file is
    /// unreadable); otherwise the parse result of the new contents.
    pub fn poll(&mut self) -> Option<Result<Config, ConfigError>> {
        let content = std::fs::read(&self.path).ok()?;
        let hash = content_hash(&content);
        if self.last_hash == Some(hash) {
            return None;
        }

        // Remember the new contents even when they fail to parse, so a
        // broken file is reported once rather than on every poll.
        self.last_hash = Some(hash);
        let text = String::from_utf8_lossy(&content);
        Some(Config::parse(&text))
    }
}

fn content_hash(content: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hasher.finalize().into()
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
