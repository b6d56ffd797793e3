// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor configuration
//!
//! Jobs pair a command with a schedule, either named (shared, defined under
//! `[schedule.<name>]`) or inline. Schedule definitions keep their
//! type-specific fields raw so that a bad definition costs only the jobs
//! referencing it, not the whole configuration.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration: jobs, named schedules, and the rebuild cooldown
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobSpec>,

    #[serde(default, rename = "schedule")]
    pub schedules: HashMap<String, ScheduleSpec>,

    /// Delay between tearing tasks down and rebuilding them after a
    /// configuration change, giving in-flight kills time to land.
    #[serde(default = "default_cooldown", with = "humantime_serde")]
    pub cooldown: Duration,
}

fn default_cooldown() -> Duration {
    Duration::from_secs(1)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            schedules: HashMap::new(),
            cooldown: default_cooldown(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }
}

/// One supervised job definition
#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    pub id: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub restart: RestartPolicy,
    pub schedule: ScheduleRef,
}

/// Whether, and after how many seconds, a job respawns when its process exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestartPolicy(pub Option<u64>);

impl RestartPolicy {
    pub fn delay(&self) -> Option<Duration> {
        self.0.map(Duration::from_secs)
    }
}

impl<'de> Deserialize<'de> for RestartPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Seconds(i64),
            Fraction(f64),
            Other(toml::Value),
        }

        // `false` disables restarts entirely; any other non-numeric value
        // coerces to an immediate restart.
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => RestartPolicy(None),
            Raw::Flag(true) => RestartPolicy(Some(0)),
            Raw::Seconds(secs) => RestartPolicy(Some(secs.max(0) as u64)),
            Raw::Fraction(secs) => RestartPolicy(Some(secs.max(0.0) as u64)),
            Raw::Other(_) => RestartPolicy(Some(0)),
        })
    }
}

/// A job's schedule: the name of a shared definition, or an inline one
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScheduleRef {
    Named(String),
    Inline(ScheduleSpec),
}

/// A raw schedule definition: a type tag plus whatever fields that type needs
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSpec {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub fields: toml::Table,
}

impl ScheduleSpec {
    /// Deserialize the type-specific fields into a concrete spec
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, toml::de::Error> {
        toml::Value::Table(self.fields.clone()).try_into()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
