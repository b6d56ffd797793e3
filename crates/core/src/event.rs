// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events flowing from child processes back into the dispatcher

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a supervised job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifies one spawn of a job's process. Exits are matched against it, so
/// a notification from a torn-down generation cannot touch fresh state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnToken(pub u64);

/// How a child process ended, as reported by the operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitOutcome {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitOutcome {
    pub fn clean() -> Self {
        Self {
            code: Some(0),
            signal: None,
        }
    }

    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn with_signal(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }
}

/// Exit notification delivered from a process waiter to the dispatcher
#[derive(Debug, Clone)]
pub struct ProcessExit {
    pub job: JobId,
    pub token: SpawnToken,
    pub outcome: ExitOutcome,
}
