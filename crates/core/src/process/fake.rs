// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory process adapter for tests
//!
//! Records spawn and kill requests without touching the OS. Tests drive exit
//! handling by feeding `ProcessExit` values to the dispatcher directly, so
//! the fake never completes processes on its own.

use super::{ProcessAdapter, ProcessHandle, SpawnError};
use crate::event::{JobId, SpawnToken};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct FakeProcessAdapter {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    spawns: Vec<FakeSpawn>,
    kills: Vec<(JobId, SpawnToken)>,
    failing: HashSet<String>,
    next_pid: u32,
}

/// One recorded spawn request
#[derive(Debug, Clone)]
pub struct FakeSpawn {
    pub job: JobId,
    pub token: SpawnToken,
    pub command: String,
    pub args: Vec<String>,
}

impl FakeProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent spawn of `command` fail
    pub fn fail_command(&self, command: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.failing.insert(command.to_string());
    }

    pub fn spawns(&self) -> Vec<FakeSpawn> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.spawns.clone()
    }

    pub fn spawn_count(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.spawns.len()
    }

    pub fn last_spawn(&self) -> Option<FakeSpawn> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.spawns.last().cloned()
    }

    pub fn kills(&self) -> Vec<(JobId, SpawnToken)> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.kills.clone()
    }
}

#[async_trait]
impl ProcessAdapter for FakeProcessAdapter {
    async fn spawn(
        &self,
        job: &JobId,
        token: SpawnToken,
        command: &str,
        args: &[String],
    ) -> Result<ProcessHandle, SpawnError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if state.failing.contains(command) {
            return Err(SpawnError::Spawn {
                command: command.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        state.next_pid += 1;
        let pid = state.next_pid;
        state.spawns.push(FakeSpawn {
            job: job.clone(),
            token,
            command: command.to_string(),
            args: args.to_vec(),
        });

        Ok(ProcessHandle {
            job: job.clone(),
            token,
            pid: Some(pid),
        })
    }

    async fn kill(&self, handle: &ProcessHandle) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.kills.push((handle.job.clone(), handle.token));
    }
}
