// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real process control via tokio
//!
//! Every spawn installs a waiter that owns the child and sends exactly one
//! exit notification. Kill requests are forwarded to the waiter through a
//! oneshot, so termination never blocks the caller.

use super::{ProcessAdapter, ProcessHandle, SpawnError};
use crate::event::{ExitOutcome, JobId, ProcessExit, SpawnToken};
use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

type KillMap = Arc<Mutex<HashMap<(JobId, SpawnToken), oneshot::Sender<()>>>>;

/// Spawns real child processes and reports their exits on a channel
#[derive(Clone)]
pub struct LocalProcessAdapter {
    exits: mpsc::Sender<ProcessExit>,
    kills: KillMap,
}

impl LocalProcessAdapter {
    pub fn new(exits: mpsc::Sender<ProcessExit>) -> Self {
        Self {
            exits,
            kills: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProcessAdapter for LocalProcessAdapter {
    async fn spawn(
        &self,
        job: &JobId,
        token: SpawnToken,
        command: &str,
        args: &[String],
    ) -> Result<ProcessHandle, SpawnError> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| SpawnError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let pid = child.id();
        let (kill_tx, mut kill_rx) = oneshot::channel();
        {
            let mut kills = self.kills.lock().unwrap_or_else(|e| e.into_inner());
            kills.insert((job.clone(), token), kill_tx);
        }

        let handle = ProcessHandle {
            job: job.clone(),
            token,
            pid,
        };

        let exits = self.exits.clone();
        let kills = Arc::clone(&self.kills);
        let job = job.clone();
        tokio::spawn(async move {
            let status = tokio::select! {
                status = child.wait() => status,
                request = &mut kill_rx => {
                    if request.is_ok() {
                        let _ = child.start_kill();
                    }
                    child.wait().await
                }
            };

            kills
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&(job.clone(), token));

            let outcome = match status {
                Ok(status) => outcome_of(status),
                Err(_) => ExitOutcome::default(),
            };
            let _ = exits.send(ProcessExit { job, token, outcome }).await;
        });

        Ok(handle)
    }

    async fn kill(&self, handle: &ProcessHandle) {
        let request = {
            let mut kills = self.kills.lock().unwrap_or_else(|e| e.into_inner());
            kills.remove(&(handle.job.clone(), handle.token))
        };
        if let Some(request) = request {
            let _ = request.send(());
        }
    }
}

fn outcome_of(status: std::process::ExitStatus) -> ExitOutcome {
    #[cfg(unix)]
    let signal = std::os::unix::process::ExitStatusExt::signal(&status);
    #[cfg(not(unix))]
    let signal = None;

    ExitOutcome {
        code: status.code(),
        signal,
    }
}
