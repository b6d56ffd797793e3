// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task supervision: one external command paired with one schedule
//!
//! A task tracks the operator's intent (running or idle) separately from the
//! live process, so exits can be classified correctly and a configured
//! restart applies only while the task is still meant to be running.

use crate::config::JobSpec;
use crate::event::{ExitOutcome, JobId, SpawnToken};
use crate::process::{ProcessAdapter, ProcessHandle};
use crate::queue::TaskAction;
use crate::schedule::{EventKind, Schedule};
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Whether the task is supposed to have a live process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Idle,
    Running,
}

/// A process exit once the kill bookkeeping has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// We requested the kill ourselves
    Killed,
    /// An external signal ended the process
    Signaled(i32),
    /// The process exited with a non-zero code
    Failed(i32),
    /// The process exited cleanly
    Clean,
}

fn classify(outcome: ExitOutcome, killed_by_us: bool) -> ExitKind {
    if killed_by_us {
        ExitKind::Killed
    } else if let Some(signal) = outcome.signal {
        ExitKind::Signaled(signal)
    } else {
        match outcome.code {
            Some(code) if code != 0 => ExitKind::Failed(code),
            _ => ExitKind::Clean,
        }
    }
}

/// Supervisor for one job's process lifecycle
pub struct Task<P: ProcessAdapter> {
    id: JobId,
    command: String,
    args: Vec<String>,
    restart: Option<Duration>,
    schedule: Arc<dyn Schedule>,
    procs: P,
    intent: Intent,
    active: Option<ProcessHandle>,
    killed: Option<SpawnToken>,
    has_started: bool,
    spawn_seq: u64,
}

impl<P: ProcessAdapter> Task<P> {
    pub fn new(job: &JobSpec, schedule: Arc<dyn Schedule>, procs: P) -> Self {
        Self {
            id: JobId::new(job.id.clone()),
            command: job.command.clone(),
            args: job.args.clone(),
            restart: job.restart.delay(),
            schedule,
            procs,
            intent: Intent::Idle,
            active: None,
            killed: None,
            has_started: false,
            spawn_seq: 0,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// The schedule driving this task
    pub fn schedule(&self) -> &Arc<dyn Schedule> {
        &self.schedule
    }

    /// Whether a process handle is currently held
    pub fn has_process(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.intent == Intent::Running
    }

    /// Begin running: record the intent and spawn the process
    pub async fn start(&mut self) {
        info!(job = %self.id, "starting task");
        self.intent = Intent::Running;
        self.has_started = true;
        self.spawn().await;
    }

    /// Stop running: drop the intent and kill any live process
    pub async fn stop(&mut self) {
        info!(job = %self.id, "stopping task");
        self.intent = Intent::Idle;
        self.kill().await;
    }

    async fn spawn(&mut self) {
        if self.intent != Intent::Running {
            return;
        }

        self.spawn_seq += 1;
        let token = SpawnToken(self.spawn_seq);
        debug!(job = %self.id, "spawning process");
        match self
            .procs
            .spawn(&self.id, token, &self.command, &self.args)
            .await
        {
            Ok(handle) => self.active = Some(handle),
            Err(e) => {
                // Running intent is kept; the next restart or schedule event
                // will try again.
                error!(job = %self.id, error = %e, "could not spawn process");
            }
        }
    }

    /// Request termination of the active process, marking it so the exit
    /// notification classifies as killed-by-us.
    async fn kill(&mut self) {
        if let Some(handle) = self.active.take() {
            debug!(job = %self.id, "killing process");
            self.killed = Some(handle.token);
            self.procs.kill(&handle).await;
        }
    }

    /// A deferred restart came due. Only acts if the task is still meant to
    /// be running.
    pub async fn restart_due(&mut self) {
        if self.intent != Intent::Running {
            debug!(job = %self.id, "skipping restart, task was stopped");
            return;
        }
        self.spawn().await;
    }

    /// Handle an exit notification for this task's process. Returns the
    /// restart delay the dispatcher should schedule, if any.
    pub fn handle_exit(&mut self, token: SpawnToken, outcome: ExitOutcome) -> Option<Duration> {
        match classify(outcome, self.killed == Some(token)) {
            ExitKind::Killed => {
                self.killed = None;
                info!(job = %self.id, "process was killed");
            }
            ExitKind::Signaled(signal) => {
                warn!(job = %self.id, signal, "process was killed by a signal");
            }
            ExitKind::Failed(code) => {
                warn!(job = %self.id, code, "process exited with a non-zero code");
            }
            ExitKind::Clean => {
                info!(job = %self.id, "process finished");
            }
        }

        if self.active.as_ref().is_some_and(|h| h.token == token) {
            self.active = None;
        }

        if self.intent == Intent::Running {
            if let Some(delay) = self.restart {
                debug!(job = %self.id, delay_secs = delay.as_secs(), "scheduling restart");
                return Some(delay);
            }
        }
        None
    }

    /// The task's next queued action, translated from its schedule
    pub fn next(&mut self, now: NaiveDateTime) -> Option<(NaiveDateTime, TaskAction)> {
        let next = self.schedule.next(now)?;
        debug!(job = %self.id, at = %next.at, event = %next.kind, "next schedule event");

        match next.kind {
            EventKind::Start => Some((next.at, TaskAction::Start)),
            EventKind::Stop => {
                if !self.has_started {
                    // Already inside the first window without ever running:
                    // catch up with an immediate start.
                    self.has_started = true;
                    Some((now, TaskAction::Start))
                } else {
                    Some((next.at, TaskAction::Stop))
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
