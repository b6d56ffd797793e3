// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process control boundary
//!
//! Tasks talk to the operating system through [`ProcessAdapter`]: spawn
//! returns a handle, kill is a non-blocking termination request, and exits
//! come back asynchronously as `ProcessExit` events on the adapter's channel.

mod fake;
mod local;

pub use fake::{FakeProcessAdapter, FakeSpawn};
pub use local::LocalProcessAdapter;

use crate::event::{JobId, SpawnToken};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from launching a process
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to spawn \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// A live child process as seen by its owning task
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    pub job: JobId,
    pub token: SpawnToken,
    pub pid: Option<u32>,
}

/// Adapter for spawning and terminating external processes
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    /// Launch `command` with `args`. The eventual exit is reported as a
    /// `ProcessExit` event carrying `token`.
    async fn spawn(
        &self,
        job: &JobId,
        token: SpawnToken,
        command: &str,
        args: &[String],
    ) -> Result<ProcessHandle, SpawnError>;

    /// Request termination of a previously spawned process. Does not wait
    /// for the process to actually die.
    async fn kill(&self, handle: &ProcessHandle);
}
