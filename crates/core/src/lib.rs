// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tend-core: Core library for the tend process supervisor
//!
//! This crate provides:
//! - The schedule algorithms (interval windows, recurring triggers) and the
//!   time-pattern matcher they share
//! - The task state machine supervising one external process
//! - The event queue and dispatcher driving everything off a single pending
//!   timer
//! - The process-control boundary (real tokio implementation plus a fake for
//!   tests)

pub mod clock;
pub mod config;
pub mod pattern;
pub mod schedule;

pub mod process;

pub mod dispatch;
pub mod event;
pub mod queue;
pub mod task;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError, JobSpec, RestartPolicy, ScheduleRef, ScheduleSpec};
pub use dispatch::Dispatcher;
pub use event::{ExitOutcome, JobId, ProcessExit, SpawnToken};
pub use process::{
    FakeProcessAdapter, LocalProcessAdapter, ProcessAdapter, ProcessHandle, SpawnError,
};
pub use queue::{EventQueue, QueuedEvent, TaskAction};
pub use schedule::{
    build_schedule, EventKind, IntervalSchedule, RecurringSchedule, Schedule, ScheduleError,
    ScheduleEvent, TimeWindow, WindowRule,
};
pub use task::Task;
