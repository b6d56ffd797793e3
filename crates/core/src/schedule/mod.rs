// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule algorithms
//!
//! A schedule answers one question: given the current wall-clock time, what
//! should happen next and when. Concrete kinds are resolved from their config
//! type tag in [`build_schedule`], keeping the dispatcher independent of the
//! variants.

mod interval;
mod recurring;

pub use interval::{IntervalSchedule, TimeWindow, WindowRule};
pub use recurring::{RecurringSchedule, RecurringSpec};

use crate::config::ScheduleSpec;
use chrono::NaiveDateTime;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// What a schedule wants done at a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Start,
    Stop,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Start => write!(f, "start"),
            EventKind::Stop => write!(f, "stop"),
        }
    }
}

/// The next boundary a schedule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEvent {
    pub at: NaiveDateTime,
    pub kind: EventKind,
}

/// Errors from building a schedule out of its configuration
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("unknown schedule type \"{0}\"")]
    UnknownType(String),

    #[error("invalid schedule definition: {0}")]
    InvalidSpec(#[from] toml::de::Error),

    #[error("invalid time \"{0}\": expected HH:MM")]
    InvalidTime(String),
}

/// A source of schedule boundaries
pub trait Schedule: fmt::Debug + Send + Sync {
    /// The next relevant event strictly after `now`, or `None` if the
    /// schedule can produce no further events.
    fn next(&self, now: NaiveDateTime) -> Option<ScheduleEvent>;
}

/// Build a schedule from its raw config definition.
///
/// Type tags map to constructors here, so adding a schedule kind never
/// touches the dispatcher.
pub fn build_schedule(spec: &ScheduleSpec) -> Result<Arc<dyn Schedule>, ScheduleError> {
    match spec.kind.as_deref() {
        Some("interval") => {
            let spec: interval::IntervalSpec = spec.decode()?;
            Ok(Arc::new(IntervalSchedule::new(&spec.allowed)?))
        }
        Some("recurring") => {
            let spec: RecurringSpec = spec.decode()?;
            Ok(Arc::new(RecurringSchedule::new(spec)))
        }
        other => Err(ScheduleError::UnknownType(
            other.unwrap_or("unset").to_string(),
        )),
    }
}
