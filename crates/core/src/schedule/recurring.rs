// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring schedules: cron-like day/hour/minute/second triggers

use super::{EventKind, Schedule, ScheduleEvent};
use crate::pattern;
use chrono::{Datelike, Days, Duration, NaiveDateTime};
use serde::Deserialize;

fn star() -> String {
    "*".to_string()
}

/// Raw field patterns, `"*"` for anything unset
#[derive(Debug, Clone, Deserialize)]
pub struct RecurringSpec {
    #[serde(default = "star")]
    pub dow: String,
    #[serde(default = "star")]
    pub hour: String,
    #[serde(default = "star")]
    pub minute: String,
    #[serde(default = "star")]
    pub second: String,
}

impl Default for RecurringSpec {
    fn default() -> Self {
        Self {
            dow: star(),
            hour: star(),
            minute: star(),
            second: star(),
        }
    }
}

/// Fires at every instant matching all four field patterns
#[derive(Debug, Clone)]
pub struct RecurringSchedule {
    spec: RecurringSpec,
}

impl RecurringSchedule {
    pub fn new(spec: RecurringSpec) -> Self {
        Self { spec }
    }
}

impl Schedule for RecurringSchedule {
    fn next(&self, now: NaiveDateTime) -> Option<ScheduleEvent> {
        // Hour, minute and second all share modulus 60; hour values past 23
        // spill into the following days when the candidate is built.
        let days = pattern::expand(&self.spec.dow, 7);
        let hours = pattern::expand(&self.spec.hour, 60);
        let minutes = pattern::expand(&self.spec.minute, 60);
        let seconds = pattern::expand(&self.spec.second, 60);
        if days.is_empty() || hours.is_empty() || minutes.is_empty() || seconds.is_empty() {
            return None;
        }

        let today = now.weekday().num_days_from_sunday();
        let mut offsets: Vec<u64> = days
            .iter()
            .map(|dow| u64::from((7 + dow - today) % 7))
            .collect();
        offsets.sort_unstable();
        offsets.dedup();

        // Because of hour spill a nearer day does not always yield the nearer
        // candidate, so keep the minimum across days.
        let mut best: Option<NaiveDateTime> = None;
        for offset in offsets {
            let midnight = now
                .date()
                .checked_add_days(Days::new(offset))?
                .and_hms_opt(0, 0, 0)?;
            if let Some(candidate) = first_after(midnight, now, &hours, &minutes, &seconds) {
                best = Some(match best {
                    Some(current) if current <= candidate => current,
                    _ => candidate,
                });
            }
        }

        best.map(|at| ScheduleEvent {
            at,
            kind: EventKind::Start,
        })
    }
}

/// First instant of the day starting at `midnight` that is strictly after
/// `now`. Field enumeration is ascending, so the first hit is that day's
/// smallest.
fn first_after(
    midnight: NaiveDateTime,
    now: NaiveDateTime,
    hours: &[u32],
    minutes: &[u32],
    seconds: &[u32],
) -> Option<NaiveDateTime> {
    for &hour in hours {
        for &minute in minutes {
            for &second in seconds {
                let offset = i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second);
                let candidate = midnight.checked_add_signed(Duration::seconds(offset))?;
                if candidate > now {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "recurring_tests.rs"]
mod tests;
