// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interval schedules: allowed time-of-day windows per weekday
//!
//! Rules expand into per-weekday windows in minutes-of-day, which are merged
//! into a minimal non-overlapping cover. `next()` scans up to seven days
//! ahead for the first boundary still relevant: the end of the window we are
//! currently inside, or the start of the nearest upcoming window.

use super::{EventKind, Schedule, ScheduleError, ScheduleEvent};
use crate::pattern;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use serde::Deserialize;

/// A contiguous allowed range within one weekday, in minutes of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: u16,
    pub end: u16,
}

/// One configured rule: a day-of-week pattern plus a start and end time
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowRule {
    pub dow: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IntervalSpec {
    #[serde(default)]
    pub allowed: Vec<WindowRule>,
}

/// Merged allowed windows for each weekday (0 = Sunday)
#[derive(Debug, Clone)]
pub struct IntervalSchedule {
    windows: [Vec<TimeWindow>; 7],
}

impl IntervalSchedule {
    pub fn new(rules: &[WindowRule]) -> Result<Self, ScheduleError> {
        let mut windows: [Vec<TimeWindow>; 7] = std::array::from_fn(|_| Vec::new());

        for rule in rules {
            let dow = rule.dow.as_deref().unwrap_or("*");
            let start = parse_time(rule.start.as_deref().unwrap_or("00:00"))?;
            let end = parse_time(rule.end.as_deref().unwrap_or("23:59"))?;

            for day in pattern::expand(dow, 7) {
                windows[day as usize].push(TimeWindow { start, end });
            }
        }

        for bucket in &mut windows {
            merge(bucket);
        }

        Ok(Self { windows })
    }

    /// The merged windows for a weekday (0 = Sunday)
    pub fn windows(&self, dow: usize) -> &[TimeWindow] {
        self.windows.get(dow).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Sort by start and collapse overlapping or contained windows in a single
/// left-to-right sweep.
fn merge(windows: &mut Vec<TimeWindow>) {
    windows.sort_by_key(|w| w.start);

    let mut merged: Vec<TimeWindow> = Vec::with_capacity(windows.len());
    for window in windows.drain(..) {
        if let Some(prev) = merged.last_mut() {
            if window.start <= prev.end {
                if window.end > prev.end {
                    prev.end = window.end;
                }
                continue;
            }
        }
        merged.push(window);
    }

    *windows = merged;
}

fn parse_time(text: &str) -> Result<u16, ScheduleError> {
    let invalid = || ScheduleError::InvalidTime(text.to_string());
    let (hour, minute) = text.split_once(':').ok_or_else(invalid)?;
    let hour: u16 = hour.parse().map_err(|_| invalid())?;
    let minute: u16 = minute.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok(hour * 60 + minute)
}

impl Schedule for IntervalSchedule {
    fn next(&self, now: NaiveDateTime) -> Option<ScheduleEvent> {
        let today = now.weekday().num_days_from_sunday();
        let current_minute = (now.hour() * 60 + now.minute()) as u16;

        for offset in 0..7u32 {
            let day = ((today + offset) % 7) as usize;
            // Windows already over today are no longer relevant.
            let window = self.windows[day]
                .iter()
                .find(|w| offset != 0 || w.end > current_minute);
            let Some(window) = window else {
                continue;
            };

            let date = now.date().checked_add_days(Days::new(u64::from(offset)))?;
            let start = at_minute(date, window.start)?;
            // The start instant itself counts as inside the window; a start
            // event firing exactly on time must not produce another start.
            return Some(if start <= now {
                ScheduleEvent {
                    at: at_minute(date, window.end)?,
                    kind: EventKind::Stop,
                }
            } else {
                ScheduleEvent {
                    at: start,
                    kind: EventKind::Start,
                }
            });
        }

        None
    }
}

fn at_minute(date: NaiveDate, minute_of_day: u16) -> Option<NaiveDateTime> {
    date.and_hms_opt(
        u32::from(minute_of_day) / 60,
        u32::from(minute_of_day) % 60,
        0,
    )
}

#[cfg(test)]
#[path = "interval_tests.rs"]
mod tests;
