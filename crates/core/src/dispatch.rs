// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dispatcher: one timer, many tasks
//!
//! All pending work funnels into three collections owned here: the event
//! queue, due one-shot restarts, and an optional pending rebuild. The daemon
//! loop asks for the single next delay, sleeps it, and calls [`Dispatcher::tick`];
//! process exits are routed in between. A configuration change tears
//! everything down atomically and rebuilds once the cooldown has passed.

use crate::clock::Clock;
use crate::config::{Config, ScheduleRef};
use crate::event::{JobId, ProcessExit};
use crate::process::ProcessAdapter;
use crate::queue::{EventQueue, QueuedEvent, TaskAction};
use crate::schedule::{build_schedule, Schedule};
use crate::task::Task;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

struct PendingRebuild {
    at: NaiveDateTime,
    config: Config,
}

struct RestartEntry {
    at: NaiveDateTime,
    job: JobId,
}

/// Owns every task and orders all pending work behind a single timer
pub struct Dispatcher<P: ProcessAdapter, C: Clock> {
    procs: P,
    clock: C,
    tasks: HashMap<JobId, Task<P>>,
    queue: EventQueue,
    restarts: Vec<RestartEntry>,
    rebuild: Option<PendingRebuild>,
}

impl<P: ProcessAdapter, C: Clock> Dispatcher<P, C> {
    pub fn new(procs: P, clock: C) -> Self {
        Self {
            procs,
            clock,
            tasks: HashMap::new(),
            queue: EventQueue::new(),
            restarts: Vec::new(),
            rebuild: None,
        }
    }

    /// Apply a configuration: tear down the current task set and schedule a
    /// rebuild once the cooldown has passed. The initial configuration goes
    /// through the same path, where the teardown is a no-op.
    pub async fn apply_config(&mut self, config: Config) {
        if !self.tasks.is_empty() {
            info!("configuration changed, stopping all tasks");
        }
        self.teardown().await;

        let at = after(self.clock.now(), config.cooldown);
        self.rebuild = Some(PendingRebuild { at, config });
    }

    /// Stop every task and drop all pending work
    pub async fn shutdown(&mut self) {
        info!("stopping all tasks");
        self.teardown().await;
        self.rebuild = None;
    }

    async fn teardown(&mut self) {
        for task in self.tasks.values_mut() {
            task.stop().await;
        }
        self.tasks.clear();
        self.queue.clear();
        self.restarts.clear();
    }

    /// How long the single pending timer should sleep, or `None` when the
    /// dispatcher is idle.
    pub fn next_delay(&self) -> Option<Duration> {
        let now = self.clock.now();
        let mut delay: Option<Duration> = None;

        // Queue events wait at least one whole second, so already-due
        // entries cannot busy-loop.
        if let Some(at) = self.queue.next_at() {
            let secs = (at - now).num_seconds().max(1);
            consider(&mut delay, Duration::from_secs(secs as u64));
        }
        for entry in &self.restarts {
            consider(&mut delay, until(now, entry.at));
        }
        if let Some(rebuild) = &self.rebuild {
            consider(&mut delay, until(now, rebuild.at));
        }

        delay
    }

    /// Run everything that has come due: a pending rebuild first, then due
    /// restarts, then at most one queue event. The caller re-arms via
    /// [`Self::next_delay`] after every tick.
    pub async fn tick(&mut self) {
        let now = self.clock.now();

        if self.rebuild.as_ref().is_some_and(|r| r.at <= now) {
            if let Some(rebuild) = self.rebuild.take() {
                self.build_tasks(&rebuild.config);
            }
            // Freshly seeded events wait for the next arming of the timer.
            return;
        }

        let mut due = Vec::new();
        self.restarts.retain(|entry| {
            if entry.at <= now {
                due.push(entry.job.clone());
                false
            } else {
                true
            }
        });
        for job in due {
            if let Some(task) = self.tasks.get_mut(&job) {
                task.restart_due().await;
            }
        }

        if self.queue.next_at().is_some_and(|at| at <= now) {
            if let Some(event) = self.queue.pop() {
                self.fire(event).await;
            }
        }
    }

    async fn fire(&mut self, event: QueuedEvent) {
        let Some(task) = self.tasks.get_mut(&event.job) else {
            return;
        };

        match event.action {
            TaskAction::Start => task.start().await,
            TaskAction::Stop => task.stop().await,
        }

        // The fired task owes the queue its next event.
        let now = self.clock.now();
        if let Some((at, action)) = task.next(now) {
            self.queue.push(at, event.job, action);
        }
    }

    /// Route a process exit to its owning task; a returned delay becomes a
    /// pending one-shot restart.
    pub async fn handle_exit(&mut self, exit: ProcessExit) {
        let Some(task) = self.tasks.get_mut(&exit.job) else {
            debug!(job = %exit.job, "exit notification for unknown task");
            return;
        };

        if let Some(delay) = task.handle_exit(exit.token, exit.outcome) {
            let at = after(self.clock.now(), delay);
            self.restarts.push(RestartEntry { at, job: exit.job });
        }
    }

    fn build_tasks(&mut self, config: &Config) {
        let mut by_name: HashMap<String, Arc<dyn Schedule>> = HashMap::new();

        for job in &config.jobs {
            let schedule = match &job.schedule {
                ScheduleRef::Named(name) => {
                    if let Some(schedule) = by_name.get(name) {
                        Arc::clone(schedule)
                    } else {
                        let Some(spec) = config.schedules.get(name) else {
                            warn!(
                                job = %job.id,
                                schedule = %name,
                                "could not create task: unknown schedule"
                            );
                            continue;
                        };
                        match build_schedule(spec) {
                            Ok(schedule) => {
                                by_name.insert(name.clone(), Arc::clone(&schedule));
                                schedule
                            }
                            Err(e) => {
                                warn!(job = %job.id, error = %e, "could not create task");
                                continue;
                            }
                        }
                    }
                }
                ScheduleRef::Inline(spec) => match build_schedule(spec) {
                    Ok(schedule) => schedule,
                    Err(e) => {
                        warn!(job = %job.id, error = %e, "could not create task");
                        continue;
                    }
                },
            };

            info!(job = %job.id, "creating task");
            let mut task = Task::new(job, schedule, self.procs.clone());

            let now = self.clock.now();
            if let Some((at, action)) = task.next(now) {
                self.queue.push(at, task.id().clone(), action);
            }
            self.tasks.insert(task.id().clone(), task);
        }
    }

    /// Iterate over the current tasks
    pub fn tasks(&self) -> impl Iterator<Item = &Task<P>> {
        self.tasks.values()
    }

    /// Look up a task by job id
    pub fn task(&self, id: &JobId) -> Option<&Task<P>> {
        self.tasks.get(id)
    }

    /// Number of events waiting in the queue
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Number of pending one-shot restarts
    pub fn pending_restarts(&self) -> usize {
        self.restarts.len()
    }

    /// Whether a rebuild is waiting out its cooldown
    pub fn rebuild_pending(&self) -> bool {
        self.rebuild.is_some()
    }
}

fn consider(delay: &mut Option<Duration>, candidate: Duration) {
    match delay {
        Some(current) if *current <= candidate => {}
        _ => *delay = Some(candidate),
    }
}

fn until(now: NaiveDateTime, at: NaiveDateTime) -> Duration {
    (at - now).to_std().unwrap_or(Duration::ZERO)
}

fn after(now: NaiveDateTime, delay: Duration) -> NaiveDateTime {
    chrono::Duration::from_std(delay)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(NaiveDateTime::MAX)
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
