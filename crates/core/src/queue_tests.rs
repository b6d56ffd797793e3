// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;

fn at(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(10, minute, 0)
        .unwrap()
}

#[test]
fn events_pop_in_timestamp_order() {
    let mut queue = EventQueue::new();
    queue.push(at(30), JobId::new("a"), TaskAction::Start);
    queue.push(at(10), JobId::new("b"), TaskAction::Start);
    queue.push(at(20), JobId::new("c"), TaskAction::Stop);

    let order: Vec<String> = std::iter::from_fn(|| queue.pop()).map(|e| e.job.0).collect();
    assert_eq!(order, vec!["b", "c", "a"]);
}

#[test]
fn ties_resolve_by_insertion_order() {
    let mut queue = EventQueue::new();
    queue.push(at(10), JobId::new("first"), TaskAction::Start);
    queue.push(at(10), JobId::new("second"), TaskAction::Stop);
    queue.push(at(10), JobId::new("third"), TaskAction::Start);

    let order: Vec<String> = std::iter::from_fn(|| queue.pop()).map(|e| e.job.0).collect();
    assert_eq!(order, vec!["first", "second", "third"]);
}

#[test]
fn next_at_peeks_the_earliest_timestamp() {
    let mut queue = EventQueue::new();
    assert!(queue.next_at().is_none());

    queue.push(at(30), JobId::new("a"), TaskAction::Start);
    queue.push(at(10), JobId::new("b"), TaskAction::Stop);

    assert_eq!(queue.next_at(), Some(at(10)));
    assert_eq!(queue.len(), 2);
}

#[test]
fn popped_event_carries_its_action() {
    let mut queue = EventQueue::new();
    queue.push(at(10), JobId::new("a"), TaskAction::Stop);

    let event = queue.pop().unwrap();
    assert_eq!(event.job, JobId::new("a"));
    assert_eq!(event.action, TaskAction::Stop);
    assert_eq!(event.at, at(10));
}

#[test]
fn clear_empties_the_queue() {
    let mut queue = EventQueue::new();
    queue.push(at(10), JobId::new("a"), TaskAction::Start);

    queue.clear();

    assert!(queue.is_empty());
    assert!(queue.pop().is_none());
}
