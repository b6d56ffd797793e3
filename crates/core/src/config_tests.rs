// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_jobs_and_schedules() {
    let config = Config::parse(
        r#"
        cooldown = "2s"

        [schedule.office]
        type = "interval"
        allowed = [{ dow = "1-6", start = "09:00", end = "17:00" }]

        [schedule.quarterly]
        type = "recurring"
        minute = "0,15,30,45"
        second = "0"

        [[job]]
        id = "web"
        command = "node"
        args = ["server.js"]
        schedule = "office"
        restart = 5

        [[job]]
        id = "sync"
        command = "sync-files"
        schedule = { type = "recurring", minute = "30" }
        "#,
    )
    .unwrap();

    assert_eq!(config.jobs.len(), 2);
    assert_eq!(config.schedules.len(), 2);
    assert_eq!(config.cooldown, Duration::from_secs(2));

    let web = &config.jobs[0];
    assert_eq!(web.id, "web");
    assert_eq!(web.command, "node");
    assert_eq!(web.args, vec!["server.js"]);
    assert_eq!(web.restart, RestartPolicy(Some(5)));
    assert!(matches!(web.schedule, ScheduleRef::Named(ref name) if name == "office"));

    let sync = &config.jobs[1];
    assert_eq!(sync.restart, RestartPolicy(None));
    assert!(sync.args.is_empty());
    assert!(matches!(sync.schedule, ScheduleRef::Inline(_)));
}

#[test]
fn empty_config_uses_defaults() {
    let config = Config::parse("").unwrap();

    assert!(config.jobs.is_empty());
    assert!(config.schedules.is_empty());
    assert_eq!(config.cooldown, Duration::from_secs(1));
}

#[test]
fn cooldown_accepts_humantime_strings() {
    let config = Config::parse("cooldown = \"250ms\"").unwrap();
    assert_eq!(config.cooldown, Duration::from_millis(250));
}

fn job_with_restart(restart: &str) -> JobSpec {
    let config = Config::parse(&format!(
        r#"
        [[job]]
        id = "a"
        command = "run-a"
        schedule = "s"
        restart = {restart}
        "#
    ))
    .unwrap();
    config.jobs.into_iter().next().unwrap()
}

#[test]
fn restart_false_disables_restarts() {
    assert_eq!(job_with_restart("false").restart, RestartPolicy(None));
}

#[test]
fn restart_true_coerces_to_zero() {
    assert_eq!(job_with_restart("true").restart, RestartPolicy(Some(0)));
}

#[test]
fn restart_negative_coerces_to_zero() {
    assert_eq!(job_with_restart("-3").restart, RestartPolicy(Some(0)));
}

#[test]
fn restart_string_coerces_to_zero() {
    assert_eq!(job_with_restart("\"soon\"").restart, RestartPolicy(Some(0)));
}

#[test]
fn restart_fraction_truncates() {
    assert_eq!(job_with_restart("2.8").restart, RestartPolicy(Some(2)));
}

#[test]
fn restart_absent_means_no_restart() {
    let config = Config::parse(
        r#"
        [[job]]
        id = "a"
        command = "run-a"
        schedule = "s"
        "#,
    )
    .unwrap();
    assert_eq!(config.jobs[0].restart, RestartPolicy(None));
    assert_eq!(config.jobs[0].restart.delay(), None);
}

#[test]
fn schedule_spec_keeps_raw_fields() {
    let config = Config::parse(
        r#"
        [schedule.x]
        type = "recurring"
        minute = "30"
        "#,
    )
    .unwrap();

    let spec = &config.schedules["x"];
    assert_eq!(spec.kind.as_deref(), Some("recurring"));
    assert!(spec.fields.contains_key("minute"));
}

#[test]
fn schedule_without_type_still_parses() {
    // The missing tag is caught when the schedule is built, scoped to the
    // jobs that reference it.
    let config = Config::parse(
        r#"
        [schedule.x]
        minute = "30"
        "#,
    )
    .unwrap();

    assert!(config.schedules["x"].kind.is_none());
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tend.toml");
    std::fs::write(&path, "cooldown = \"3s\"\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.cooldown, Duration::from_secs(3));

    let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = Config::parse("this is not toml [").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
