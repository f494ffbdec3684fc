//! Engine integration tests: cycle counters, phase ordering, failure
//! isolation, leashed notifications, and the opt-state transaction.

mod test_utils;

use janitor_common::{OptEventType, Resource, ResourceKind};
use janitor_core::unit::CleanupUnit;
use test_utils::{harness, log_entries, new_call_log, MockUnit};

fn units(builders: Vec<MockUnit>) -> Vec<Box<dyn CleanupUnit>> {
    builders
        .into_iter()
        .map(|u| Box::new(u) as Box<dyn CleanupUnit>)
        .collect()
}

#[tokio::test]
async fn disabled_cycle_is_inert() {
    let log = new_call_log();
    let unit_list = units(vec![MockUnit::new(ResourceKind::Instance, log.clone())]);
    let mut h = harness(unit_list, &[("janitor.enabled", "false")], log.clone()).await;

    h.engine.run_cycle().await.unwrap();
    h.engine.run_cycle().await.unwrap();

    let snap = h.engine.monitor().snapshot();
    assert_eq!(snap.runs, 0);
    assert_eq!(snap.errors, 0);
    assert_eq!(snap.running, 0);
    assert!(log_entries(&log).is_empty(), "no unit method may be invoked");
    assert_eq!(h.notifier.dispatches(), 0);
    assert!(h.notifier.sent_emails().is_empty());
}

#[tokio::test]
async fn enabled_cycle_increments_runs_and_resets_running() {
    let log = new_call_log();
    let unit_list = units(vec![MockUnit::new(ResourceKind::Instance, log.clone())]);
    let mut h = harness(unit_list, &[], log.clone()).await;

    h.engine.run_cycle().await.unwrap();
    let snap = h.engine.monitor().snapshot();
    assert_eq!(snap.runs, 1);
    assert_eq!(snap.running, 0, "running gauge must return to 0");

    h.engine.run_cycle().await.unwrap();
    assert_eq!(h.engine.monitor().runs(), 2);
}

#[tokio::test]
async fn run_counter_increments_even_when_every_unit_fails() {
    let log = new_call_log();
    let unit_list = units(vec![
        MockUnit::new(ResourceKind::Instance, log.clone())
            .failing_mark()
            .failing_clean(),
        MockUnit::new(ResourceKind::EbsVolume, log.clone())
            .failing_mark()
            .failing_clean(),
    ]);
    let mut h = harness(unit_list, &[], log.clone()).await;

    h.engine.run_cycle().await.unwrap();

    let snap = h.engine.monitor().snapshot();
    assert_eq!(snap.runs, 1);
    assert_eq!(snap.errors, 4);
    assert_eq!(snap.running, 0);
}

#[tokio::test]
async fn one_mark_failure_and_one_clean_failure_count_two_errors() {
    let log = new_call_log();
    // Unit k fails on mark, unit j != k fails on clean
    let unit_list = units(vec![
        MockUnit::new(ResourceKind::Instance, log.clone()).failing_mark(),
        MockUnit::new(ResourceKind::EbsVolume, log.clone()).failing_clean(),
        MockUnit::new(ResourceKind::Image, log.clone()),
    ]);
    let mut h = harness(unit_list, &[], log.clone()).await;

    h.engine.run_cycle().await.unwrap();

    assert_eq!(h.engine.monitor().errors(), 2);

    // Every unit still has cleanup_resources invoked exactly once
    let entries = log_entries(&log);
    for kind in ["instance", "ebs-volume", "image"] {
        let cleans = entries.iter().filter(|e| *e == &format!("clean:{kind}")).count();
        assert_eq!(cleans, 1, "clean must run exactly once for {kind}");
        let marks = entries.iter().filter(|e| *e == &format!("mark:{kind}")).count();
        assert_eq!(marks, 1, "mark must run exactly once for {kind}");
    }
}

#[tokio::test]
async fn phases_run_in_strict_order_across_all_units() {
    let log = new_call_log();
    let unit_list = units(vec![
        MockUnit::new(ResourceKind::Instance, log.clone()).failing_mark(),
        MockUnit::new(ResourceKind::EbsVolume, log.clone()),
    ]);
    let mut h = harness(unit_list, &[("janitor.leashed", "false")], log.clone()).await;

    h.engine.run_cycle().await.unwrap();

    let entries = log_entries(&log);
    assert_eq!(
        entries,
        vec![
            "prepare:instance",
            "prepare:ebs-volume",
            "mark:instance",
            "mark:ebs-volume",
            "notify",
            "clean:instance",
            "clean:ebs-volume",
        ],
        "mark-all must finish before notify, notify before clean-all, units in list order"
    );
}

#[tokio::test]
async fn leashed_cycle_never_dispatches_notifications() {
    let log = new_call_log();
    let unit_list = units(vec![MockUnit::new(ResourceKind::Instance, log.clone())]);
    // Leashed is the default
    let mut h = harness(unit_list, &[], log.clone()).await;

    h.engine.run_cycle().await.unwrap();
    h.engine.run_cycle().await.unwrap();

    assert_eq!(h.notifier.dispatches(), 0);
    assert!(!log_entries(&log).contains(&"notify".to_string()));
}

#[tokio::test]
async fn unleashed_cycle_dispatches_exactly_once() {
    let log = new_call_log();
    let unit_list = units(vec![MockUnit::new(ResourceKind::Instance, log.clone())]);
    let mut h = harness(unit_list, &[("janitor.leashed", "false")], log.clone()).await;

    h.engine.run_cycle().await.unwrap();
    assert_eq!(h.notifier.dispatches(), 1);

    h.engine.run_cycle().await.unwrap();
    assert_eq!(h.notifier.dispatches(), 2);
}

#[tokio::test]
async fn summary_email_sent_to_configured_target() {
    let log = new_call_log();
    let marked = vec![Resource::new("i-1", "us-east-1", ResourceKind::Instance)];
    let cleaned = vec![Resource::new("i-2", "us-east-1", ResourceKind::Instance)];
    let unit_list = units(vec![MockUnit::new(ResourceKind::Instance, log.clone())
        .with_marked(marked)
        .with_cleaned(cleaned)]);
    let mut h = harness(
        unit_list,
        &[
            ("janitor.summary_email.to", "ops@example.com"),
            ("janitor.account_name", "prod"),
            ("janitor.region", "us-east-1"),
        ],
        log.clone(),
    )
    .await;

    h.engine.run_cycle().await.unwrap();

    let emails = h.notifier.sent_emails();
    assert_eq!(emails.len(), 1);
    let (to, subject, body) = &emails[0];
    assert_eq!(to, "ops@example.com");
    assert_eq!(subject, "Janitor execution summary (prod, us-east-1)");
    assert!(body.contains("i-1"));
    assert!(body.contains("i-2"));

    let summary = h.engine.last_summary().expect("summary retained for the cycle");
    assert!(summary.buckets.iter().any(|b| b.resources.len() == 1));
}

#[tokio::test]
async fn summary_skipped_without_target_or_when_disabled() {
    let log = new_call_log();
    let unit_list = units(vec![MockUnit::new(ResourceKind::Instance, log.clone())]);
    // summary enabled (default) but no target configured
    let mut h = harness(unit_list, &[], log.clone()).await;
    h.engine.run_cycle().await.unwrap();
    assert!(h.notifier.sent_emails().is_empty());

    let log2 = new_call_log();
    let unit_list2 = units(vec![MockUnit::new(ResourceKind::Instance, log2.clone())]);
    let mut h2 = harness(
        unit_list2,
        &[
            ("janitor.summary_email.enabled", "false"),
            ("janitor.summary_email.to", "ops@example.com"),
        ],
        log2.clone(),
    )
    .await;
    h2.engine.run_cycle().await.unwrap();
    assert!(h2.notifier.sent_emails().is_empty());
    assert!(h2.engine.last_summary().is_none());
}

#[tokio::test]
async fn invalid_summary_target_skips_email_without_failing_cycle() {
    let log = new_call_log();
    let unit_list = units(vec![MockUnit::new(ResourceKind::Instance, log.clone())]);
    let mut h = harness(
        unit_list,
        &[("janitor.summary_email.to", "not-an-address")],
        log.clone(),
    )
    .await;

    h.engine.run_cycle().await.unwrap();

    assert!(h.notifier.sent_emails().is_empty());
    assert_eq!(h.engine.monitor().errors(), 0);
    assert_eq!(h.engine.monitor().runs(), 1);
}

#[tokio::test]
async fn opt_in_existing_resource_records_event_and_flips_flag() {
    let log = new_call_log();
    let h = harness(Vec::new(), &[("janitor.region", "us-east-1")], log).await;

    let mut resource = Resource::new("i-123", "us-east-1", ResourceKind::Instance);
    resource.opt_out_of_cleanup = true;
    h.store.add_or_update(&resource).await.unwrap();

    let event = h
        .engine
        .set_resource_opt_state("i-123", Some("us-east-1"), true)
        .await
        .unwrap()
        .expect("resource exists");

    assert_eq!(event.event_type, OptEventType::OptIn);
    assert_eq!(event.event_type.as_str(), "OPT_IN_RESOURCE");

    let loaded = h.store.get_resource("i-123", "us-east-1").await.unwrap().unwrap();
    assert!(!loaded.opt_out_of_cleanup);
    assert_eq!(h.events.count().await.unwrap(), 1);
}

#[tokio::test]
async fn opt_out_uses_home_region_when_region_omitted() {
    let log = new_call_log();
    let h = harness(Vec::new(), &[("janitor.region", "eu-west-1")], log).await;

    let resource = Resource::new("vol-7", "eu-west-1", ResourceKind::EbsVolume);
    h.store.add_or_update(&resource).await.unwrap();

    let event = h
        .engine
        .opt_out_resource("vol-7", None)
        .await
        .unwrap()
        .expect("found via home region");
    assert_eq!(event.event_type, OptEventType::OptOut);
    assert_eq!(event.region, "eu-west-1");

    let loaded = h.store.get_resource("vol-7", "eu-west-1").await.unwrap().unwrap();
    assert!(loaded.opt_out_of_cleanup);
}

#[tokio::test]
async fn opt_on_missing_resource_is_absent_with_no_writes() {
    let log = new_call_log();
    let h = harness(Vec::new(), &[], log).await;

    let result = h
        .engine
        .set_resource_opt_state("i-missing", None, false)
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(h.events.count().await.unwrap(), 0);
    assert!(h.store.list_resources().await.unwrap().is_empty());
}

#[tokio::test]
async fn repeated_toggles_produce_distinct_event_ids() {
    let log = new_call_log();
    let h = harness(Vec::new(), &[("janitor.region", "us-east-1")], log).await;

    let resource = Resource::new("i-9", "us-east-1", ResourceKind::Instance);
    h.store.add_or_update(&resource).await.unwrap();

    let first = h.engine.opt_out_resource("i-9", None).await.unwrap().unwrap();
    let second = h.engine.opt_in_resource("i-9", None).await.unwrap().unwrap();

    assert_ne!(first.event_id, second.event_id);
    assert_eq!(h.events.count().await.unwrap(), 2);
}
