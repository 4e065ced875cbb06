// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tests for the instance tracker against a mock upstream.

mod common;

use common::{CONFIGURATION_ID, TestContext, running, sample_elements};
use streamrun_proxy::Error;
use streamrun_proxy::instance_tracker::{STATE_STOPPED, STATE_UNKNOWN, StartOutcome};
use streamrun_proxy::upstream::{InstanceSummary, MockUpstream};

#[tokio::test]
async fn test_untracked_stop_and_status_skip_upstream() {
    let ctx = TestContext::new(MockUpstream::new());

    assert!(matches!(
        ctx.state.tracker.stop().await,
        Err(Error::NoActiveInstance)
    ));
    assert!(matches!(
        ctx.state.tracker.refresh_status().await,
        Err(Error::NoActiveInstance)
    ));
    assert!(ctx.calls().await.is_empty());
}

#[tokio::test]
async fn test_start_adopts_latest_instance() {
    let ctx = TestContext::new(MockUpstream::new().with_instances(vec![running("abc")]));

    let outcome = ctx.state.tracker.start(None).await.unwrap();

    assert_eq!(
        outcome,
        StartOutcome::Started {
            instance_id: "abc".to_string()
        }
    );
    let record = ctx.state.tracker.snapshot().await;
    assert_eq!(record.id.as_deref(), Some("abc"));
    assert_eq!(record.state, "RUNNING");
    assert!(record.started_at.is_some());
    assert_eq!(
        ctx.calls().await,
        vec![
            format!("POST configurations/{}/instances", CONFIGURATION_ID),
            format!("GET configurations/{}/instances", CONFIGURATION_ID),
        ]
    );
}

#[tokio::test]
async fn test_start_sets_running_even_if_listed_as_queued() {
    let ctx = TestContext::new(
        MockUpstream::new().spawning_on_create(InstanceSummary::new("fresh", "QUEUED")),
    );

    ctx.state.tracker.start(Some("dest-1")).await.unwrap();

    let record = ctx.state.tracker.snapshot().await;
    assert_eq!(record.id.as_deref(), Some("fresh"));
    assert_eq!(record.state, "RUNNING");
}

#[tokio::test]
async fn test_start_with_nothing_listed_is_requested() {
    let ctx = TestContext::new(MockUpstream::new());

    let outcome = ctx.state.tracker.start(None).await.unwrap();

    assert_eq!(outcome, StartOutcome::Requested);
    assert!(ctx.state.tracker.snapshot().await.id.is_none());
}

#[tokio::test]
async fn test_capacity_exhaustion_adopts_active_instance() {
    let ctx = TestContext::new(
        MockUpstream::new()
            .rejecting_create(400, r#"{"error":"You have 0 instance slots available"}"#)
            .with_instances(vec![
                InstanceSummary::new("old", "STOPPED"),
                InstanceSummary::new("xyz", "QUEUED").with_created_at("2026-10-19T08:00:00Z"),
            ]),
    );

    let outcome = ctx.state.tracker.start(None).await.unwrap();

    assert_eq!(
        outcome,
        StartOutcome::AlreadyRunning {
            instance_id: "xyz".to_string(),
            state: "QUEUED".to_string()
        }
    );
    let record = ctx.state.tracker.snapshot().await;
    assert_eq!(record.id.as_deref(), Some("xyz"));
    assert_eq!(record.state, "QUEUED");
    assert_eq!(record.started_at.as_deref(), Some("2026-10-19T08:00:00Z"));
}

#[tokio::test]
async fn test_capacity_exhaustion_without_active_instance_is_error() {
    let ctx = TestContext::new(
        MockUpstream::new()
            .rejecting_create(400, "0 instance slots")
            .with_instances(vec![InstanceSummary::new("old", "STOPPED")]),
    );

    let err = ctx.state.tracker.start(None).await.unwrap_err();

    assert!(matches!(err, Error::CapacityExhausted(_)));
    assert!(ctx.state.tracker.snapshot().await.id.is_none());
}

#[tokio::test]
async fn test_other_rejection_surfaces_status_and_leaves_state() {
    let ctx = TestContext::tracking(
        MockUpstream::new().rejecting_create(422, "configuration invalid"),
        "keep-me",
    )
    .await;

    let err = ctx.state.tracker.start(None).await.unwrap_err();

    assert_eq!(err.to_string(), "Error 422: configuration invalid");
    let record = ctx.state.tracker.snapshot().await;
    assert_eq!(record.id.as_deref(), Some("keep-me"));
}

#[tokio::test]
async fn test_stop_clears_identifier_and_marks_stopped() {
    let ctx = TestContext::tracking(MockUpstream::new().with_instances(vec![running("abc")]), "abc")
        .await;

    let stopped = ctx.state.tracker.stop().await.unwrap();
    assert_eq!(stopped, "abc");

    let record = ctx.state.tracker.snapshot().await;
    assert!(record.id.is_none());
    assert_eq!(record.state, STATE_STOPPED);

    // Nothing tracked any more, so no further upstream call
    assert!(matches!(
        ctx.state.tracker.refresh_status().await,
        Err(Error::NoActiveInstance)
    ));
    assert_eq!(ctx.calls().await, vec!["DELETE instances/abc"]);
}

#[tokio::test]
async fn test_failed_stop_keeps_tracking() {
    let ctx = TestContext::tracking(MockUpstream::new().rejecting(500, "boom"), "abc").await;

    let err = ctx.state.tracker.stop().await.unwrap_err();

    assert!(matches!(err, Error::UpstreamRejected { status: 500, .. }));
    assert_eq!(
        ctx.state.tracker.snapshot().await.id.as_deref(),
        Some("abc")
    );
}

#[tokio::test]
async fn test_refresh_status_passes_label_through() {
    let ctx = TestContext::tracking(
        MockUpstream::new().with_instances(vec![InstanceSummary::new("abc", "PROVISIONING")]),
        "abc",
    )
    .await;
    assert_eq!(ctx.state.tracker.snapshot().await.state, STATE_UNKNOWN);

    let label = ctx.state.tracker.refresh_status().await.unwrap();

    assert_eq!(label, "PROVISIONING");
    assert_eq!(ctx.state.tracker.snapshot().await.state, "PROVISIONING");
}

#[tokio::test]
async fn test_tracker_survives_unreachable_upstream() {
    let ctx = TestContext::tracking(MockUpstream::new().with_instances(vec![running("abc")]), "abc")
        .await;
    ctx.upstream.set_unreachable(true);

    let err = ctx.state.tracker.refresh_status().await.unwrap_err();
    assert!(matches!(err, Error::UpstreamUnreachable(_)));

    ctx.upstream.set_unreachable(false);
    assert_eq!(ctx.state.tracker.refresh_status().await.unwrap(), "RUNNING");
}

#[tokio::test]
async fn test_invalid_outputs_rejected_before_network() {
    let ctx = TestContext::tracking(MockUpstream::new(), "abc").await;

    let err = ctx.state.tracker.set_outputs("INVALID").await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(ctx.calls().await.is_empty());
}

#[tokio::test]
async fn test_outputs_require_tracked_instance() {
    let ctx = TestContext::new(MockUpstream::new());

    let err = ctx.state.tracker.set_outputs("LIVE").await.unwrap_err();

    assert!(matches!(err, Error::NoActiveInstance));
    assert!(ctx.calls().await.is_empty());
}

#[tokio::test]
async fn test_outputs_update_configuration() {
    let ctx = TestContext::tracking(MockUpstream::new(), "abc").await;

    ctx.state.tracker.set_outputs("offline").await.unwrap();

    assert_eq!(
        ctx.calls().await,
        vec![format!("PUT configurations/{}/instances OFFLINE", CONFIGURATION_ID)]
    );
}

#[tokio::test]
async fn test_manual_set_overwrites_without_upstream() {
    let ctx = TestContext::tracking(MockUpstream::new(), "first").await;

    ctx.state.tracker.manual_set("second").await;

    let (id, started_at) = ctx.state.tracker.current().await.unwrap();
    assert_eq!(id, "second");
    assert!(started_at.is_some());
    assert!(ctx.calls().await.is_empty());
}

#[tokio::test]
async fn test_switch_input_requires_instance_then_switch() {
    let ctx = TestContext::new(MockUpstream::new());
    let err = ctx
        .state
        .tracker
        .switch_input(&ctx.state.catalog, "elem-pc")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoActiveInstance));

    ctx.state.tracker.manual_set("abc").await;
    let err = ctx
        .state
        .tracker
        .switch_input(&ctx.state.catalog, "elem-pc")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SwitchElementNotFound));
    assert!(ctx.calls().await.is_empty());
}

#[tokio::test]
async fn test_switch_input_forwards_any_element() {
    let ctx = TestContext::tracking(MockUpstream::new().with_elements(sample_elements()), "abc")
        .await;
    ctx.state.catalog.refresh().await.unwrap();

    ctx.state
        .tracker
        .switch_input(&ctx.state.catalog, "not-in-catalog")
        .await
        .unwrap();

    let patched = ctx.upstream.patched_overrides().await;
    assert_eq!(patched.len(), 1);
    assert_eq!(patched[0].0, "abc");
    assert_eq!(patched[0].1["switch-1"]["input"], "not-in-catalog");
}
