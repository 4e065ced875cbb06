// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP surface tests driven through the router with `oneshot`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use common::{CONFIGURATION_ID, TestContext, running, sample_elements};
use streamrun_proxy::server::router;
use streamrun_proxy::upstream::{Destination, MockUpstream};

async fn get(ctx: &TestContext, uri: &str) -> (StatusCode, String) {
    let response = router(ctx.state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(ctx: &TestContext, uri: &str) -> Value {
    let (status, body) = get(ctx, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new(MockUpstream::new());

    let health = get_json(&ctx, "/health").await;

    assert_eq!(health["healthy"], true);
    assert_eq!(health["tracking_instance"], false);
    assert!(health["version"].is_string());
}

#[tokio::test]
async fn test_dashboard_served() {
    let ctx = TestContext::new(MockUpstream::new());

    let (status, body) = get(&ctx, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html"));
}

#[tokio::test]
async fn test_status_without_instance_is_200() {
    let ctx = TestContext::new(MockUpstream::new());

    let (status, body) = get(&ctx, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "No active instance. Go live first.");
    assert!(ctx.calls().await.is_empty());
}

#[tokio::test]
async fn test_golive_then_status() {
    let ctx = TestContext::new(MockUpstream::new().with_instances(vec![running("abc")]));

    let (status, body) = get(&ctx, "/api/golive?destination_id=dest-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Starting stream, please wait ~20 seconds...");

    let (_, body) = get(&ctx, "/api/status").await;
    assert_eq!(body, "RUNNING");

    let record = get_json(&ctx, "/api/instance-data").await;
    assert_eq!(record["id"], "abc");
    assert_eq!(record["state"], "RUNNING");
}

#[tokio::test]
async fn test_golive_reports_adopted_instance() {
    let ctx = TestContext::new(
        MockUpstream::new()
            .rejecting_create(400, "0 instance slots")
            .with_instances(vec![running("xyz")]),
    );

    let (status, body) = get(&ctx, "/api/golive").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Stream already running (xyz is RUNNING)");
}

#[tokio::test]
async fn test_upstream_rejection_rendered_in_body() {
    let ctx = TestContext::new(MockUpstream::new().rejecting_create(403, "forbidden"));

    let (status, body) = get(&ctx, "/api/golive").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Error 403: forbidden");
}

#[tokio::test]
async fn test_stop_flow() {
    let ctx = TestContext::tracking(MockUpstream::new().with_instances(vec![running("abc")]), "abc")
        .await;

    let (_, body) = get(&ctx, "/api/stop").await;
    assert_eq!(body, "Stream stopped (abc)");

    let (status, body) = get(&ctx, "/api/stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "No active instance");
}

#[tokio::test]
async fn test_outputs_default_and_invalid() {
    let ctx = TestContext::tracking(MockUpstream::new(), "abc").await;

    let (_, body) = get(&ctx, "/api/outputs").await;
    assert_eq!(body, "Outputs LIVE");

    let (status, body) = get(&ctx, "/api/outputs?state=sideways").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("use LIVE or OFFLINE"));

    assert_eq!(
        ctx.calls().await,
        vec![format!("PUT configurations/{}/instances LIVE", CONFIGURATION_ID)]
    );
}

#[tokio::test]
async fn test_switch_ingest_requires_parameter() {
    let ctx = TestContext::tracking(MockUpstream::new(), "abc").await;

    let (status, body) = get(&ctx, "/api/switch-ingest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Missing ingest_id");
}

#[tokio::test]
async fn test_refresh_then_switch_ingest() {
    let ctx = TestContext::tracking(MockUpstream::new().with_elements(sample_elements()), "abc")
        .await;

    let (_, body) = get(&ctx, "/api/refresh-ingests").await;
    assert_eq!(
        body,
        "Ingests refreshed: PC=PC Ingest, Mobile=Mobile Cam, BRB Screen=none, switch=switch-1"
    );

    let (_, body) = get(&ctx, "/api/switch-ingest?ingest_id=elem-mobile").await;
    assert_eq!(body, "Ingest switched to elem-mobile");

    let patched = ctx.upstream.patched_overrides().await;
    assert_eq!(patched[0].1["switch-1"]["input"], "elem-mobile");
}

#[tokio::test]
async fn test_categorized_json() {
    let ctx = TestContext::new(MockUpstream::new().with_elements(sample_elements()));
    ctx.state.catalog.refresh().await.unwrap();

    let categorized = get_json(&ctx, "/api/ingests-categorized").await;

    assert_eq!(categorized["PC"]["id"], "elem-pc");
    assert_eq!(categorized["PC"]["name"], "PC Ingest");
    assert_eq!(categorized["Mobile"]["type"], "input");
    assert!(categorized["BRB Screen"].is_null());
    assert_eq!(categorized["switch"], "switch-1");
}

#[tokio::test]
async fn test_set_instance_and_current() {
    let ctx = TestContext::new(MockUpstream::new());

    let (_, body) = get(&ctx, "/api/current").await;
    assert_eq!(body, "No active instance stored");

    let (_, body) = get(&ctx, "/api/set-instance").await;
    assert_eq!(body, "Missing instance_id");

    let (_, body) = get(&ctx, "/api/set-instance?instance_id=manual-1").await;
    assert_eq!(body, "Set current instance to manual-1");

    let (_, body) = get(&ctx, "/api/current").await;
    assert!(body.starts_with("Current instance: manual-1 (started: "));
    assert!(ctx.calls().await.is_empty());
}

#[tokio::test]
async fn test_destinations_listing() {
    let ctx = TestContext::new(MockUpstream::new().with_destinations(vec![
        Destination {
            id: "d1".to_string(),
            name: "Twitch".to_string(),
        },
        Destination {
            id: "d2".to_string(),
            name: "YouTube".to_string(),
        },
    ]));

    let (_, body) = get(&ctx, "/api/destinations").await;

    assert_eq!(body, "Twitch: d1 | YouTube: d2");
}

#[tokio::test]
async fn test_unreachable_upstream_still_200() {
    let ctx = TestContext::tracking(MockUpstream::new(), "abc").await;
    ctx.upstream.set_unreachable(true);

    let (status, body) = get(&ctx, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Error: streamrun unreachable"));
}
