// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for streamrun-proxy tests.
//!
//! Provides TestContext wiring handler state to a MockUpstream.

#![allow(dead_code)]

use std::sync::Arc;

use streamrun_proxy::handlers::ProxyHandlerState;
use streamrun_proxy::upstream::{Element, InstanceSummary, MockUpstream};

pub const CONFIGURATION_ID: &str = "cfg-test";

/// Handler state backed by a mock upstream the test can inspect.
pub struct TestContext {
    pub upstream: Arc<MockUpstream>,
    pub state: Arc<ProxyHandlerState>,
}

impl TestContext {
    pub fn new(upstream: MockUpstream) -> Self {
        let upstream = Arc::new(upstream);
        let state = Arc::new(ProxyHandlerState::new(upstream.clone(), CONFIGURATION_ID));
        Self { upstream, state }
    }

    /// Context with an instance already tracked.
    pub async fn tracking(upstream: MockUpstream, instance_id: &str) -> Self {
        let ctx = Self::new(upstream);
        ctx.state.tracker.manual_set(instance_id).await;
        ctx
    }

    pub async fn calls(&self) -> Vec<String> {
        self.upstream.calls().await
    }
}

/// The three-element configuration used across catalog tests.
pub fn sample_elements() -> Vec<Element> {
    vec![
        Element::new("elem-pc", "PC Ingest", "input"),
        Element::new("elem-mobile", "Mobile Cam", "input"),
        Element::new("switch-1", "switch-1", "switch"),
    ]
}

pub fn running(id: &str) -> InstanceSummary {
    InstanceSummary::new(id, "RUNNING")
}
