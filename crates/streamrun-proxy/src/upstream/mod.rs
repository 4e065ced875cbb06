// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Upstream API seam.
//!
//! Tracker and catalog talk to the orchestration API only through
//! [`StreamrunApi`], so tests can swap in [`MockUpstream`].

mod mock;
mod streamrun;
mod traits;

pub use mock::MockUpstream;
pub use traits::*;
