// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

/// Consecutive failed passes at which the reconciler reports unhealthy.
pub const UNHEALTHY_AFTER_FAILURES: u32 = 3;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
	Healthy,
	Degraded,
	Unhealthy,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LastPassInfo {
	pub pass_id: String,
	pub started_at: DateTime<Utc>,
	pub duration_ms: i64,
	pub succeeded: bool,
	pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReconcilerHealth {
	pub status: HealthState,
	pub last_pass: Option<LastPassInfo>,
	pub consecutive_failures: u32,
}

pub fn determine_health_state(consecutive_failures: u32) -> HealthState {
	if consecutive_failures >= UNHEALTHY_AFTER_FAILURES {
		HealthState::Unhealthy
	} else if consecutive_failures >= 1 {
		HealthState::Degraded
	} else {
		HealthState::Healthy
	}
}

#[derive(Default)]
struct Inner {
	last_pass: Option<LastPassInfo>,
	consecutive_failures: u32,
}

/// Tracks pass outcomes for health reporting.
#[derive(Default)]
pub struct HealthTracker {
	inner: Mutex<Inner>,
}

impl HealthTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn record(&self, pass: LastPassInfo) {
		let mut inner = self.inner.lock().await;
		if pass.succeeded {
			inner.consecutive_failures = 0;
		} else {
			inner.consecutive_failures += 1;
		}
		inner.last_pass = Some(pass);
	}

	pub async fn status(&self) -> ReconcilerHealth {
		let inner = self.inner.lock().await;
		ReconcilerHealth {
			status: determine_health_state(inner.consecutive_failures),
			last_pass: inner.last_pass.clone(),
			consecutive_failures: inner.consecutive_failures,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pass(succeeded: bool) -> LastPassInfo {
		LastPassInfo {
			pass_id: "p".into(),
			started_at: Utc::now(),
			duration_ms: 1,
			succeeded,
			error: (!succeeded).then(|| "boom".to_string()),
		}
	}

	#[test]
	fn thresholds() {
		assert_eq!(determine_health_state(0), HealthState::Healthy);
		assert_eq!(determine_health_state(1), HealthState::Degraded);
		assert_eq!(determine_health_state(2), HealthState::Degraded);
		assert_eq!(determine_health_state(3), HealthState::Unhealthy);
	}

	#[tokio::test]
	async fn success_resets_failures() {
		let tracker = HealthTracker::new();
		assert_eq!(tracker.status().await.status, HealthState::Healthy);

		for _ in 0..3 {
			tracker.record(pass(false)).await;
		}
		let status = tracker.status().await;
		assert_eq!(status.status, HealthState::Unhealthy);
		assert_eq!(status.last_pass.unwrap().error.as_deref(), Some("boom"));

		tracker.record(pass(true)).await;
		assert_eq!(tracker.status().await.consecutive_failures, 0);
	}
}
