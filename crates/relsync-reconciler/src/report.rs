// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of one successful tenant pass.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TenantReport {
	pub tenant: String,
	pub store_id: String,
	pub desired: usize,
	pub actual: usize,
	pub added: usize,
	pub deleted: usize,
	pub batches: usize,
	pub dry_run: bool,
	pub duration_ms: i64,
}

impl TenantReport {
	pub fn in_sync(&self) -> bool {
		self.added == 0 && self.deleted == 0
	}
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TenantFailure {
	pub tenant: String,
	pub error: String,
	/// Whether the next pass may succeed without a policy change.
	pub transient: bool,
}

/// Outcome of a top-level pass over every tenant.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
	pub pass_id: Uuid,
	pub started_at: DateTime<Utc>,
	pub finished_at: DateTime<Utc>,
	/// Successful tenants, sorted by tenant.
	pub tenants: Vec<TenantReport>,
	/// Failed tenants, sorted by tenant.
	pub failures: Vec<TenantFailure>,
}

impl PassReport {
	pub fn is_success(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn duration_ms(&self) -> i64 {
		(self.finished_at - self.started_at).num_milliseconds()
	}

	pub fn added(&self) -> usize {
		self.tenants.iter().map(|t| t.added).sum()
	}

	pub fn deleted(&self) -> usize {
		self.tenants.iter().map(|t| t.deleted).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tenant(name: &str, added: usize) -> TenantReport {
		TenantReport {
			tenant: name.into(),
			store_id: "s".into(),
			desired: 10,
			actual: 10 - added,
			added,
			deleted: 0,
			batches: usize::from(added > 0),
			dry_run: false,
			duration_ms: 3,
		}
	}

	#[test]
	fn totals_and_success() {
		let now = Utc::now();
		let report = PassReport {
			pass_id: Uuid::new_v4(),
			started_at: now,
			finished_at: now,
			tenants: vec![tenant("a", 2), tenant("b", 0)],
			failures: Vec::new(),
		};
		assert!(report.is_success());
		assert_eq!(report.added(), 2);
		assert!(report.tenants[1].in_sync());
	}

	#[test]
	fn serializes_failures() {
		let failure = TenantFailure {
			tenant: "org-2".into(),
			error: "1 of 3 batches failed for tenant org-2".into(),
			transient: true,
		};
		let json = serde_json::to_value(&failure).unwrap();
		assert_eq!(json["tenant"], "org-2");
		assert_eq!(json["transient"], true);
	}
}
