// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The cluster-scoped state shared by every tenant pass.
//!
//! A snapshot is built completely, then published as an `Arc`. Tenant passes
//! hold their own `Arc` for the whole pass, so a later publish never changes
//! what an in-flight pass sees.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use relsync_core::{ResolvedPermissions, Tuple};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct ClusterSnapshot {
	/// Effective permissions of every global role.
	pub resolved: ResolvedPermissions,
	/// Grant tuples of every global role; seeds each tenant's desired set.
	pub tuples: Vec<Tuple>,
	pub built_at: DateTime<Utc>,
}

impl ClusterSnapshot {
	pub fn new(resolved: ResolvedPermissions, tuples: Vec<Tuple>) -> Self {
		Self {
			resolved,
			tuples,
			built_at: Utc::now(),
		}
	}

	pub fn empty() -> Self {
		Self::new(ResolvedPermissions::new(), Vec::new())
	}
}

/// Holds the most recently published snapshot.
#[derive(Debug, Default)]
pub struct SnapshotCell {
	current: RwLock<Option<Arc<ClusterSnapshot>>>,
}

impl SnapshotCell {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the published snapshot and returns the new one.
	pub async fn publish(&self, snapshot: ClusterSnapshot) -> Arc<ClusterSnapshot> {
		let snapshot = Arc::new(snapshot);
		*self.current.write().await = Some(Arc::clone(&snapshot));
		snapshot
	}

	pub async fn current(&self) -> Option<Arc<ClusterSnapshot>> {
		self.current.read().await.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn readers_keep_their_snapshot_across_publish() {
		let cell = SnapshotCell::new();
		assert!(cell.current().await.is_none());

		let first = cell
			.publish(ClusterSnapshot::new(
				ResolvedPermissions::new(),
				vec![Tuple::new("role:a#assignee", "get", "group_resource:dashboards")],
			))
			.await;
		let held = cell.current().await.unwrap();

		cell.publish(ClusterSnapshot::empty()).await;

		assert_eq!(held.tuples.len(), 1);
		assert!(Arc::ptr_eq(&first, &held));
		assert!(cell.current().await.unwrap().tuples.is_empty());
	}
}
