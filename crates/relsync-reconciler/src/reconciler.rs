// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use relsync_core::{PolicyLister, TupleStore};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::bounded::bounded;
use crate::diff::diff;
use crate::error::Result;
use crate::fetcher::TupleFetcher;
use crate::report::{PassReport, TenantFailure, TenantReport};
use crate::settings::ReconcilerSettings;
use crate::snapshot::{ClusterSnapshot, SnapshotCell};
use crate::writer::BatchWriter;

/// Keeps each tenant's stored tuples in sync with its policy resources.
pub struct Reconciler {
	lister: Arc<dyn PolicyLister>,
	store: Arc<dyn TupleStore>,
	settings: ReconcilerSettings,
	snapshot: SnapshotCell,
}

impl Reconciler {
	pub fn new(
		lister: Arc<dyn PolicyLister>,
		store: Arc<dyn TupleStore>,
		settings: ReconcilerSettings,
	) -> Self {
		Self {
			lister,
			store,
			settings,
			snapshot: SnapshotCell::new(),
		}
	}

	pub fn settings(&self) -> &ReconcilerSettings {
		&self.settings
	}

	fn fetcher(&self) -> TupleFetcher<'_> {
		TupleFetcher::new(self.lister.as_ref(), self.store.as_ref(), &self.settings)
	}

	/// The most recently published cluster snapshot, if any.
	pub async fn current_snapshot(&self) -> Option<Arc<ClusterSnapshot>> {
		self.snapshot.current().await
	}

	/// Rebuilds the cluster snapshot and publishes it once complete.
	///
	/// On failure the previously published snapshot stays in place.
	pub async fn refresh_snapshot(
		&self,
		cancel: &CancellationToken,
	) -> Result<Arc<ClusterSnapshot>> {
		let snapshot = self.fetcher().build_snapshot(cancel).await?;
		Ok(self.snapshot.publish(snapshot).await)
	}

	/// On-demand pass for a single tenant, with a freshly built snapshot.
	#[instrument(skip(self, cancel))]
	pub async fn reconcile(&self, tenant: &str, cancel: &CancellationToken) -> Result<TenantReport> {
		let snapshot = self.refresh_snapshot(cancel).await?;
		self.reconcile_tenant(tenant, snapshot, cancel).await
	}

	/// Fetch, diff and write for one tenant against the given snapshot.
	#[instrument(skip(self, snapshot, cancel))]
	pub async fn reconcile_tenant(
		&self,
		tenant: &str,
		snapshot: Arc<ClusterSnapshot>,
		cancel: &CancellationToken,
	) -> Result<TenantReport> {
		let started = Instant::now();
		let fetcher = self.fetcher();

		let store_id = bounded(
			"store lookup",
			self.settings.page_timeout,
			cancel,
			self.store.get_or_create_store(tenant),
		)
		.await?;

		let desired = fetcher.fetch_desired(tenant, &snapshot, cancel).await?;
		let actual = fetcher.read_actual(&store_id, cancel).await?;
		let changes = diff(&desired, &actual);

		let batches = if self.settings.dry_run {
			info!(
				store_id = %store_id,
				to_add = changes.to_add.len(),
				to_delete = changes.to_delete.len(),
				"dry run, skipping writes"
			);
			0
		} else {
			BatchWriter::new(
				self.store.as_ref(),
				self.settings.write_batch_size,
				self.settings.batch_timeout,
			)
			.apply(tenant, &store_id, &changes, cancel)
			.await?
			.batches
		};

		let report = TenantReport {
			tenant: tenant.to_string(),
			store_id: store_id.to_string(),
			desired: desired.len(),
			actual: actual.len(),
			added: changes.to_add.len(),
			deleted: changes.to_delete.len(),
			batches,
			dry_run: self.settings.dry_run,
			duration_ms: started.elapsed().as_millis() as i64,
		};

		info!(
			store_id = %report.store_id,
			desired = report.desired,
			actual = report.actual,
			added = report.added,
			deleted = report.deleted,
			batches = report.batches,
			duration_ms = report.duration_ms,
			"tenant reconciled"
		);
		Ok(report)
	}

	/// Configured tenants, or every tenant the lister knows about.
	pub async fn tenants(&self, cancel: &CancellationToken) -> Result<Vec<String>> {
		if !self.settings.tenants.is_empty() {
			return Ok(self.settings.tenants.clone());
		}
		bounded(
			"tenant discovery",
			self.settings.page_timeout,
			cancel,
			self.lister.list_tenants(),
		)
		.await
	}

	/// One top-level pass: build and publish the snapshot, then reconcile
	/// every tenant against it with bounded concurrency.
	///
	/// Errors only when the pass cannot start (snapshot or tenant discovery).
	/// Tenant failures are collected in the report.
	#[instrument(skip_all)]
	pub async fn reconcile_all(&self, cancel: &CancellationToken) -> Result<PassReport> {
		let pass_id = Uuid::new_v4();
		let started_at = Utc::now();

		let snapshot = self.refresh_snapshot(cancel).await?;
		let tenants = self.tenants(cancel).await?;
		info!(%pass_id, tenants = tenants.len(), "starting reconciliation pass");

		let results: Vec<(String, Result<TenantReport>)> = stream::iter(tenants)
			.map(|tenant| {
				let snapshot = Arc::clone(&snapshot);
				async move {
					let result = self.reconcile_tenant(&tenant, snapshot, cancel).await;
					(tenant, result)
				}
			})
			.buffer_unordered(self.settings.tenant_concurrency.max(1))
			.collect()
			.await;

		let mut reports = Vec::new();
		let mut failures = Vec::new();
		for (tenant, result) in results {
			match result {
				Ok(report) => reports.push(report),
				Err(e) => {
					error!(%pass_id, tenant = %tenant, error = %e, "tenant reconciliation failed");
					failures.push(TenantFailure {
						tenant,
						error: e.to_string(),
						transient: e.is_transient(),
					});
				}
			}
		}
		reports.sort_by(|a, b| a.tenant.cmp(&b.tenant));
		failures.sort_by(|a, b| a.tenant.cmp(&b.tenant));

		let report = PassReport {
			pass_id,
			started_at,
			finished_at: Utc::now(),
			tenants: reports,
			failures,
		};
		info!(
			%pass_id,
			reconciled = report.tenants.len(),
			failed = report.failures.len(),
			added = report.added(),
			deleted = report.deleted(),
			duration_ms = report.duration_ms(),
			"reconciliation pass completed"
		);
		Ok(report)
	}
}
