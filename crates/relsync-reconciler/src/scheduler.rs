// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::health::{HealthTracker, LastPassInfo, ReconcilerHealth};
use crate::reconciler::Reconciler;
use crate::report::{PassReport, TenantReport};

/// Runs top-level passes on an interval and on demand.
pub struct ReconcileScheduler {
	reconciler: Arc<Reconciler>,
	interval: Duration,
	health: Arc<HealthTracker>,
	cancel: CancellationToken,
	shutdown_tx: broadcast::Sender<()>,
	handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReconcileScheduler {
	pub fn new(reconciler: Arc<Reconciler>) -> Self {
		let interval = reconciler.settings().interval;
		let (shutdown_tx, _) = broadcast::channel(1);
		Self {
			reconciler,
			interval,
			health: Arc::new(HealthTracker::new()),
			cancel: CancellationToken::new(),
			shutdown_tx,
			handle: Mutex::new(None),
		}
	}

	/// Starts the periodic loop. The first pass runs immediately.
	#[instrument(skip(self), fields(interval = ?self.interval))]
	pub async fn start(&self) {
		let mut handle = self.handle.lock().await;
		if handle.is_some() {
			warn!("reconcile scheduler already started");
			return;
		}

		let reconciler = Arc::clone(&self.reconciler);
		let health = Arc::clone(&self.health);
		let cancel = self.cancel.clone();
		let mut shutdown_rx = self.shutdown_tx.subscribe();
		let mut ticker = tokio::time::interval(self.interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		*handle = Some(tokio::spawn(async move {
			loop {
				tokio::select! {
					_ = ticker.tick() => {
						let _ = run_pass(&reconciler, &health, &cancel).await;
					}
					_ = shutdown_rx.recv() => {
						info!("reconcile scheduler loop stopping");
						break;
					}
				}
			}
		}));

		info!("reconcile scheduler started");
	}

	/// Runs one top-level pass now.
	pub async fn run_once(&self) -> Result<PassReport> {
		run_pass(&self.reconciler, &self.health, &self.cancel).await
	}

	/// Reconciles a single tenant now.
	#[instrument(skip(self))]
	pub async fn trigger(&self, tenant: &str) -> Result<TenantReport> {
		let started_at = Utc::now();
		let started = Instant::now();
		let result = self.reconciler.reconcile(tenant, &self.cancel).await;

		self.health
			.record(LastPassInfo {
				pass_id: Uuid::new_v4().to_string(),
				started_at,
				duration_ms: started.elapsed().as_millis() as i64,
				succeeded: result.is_ok(),
				error: result.as_ref().err().map(ToString::to_string),
			})
			.await;
		result
	}

	pub async fn health(&self) -> ReconcilerHealth {
		self.health.status().await
	}

	/// Cancels any in-flight pass and waits for the loop to exit.
	#[instrument(skip(self))]
	pub async fn shutdown(&self) {
		self.cancel.cancel();
		let _ = self.shutdown_tx.send(());

		if let Some(handle) = self.handle.lock().await.take() {
			let _ = handle.await;
		}
		info!("reconcile scheduler shut down");
	}
}

async fn run_pass(
	reconciler: &Reconciler,
	health: &HealthTracker,
	cancel: &CancellationToken,
) -> Result<PassReport> {
	let started_at = Utc::now();
	let started = Instant::now();
	let result = reconciler.reconcile_all(cancel).await;

	let info = match &result {
		Ok(report) => LastPassInfo {
			pass_id: report.pass_id.to_string(),
			started_at: report.started_at,
			duration_ms: report.duration_ms(),
			succeeded: report.is_success(),
			error: (!report.is_success()).then(|| {
				let tenants: Vec<&str> = report.failures.iter().map(|f| f.tenant.as_str()).collect();
				format!("tenants failed: {}", tenants.join(", "))
			}),
		},
		Err(e) => {
			error!(error = %e, "reconciliation pass could not run");
			LastPassInfo {
				pass_id: Uuid::new_v4().to_string(),
				started_at,
				duration_ms: started.elapsed().as_millis() as i64,
				succeeded: false,
				error: Some(e.to_string()),
			}
		}
	};
	health.record(info).await;
	result
}
