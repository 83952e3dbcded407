// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Batched application of a [`TupleDiff`].
//!
//! A diff that fits in one batch is written with a single combined call.
//! Larger diffs are split into add batches and delete batches of at most
//! `batch_size` each. A failed or timed-out batch is logged and counted, and
//! the remaining batches are still attempted; the next pass re-diffs and
//! retries whatever is still out of sync.

use std::time::Duration;

use relsync_core::{StoreId, Tuple, TupleKey, TupleStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::diff::TupleDiff;
use crate::error::{ReconcileError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchKind {
	Combined,
	Add,
	Delete,
}

impl BatchKind {
	fn as_str(&self) -> &'static str {
		match self {
			BatchKind::Combined => "combined",
			BatchKind::Add => "add",
			BatchKind::Delete => "delete",
		}
	}
}

struct Batch<'a> {
	kind: BatchKind,
	writes: &'a [Tuple],
	deletes: &'a [TupleKey],
	/// Index range within the add or delete list.
	start: usize,
	end: usize,
}

/// Counts of a completed write phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
	pub batches: usize,
	pub failed: usize,
}

pub struct BatchWriter<'a> {
	store: &'a dyn TupleStore,
	batch_size: usize,
	timeout: Duration,
}

impl<'a> BatchWriter<'a> {
	/// `batch_size` is clamped to at least one.
	pub fn new(store: &'a dyn TupleStore, batch_size: usize, timeout: Duration) -> Self {
		Self {
			store,
			batch_size: batch_size.max(1),
			timeout,
		}
	}

	fn plan<'d>(&self, diff: &'d TupleDiff) -> Vec<Batch<'d>> {
		if diff.is_empty() {
			return Vec::new();
		}
		if diff.len() <= self.batch_size {
			return vec![Batch {
				kind: BatchKind::Combined,
				writes: &diff.to_add,
				deletes: &diff.to_delete,
				start: 0,
				end: diff.len(),
			}];
		}

		let adds = diff
			.to_add
			.chunks(self.batch_size)
			.enumerate()
			.map(|(i, chunk)| Batch {
				kind: BatchKind::Add,
				writes: chunk,
				deletes: &[],
				start: i * self.batch_size,
				end: i * self.batch_size + chunk.len(),
			});
		let deletes = diff
			.to_delete
			.chunks(self.batch_size)
			.enumerate()
			.map(|(i, chunk)| Batch {
				kind: BatchKind::Delete,
				writes: &[],
				deletes: chunk,
				start: i * self.batch_size,
				end: i * self.batch_size + chunk.len(),
			});
		adds.chain(deletes).collect()
	}

	/// Writes every batch of `diff`.
	///
	/// Returns [`ReconcileError::BatchWrite`] when any batch failed, and
	/// [`ReconcileError::Cancelled`] when cancellation stopped the remaining
	/// batches from being issued. If a batch had already failed when
	/// cancellation arrived, the result is `BatchWrite` with the unissued
	/// batches counted as failed. A batch already in flight is bounded only
	/// by its timeout.
	#[instrument(skip_all, fields(tenant = %tenant, store_id = %store_id))]
	pub async fn apply(
		&self,
		tenant: &str,
		store_id: &StoreId,
		diff: &TupleDiff,
		cancel: &CancellationToken,
	) -> Result<WriteSummary> {
		let batches = self.plan(diff);
		let total = batches.len();
		let mut failed = 0usize;

		for (attempted, batch) in batches.iter().enumerate() {
			if cancel.is_cancelled() {
				warn!(
					attempted,
					total,
					failed,
					"cancelled before all batches were issued"
				);
				if failed > 0 {
					return Err(ReconcileError::BatchWrite {
						tenant: tenant.to_string(),
						failed: failed + (total - attempted),
						total,
					});
				}
				return Err(ReconcileError::Cancelled);
			}

			let outcome = tokio::time::timeout(
				self.timeout,
				self.store
					.write_tuples(store_id, batch.writes, batch.deletes),
			)
			.await;

			match outcome {
				Ok(Ok(())) => {
					debug!(
						batch = batch.kind.as_str(),
						batch_start = batch.start,
						batch_end = batch.end,
						writes = batch.writes.len(),
						deletes = batch.deletes.len(),
						"batch written"
					);
				}
				Ok(Err(e)) => {
					failed += 1;
					warn!(
						batch = batch.kind.as_str(),
						batch_start = batch.start,
						batch_end = batch.end,
						error = %e,
						"batch write failed, continuing"
					);
				}
				Err(_) => {
					failed += 1;
					warn!(
						batch = batch.kind.as_str(),
						batch_start = batch.start,
						batch_end = batch.end,
						timeout = ?self.timeout,
						"batch write timed out, continuing"
					);
				}
			}
		}

		if failed > 0 {
			return Err(ReconcileError::BatchWrite {
				tenant: tenant.to_string(),
				failed,
				total,
			});
		}
		Ok(WriteSummary {
			batches: total,
			failed,
		})
	}
}
