// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use relsync_core::{ListError, ResolveError, ResourceKind, StoreError, TranslationError};

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
	#[error("global role resolution failed: {0}")]
	Resolve(#[from] ResolveError),

	#[error("failed to translate {kind} {name}: {source}")]
	Translation {
		kind: ResourceKind,
		name: String,
		#[source]
		source: TranslationError,
	},

	#[error("listing failed: {0}")]
	List(#[from] ListError),

	#[error("tuple store error: {0}")]
	Store(#[from] StoreError),

	/// Some batches of a tenant's diff could not be written. The remaining
	/// batches were still attempted.
	#[error("{failed} of {total} batches failed for tenant {tenant}")]
	BatchWrite {
		tenant: String,
		failed: usize,
		total: usize,
	},

	#[error("{operation} timed out after {after:?}")]
	Timeout {
		operation: &'static str,
		after: Duration,
	},

	#[error("reconciliation cancelled")]
	Cancelled,
}

impl ReconcileError {
	/// Whether retrying the pass without any policy change could succeed.
	///
	/// Resolution and translation failures are authoring mistakes and need a
	/// policy fix first.
	pub fn is_transient(&self) -> bool {
		!matches!(
			self,
			ReconcileError::Resolve(_) | ReconcileError::Translation { .. }
		)
	}
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
