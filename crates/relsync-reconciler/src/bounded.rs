// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{ReconcileError, Result};

/// Runs one I/O step under a timeout, abandoning it on cancellation.
///
/// Only for calls that are safe to drop midway: store lookup, list and read
/// pages. Tuple writes are never raced against cancellation.
pub(crate) async fn bounded<T, E, F>(
	operation: &'static str,
	limit: Duration,
	cancel: &CancellationToken,
	fut: F,
) -> Result<T>
where
	F: Future<Output = std::result::Result<T, E>>,
	E: Into<ReconcileError>,
{
	tokio::select! {
		biased;
		_ = cancel.cancelled() => Err(ReconcileError::Cancelled),
		res = tokio::time::timeout(limit, fut) => match res {
			Ok(inner) => inner.map_err(Into::into),
			Err(_) => Err(ReconcileError::Timeout { operation, after: limit }),
		},
	}
}
