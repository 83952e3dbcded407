// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reconciliation of desired policy tuples against a tuple store.
//!
//! A top-level pass resolves the global roles once, publishes the result as an
//! immutable [`ClusterSnapshot`], then for every tenant fetches the desired
//! tuple set, reads the stored set, diffs them and writes the difference in
//! bounded batches that continue past individual failures.

mod bounded;
pub mod diff;
pub mod error;
pub mod fetcher;
pub mod health;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod reconciler;
pub mod report;
pub mod scheduler;
pub mod settings;
pub mod snapshot;
pub mod writer;

pub use diff::{diff, tuple_set, TupleDiff, TupleSet};
pub use error::{ReconcileError, Result};
pub use fetcher::TupleFetcher;
pub use health::{HealthState, ReconcilerHealth};
pub use reconciler::Reconciler;
pub use report::{PassReport, TenantFailure, TenantReport};
pub use scheduler::ReconcileScheduler;
pub use settings::ReconcilerSettings;
pub use snapshot::{ClusterSnapshot, SnapshotCell};
pub use tokio_util::sync::CancellationToken;
pub use writer::{BatchWriter, WriteSummary};
