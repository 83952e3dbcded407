// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

pub const DEFAULT_WRITE_BATCH_SIZE: usize = 100;
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 50_000;
pub const DEFAULT_READ_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_TENANT_CONCURRENCY: usize = 4;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// Runtime knobs for a [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerSettings {
	/// Maximum tuples per write call.
	pub write_batch_size: usize,
	/// Page-size hint passed to the policy lister.
	pub list_page_size: u32,
	/// Page size for reading stored tuples.
	pub read_page_size: u32,
	/// Bound on each list page and tuple-read page.
	pub page_timeout: Duration,
	/// Bound on each write batch.
	pub batch_timeout: Duration,
	/// Tenant passes run at once within a top-level pass.
	pub tenant_concurrency: usize,
	/// Compute and report the diff without writing.
	pub dry_run: bool,
	/// Tenants to reconcile. Empty means discover through the lister.
	pub tenants: Vec<String>,
	/// Period between scheduled top-level passes.
	pub interval: Duration,
}

impl Default for ReconcilerSettings {
	fn default() -> Self {
		Self {
			write_batch_size: DEFAULT_WRITE_BATCH_SIZE,
			list_page_size: DEFAULT_LIST_PAGE_SIZE,
			read_page_size: DEFAULT_READ_PAGE_SIZE,
			page_timeout: DEFAULT_PAGE_TIMEOUT,
			batch_timeout: DEFAULT_BATCH_TIMEOUT,
			tenant_concurrency: DEFAULT_TENANT_CONCURRENCY,
			dry_run: false,
			tenants: Vec::new(),
			interval: DEFAULT_INTERVAL,
		}
	}
}
