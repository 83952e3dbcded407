// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reconciler configuration section.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReconcilerConfigLayer {
	pub write_batch_size: Option<usize>,
	pub list_page_size: Option<u32>,
	pub read_page_size: Option<u32>,
	pub interval_secs: Option<u64>,
	pub page_timeout_secs: Option<u64>,
	pub batch_timeout_secs: Option<u64>,
	pub tenant_concurrency: Option<usize>,
	pub dry_run: Option<bool>,
	pub tenants: Option<Vec<String>>,
}

impl ReconcilerConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.write_batch_size.is_some() {
			self.write_batch_size = other.write_batch_size;
		}
		if other.list_page_size.is_some() {
			self.list_page_size = other.list_page_size;
		}
		if other.read_page_size.is_some() {
			self.read_page_size = other.read_page_size;
		}
		if other.interval_secs.is_some() {
			self.interval_secs = other.interval_secs;
		}
		if other.page_timeout_secs.is_some() {
			self.page_timeout_secs = other.page_timeout_secs;
		}
		if other.batch_timeout_secs.is_some() {
			self.batch_timeout_secs = other.batch_timeout_secs;
		}
		if other.tenant_concurrency.is_some() {
			self.tenant_concurrency = other.tenant_concurrency;
		}
		if other.dry_run.is_some() {
			self.dry_run = other.dry_run;
		}
		if other.tenants.is_some() {
			self.tenants = other.tenants;
		}
	}

	pub fn finalize(self) -> ReconcilerConfig {
		let defaults = ReconcilerConfig::default();
		ReconcilerConfig {
			write_batch_size: self.write_batch_size.unwrap_or(defaults.write_batch_size),
			list_page_size: self.list_page_size.unwrap_or(defaults.list_page_size),
			read_page_size: self.read_page_size.unwrap_or(defaults.read_page_size),
			interval_secs: self.interval_secs.unwrap_or(defaults.interval_secs),
			page_timeout_secs: self.page_timeout_secs.unwrap_or(defaults.page_timeout_secs),
			batch_timeout_secs: self.batch_timeout_secs.unwrap_or(defaults.batch_timeout_secs),
			tenant_concurrency: self.tenant_concurrency.unwrap_or(defaults.tenant_concurrency),
			dry_run: self.dry_run.unwrap_or(defaults.dry_run),
			tenants: self.tenants.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconcilerConfig {
	pub write_batch_size: usize,
	pub list_page_size: u32,
	pub read_page_size: u32,
	pub interval_secs: u64,
	pub page_timeout_secs: u64,
	pub batch_timeout_secs: u64,
	pub tenant_concurrency: usize,
	pub dry_run: bool,
	/// Tenants to reconcile; empty means discover them.
	pub tenants: Vec<String>,
}

impl ReconcilerConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		let zero = |field: &str| {
			Err(ConfigError::Validation(format!(
				"reconciler.{field} must be greater than zero"
			)))
		};
		if self.write_batch_size == 0 {
			return zero("write_batch_size");
		}
		if self.list_page_size == 0 {
			return zero("list_page_size");
		}
		if self.read_page_size == 0 {
			return zero("read_page_size");
		}
		if self.tenant_concurrency == 0 {
			return zero("tenant_concurrency");
		}
		if self.interval_secs == 0 {
			return zero("interval_secs");
		}
		Ok(())
	}
}

impl Default for ReconcilerConfig {
	fn default() -> Self {
		Self {
			write_batch_size: 100,
			list_page_size: 50_000,
			read_page_size: 100,
			interval_secs: 300,
			page_timeout_secs: 30,
			batch_timeout_secs: 30,
			tenant_concurrency: 4,
			dry_run: false,
			tenants: Vec::new(),
		}
	}
}
