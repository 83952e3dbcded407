// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Boundary trait for listing policy resources from the cluster.

use async_trait::async_trait;
use thiserror::Error;

use crate::resource::{PolicyResource, ResourceKind};

#[derive(Debug, Error)]
pub enum ListError {
	#[error("list {kind} failed: {message}")]
	Backend { kind: ResourceKind, message: String },

	#[error("failed to decode {kind} {name}: {message}")]
	Decode {
		kind: ResourceKind,
		name: String,
		message: String,
	},

	#[error("tenant discovery failed: {0}")]
	Tenants(String),
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePage {
	pub items: Vec<PolicyResource>,
	/// Token for the next page; `None` or empty when exhausted.
	pub continue_token: Option<String>,
}

/// Lists policy resources page by page.
#[async_trait]
pub trait PolicyLister: Send + Sync {
	/// Lists one page of `kind`.
	///
	/// `namespace` is the tenant for namespaced kinds and `None` for
	/// cluster-scoped kinds.
	async fn list(
		&self,
		kind: ResourceKind,
		namespace: Option<&str>,
		continue_token: Option<&str>,
		limit: u32,
	) -> Result<ResourcePage, ListError>;

	/// Every tenant known to the cluster.
	async fn list_tenants(&self) -> Result<Vec<String>, ListError>;
}
