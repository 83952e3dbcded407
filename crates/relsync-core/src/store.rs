// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Boundary trait for the relationship tuple store.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::tuple::{Tuple, TupleKey};

/// Opaque identifier of a tenant's store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreId(pub String);

impl StoreId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for StoreId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TuplePage {
	pub tuples: Vec<Tuple>,
	/// Token for the next page; `None` or empty when exhausted.
	pub continue_token: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("store request failed: {0}")]
	Request(String),

	#[error("store rejected request ({status}): {message}")]
	Rejected { status: u16, message: String },

	#[error("store not found: {0}")]
	NotFound(String),

	#[error("invalid store response: {0}")]
	InvalidResponse(String),
}

/// Reads and writes relationship tuples in per-tenant stores.
#[async_trait]
pub trait TupleStore: Send + Sync {
	/// Looks up the tenant's store, creating it if it does not exist yet.
	async fn get_or_create_store(&self, tenant: &str) -> Result<StoreId, StoreError>;

	async fn read_tuples(
		&self,
		store: &StoreId,
		continue_token: Option<&str>,
		page_size: u32,
	) -> Result<TuplePage, StoreError>;

	/// Applies writes and deletes in one request. Deletes are keys only.
	async fn write_tuples(
		&self,
		store: &StoreId,
		writes: &[Tuple],
		deletes: &[TupleKey],
	) -> Result<(), StoreError>;
}
