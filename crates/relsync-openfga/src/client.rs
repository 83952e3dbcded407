// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenFGA REST client implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use relsync_common_http::{retry, RetryConfig};
use relsync_core::{StoreError, StoreId, Tuple, TupleKey, TuplePage, TupleStore};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, trace};

use crate::error::OpenFgaError;
use crate::types::{
	CreateStoreRequest, ListStoresResponse, ReadRequest, ReadResponse, Store, WriteRequest,
};

const DEFAULT_STORE_PREFIX: &str = "tenant-";
const LIST_STORES_PAGE_SIZE: u32 = 100;

/// Client for the OpenFGA HTTP API.
pub struct OpenFgaClient {
	http_client: Client,
	base_url: String,
	api_token: Option<String>,
	authorization_model_id: Option<String>,
	store_prefix: String,
	retry_config: RetryConfig,
	store_ids: RwLock<HashMap<String, StoreId>>,
}

impl std::fmt::Debug for OpenFgaClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OpenFgaClient")
			.field("base_url", &self.base_url)
			.field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
			.field("authorization_model_id", &self.authorization_model_id)
			.field("store_prefix", &self.store_prefix)
			.finish()
	}
}

impl OpenFgaClient {
	/// Creates a client for the server at `base_url`, with every request
	/// bounded by `request_timeout`.
	pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, OpenFgaError> {
		let base_url = base_url.into().trim_end_matches('/').to_string();
		if base_url.is_empty() {
			return Err(OpenFgaError::InvalidConfig("base url is empty".to_string()));
		}
		let http_client = relsync_common_http::new_client_with_timeout(request_timeout)?;

		Ok(Self {
			http_client,
			base_url,
			api_token: None,
			authorization_model_id: None,
			store_prefix: DEFAULT_STORE_PREFIX.to_string(),
			retry_config: RetryConfig::default(),
			store_ids: RwLock::new(HashMap::new()),
		})
	}

	pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
		self.api_token = Some(token.into());
		self
	}

	/// Pins writes to a specific authorization model.
	pub fn with_authorization_model_id(mut self, id: impl Into<String>) -> Self {
		self.authorization_model_id = Some(id.into());
		self
	}

	/// Store names are `<prefix><tenant>`.
	pub fn with_store_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.store_prefix = prefix.into();
		self
	}

	/// Retry policy for reads and store lookups. Writes are never retried.
	pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
		self.retry_config = config;
		self
	}

	pub fn store_name(&self, tenant: &str) -> String {
		format!("{}{}", self.store_prefix, tenant)
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
		match &self.api_token {
			Some(token) => request.bearer_auth(token),
			None => request,
		}
	}

	async fn send(&self, request: RequestBuilder) -> Result<Response, OpenFgaError> {
		let response = self.authorized(request).send().await.map_err(|e| {
			if e.is_timeout() {
				error!("OpenFGA request timed out");
				return OpenFgaError::Timeout;
			}
			error!(error = %e, "network error during OpenFGA request");
			OpenFgaError::Network(e)
		})?;

		let status = response.status();
		trace!(status = %status, "OpenFGA response");
		if status.is_success() {
			return Ok(response);
		}

		let status_code = status.as_u16();
		let body = response.text().await.unwrap_or_default();
		match status_code {
			401 | 403 => {
				error!(status = status_code, "unauthorized OpenFGA request");
				Err(OpenFgaError::Unauthorized)
			}
			429 => Err(OpenFgaError::RateLimited),
			_ => {
				error!(status = status_code, body = %body, "OpenFGA API error");
				Err(OpenFgaError::ApiError {
					status: status_code,
					message: body,
				})
			}
		}
	}

	async fn json<T: DeserializeOwned>(response: Response) -> Result<T, OpenFgaError> {
		let body = response.text().await?;
		serde_json::from_str(&body)
			.map_err(|e| OpenFgaError::InvalidResponse(format!("JSON parse error: {e}")))
	}

	/// Finds a store by exact name, walking every page of the store list.
	#[instrument(skip(self))]
	pub async fn find_store(&self, name: &str) -> Result<Option<Store>, OpenFgaError> {
		let mut token: Option<String> = None;
		loop {
			let mut query = vec![("page_size", LIST_STORES_PAGE_SIZE.to_string())];
			if let Some(t) = &token {
				query.push(("continuation_token", t.clone()));
			}

			let page: ListStoresResponse = retry(&self.retry_config, || {
				let request = self.http_client.get(self.url("/stores")).query(&query);
				async move { Self::json(self.send(request).await?).await }
			})
			.await?;

			if let Some(store) = page.stores.into_iter().find(|s| s.name == name) {
				return Ok(Some(store));
			}
			token = relsync_core::next_token(page.continuation_token);
			if token.is_none() {
				return Ok(None);
			}
		}
	}

	#[instrument(skip(self))]
	pub async fn create_store(&self, name: &str) -> Result<Store, OpenFgaError> {
		let response = self
			.send(
				self.http_client
					.post(self.url("/stores"))
					.json(&CreateStoreRequest { name }),
			)
			.await?;
		let store: Store = Self::json(response).await?;
		info!(store_id = %store.id, name = %store.name, "created OpenFGA store");
		Ok(store)
	}

	async fn read_page(
		&self,
		store: &StoreId,
		continuation_token: Option<&str>,
		page_size: u32,
	) -> Result<ReadResponse, OpenFgaError> {
		let url = self.url(&format!("/stores/{store}/read"));
		let body = ReadRequest {
			page_size,
			continuation_token,
		};
		retry(&self.retry_config, || {
			let request = self.http_client.post(&url).json(&body);
			async move { Self::json(self.send(request).await?).await }
		})
		.await
	}

	async fn write(
		&self,
		store: &StoreId,
		writes: &[Tuple],
		deletes: &[TupleKey],
	) -> Result<(), OpenFgaError> {
		let body = WriteRequest::new(writes, deletes, self.authorization_model_id.as_deref());
		self.send(
			self.http_client
				.post(self.url(&format!("/stores/{store}/write")))
				.json(&body),
		)
		.await?;
		Ok(())
	}
}

#[async_trait]
impl TupleStore for OpenFgaClient {
	#[instrument(skip(self))]
	async fn get_or_create_store(&self, tenant: &str) -> Result<StoreId, StoreError> {
		if let Some(id) = self.store_ids.read().await.get(tenant) {
			return Ok(id.clone());
		}

		let name = self.store_name(tenant);
		let store = match self.find_store(&name).await? {
			Some(store) => store,
			None => self.create_store(&name).await?,
		};
		let id = StoreId::new(store.id);
		debug!(store_id = %id, "resolved tenant store");

		self.store_ids
			.write()
			.await
			.insert(tenant.to_string(), id.clone());
		Ok(id)
	}

	async fn read_tuples(
		&self,
		store: &StoreId,
		continue_token: Option<&str>,
		page_size: u32,
	) -> Result<TuplePage, StoreError> {
		let page = self.read_page(store, continue_token, page_size).await?;
		Ok(TuplePage {
			tuples: page.tuples.into_iter().map(|t| t.key).collect(),
			continue_token: page.continuation_token,
		})
	}

	async fn write_tuples(
		&self,
		store: &StoreId,
		writes: &[Tuple],
		deletes: &[TupleKey],
	) -> Result<(), StoreError> {
		Ok(self.write(store, writes, deletes).await?)
	}
}
