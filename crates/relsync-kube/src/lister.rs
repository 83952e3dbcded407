// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::{Client, Config};
use relsync_core::{ListError, PolicyLister, ResourceKind, ResourcePage};
use tracing::{debug, instrument, trace};

use crate::decode::decode;
use crate::error::KubeError;

const NAMESPACE_PAGE_SIZE: u32 = 500;

/// Production lister reading custom resources through the kube crate.
pub struct KubePolicyLister {
	client: Client,
	group: String,
	version: String,
	tenant_label_selector: Option<String>,
}

impl KubePolicyLister {
	pub fn new(client: Client, group: impl Into<String>, version: impl Into<String>) -> Self {
		Self {
			client,
			group: group.into(),
			version: version.into(),
			tenant_label_selector: None,
		}
	}

	/// Connects with the ambient cluster configuration: in-cluster service
	/// account, `KUBECONFIG`, or `~/.kube/config`.
	pub async fn try_default(
		group: impl Into<String>,
		version: impl Into<String>,
	) -> Result<Self, KubeError> {
		let config = Config::infer().await.map_err(|e| KubeError::Config {
			message: e.to_string(),
		})?;
		let client = Client::try_from(config)?;
		debug!("K8s client initialized");
		Ok(Self::new(client, group, version))
	}

	/// Only namespaces matching `selector` are treated as tenants.
	pub fn with_tenant_label_selector(mut self, selector: impl Into<String>) -> Self {
		self.tenant_label_selector = Some(selector.into());
		self
	}

	pub fn api_resource(&self, kind: ResourceKind) -> ApiResource {
		let gvk = GroupVersionKind::gvk(&self.group, &self.version, kind.as_str());
		ApiResource::from_gvk_with_plural(&gvk, kind.plural())
	}
}

#[async_trait]
impl PolicyLister for KubePolicyLister {
	#[instrument(skip(self, kind), fields(kind = %kind))]
	async fn list(
		&self,
		kind: ResourceKind,
		namespace: Option<&str>,
		continue_token: Option<&str>,
		limit: u32,
	) -> Result<ResourcePage, ListError> {
		let resource = self.api_resource(kind);
		let api: Api<DynamicObject> = match namespace {
			Some(ns) if !kind.is_cluster_scoped() => {
				Api::namespaced_with(self.client.clone(), ns, &resource)
			}
			_ => Api::all_with(self.client.clone(), &resource),
		};

		let mut params = ListParams::default().limit(limit);
		if let Some(token) = continue_token.filter(|t| !t.is_empty()) {
			params = params.continue_token(token);
		}

		let list = api.list(&params).await.map_err(|e| ListError::Backend {
			kind,
			message: e.to_string(),
		})?;
		let continue_token = relsync_core::next_token(list.metadata.continue_.clone());
		let items = list
			.items
			.into_iter()
			.map(|object| decode(kind, object))
			.collect::<Result<Vec<_>, _>>()?;

		trace!(items = items.len(), more = continue_token.is_some(), "listed resources");
		Ok(ResourcePage {
			items,
			continue_token,
		})
	}

	#[instrument(skip(self))]
	async fn list_tenants(&self) -> Result<Vec<String>, ListError> {
		let namespaces: Api<Namespace> = Api::all(self.client.clone());
		let mut tenants = Vec::new();
		let mut token: Option<String> = None;

		loop {
			let mut params = ListParams::default().limit(NAMESPACE_PAGE_SIZE);
			if let Some(selector) = &self.tenant_label_selector {
				params = params.labels(selector);
			}
			if let Some(t) = &token {
				params = params.continue_token(t);
			}

			let list = namespaces
				.list(&params)
				.await
				.map_err(|e| ListError::Tenants(e.to_string()))?;
			tenants.extend(list.items.into_iter().filter_map(|ns| ns.metadata.name));

			token = relsync_core::next_token(list.metadata.continue_);
			if token.is_none() {
				break;
			}
		}

		tenants.sort();
		debug!(tenants = tenants.len(), "discovered tenants");
		Ok(tenants)
	}
}
