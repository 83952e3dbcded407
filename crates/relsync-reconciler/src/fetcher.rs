// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Desired and actual tuple sets.
//!
//! Every listing follows continuation tokens until exhausted; a page that
//! fails or times out fails the whole fetch, so a partial listing is never
//! mistaken for a complete one.

use std::collections::HashMap;

use relsync_core::schema::validate;
use relsync_core::{
	next_token, resolve, role_grant_tuples, translate, GlobalRole, ListError, PolicyLister,
	PolicyResource, ResourceKind, ResourcePage, StoreId, Tuple, TupleStore,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::bounded::bounded;
use crate::diff::TupleSet;
use crate::error::{ReconcileError, Result};
use crate::settings::ReconcilerSettings;
use crate::snapshot::ClusterSnapshot;

pub struct TupleFetcher<'a> {
	lister: &'a dyn PolicyLister,
	store: &'a dyn TupleStore,
	settings: &'a ReconcilerSettings,
}

impl<'a> TupleFetcher<'a> {
	pub fn new(
		lister: &'a dyn PolicyLister,
		store: &'a dyn TupleStore,
		settings: &'a ReconcilerSettings,
	) -> Self {
		Self {
			lister,
			store,
			settings,
		}
	}

	async fn list_page(
		&self,
		kind: ResourceKind,
		namespace: Option<&str>,
		token: Option<&str>,
		cancel: &CancellationToken,
	) -> Result<ResourcePage> {
		let page = bounded(
			"list page",
			self.settings.page_timeout,
			cancel,
			self.lister
				.list(kind, namespace, token, self.settings.list_page_size),
		)
		.await?;
		trace!(%kind, namespace = ?namespace, items = page.items.len(), "listed page");
		Ok(page)
	}

	/// Lists and resolves every global role, and translates the result into
	/// the cluster tuples shared by all tenants.
	#[instrument(skip_all)]
	pub async fn build_snapshot(&self, cancel: &CancellationToken) -> Result<ClusterSnapshot> {
		let kind = ResourceKind::GlobalRole;
		let mut roles: HashMap<String, GlobalRole> = HashMap::new();
		let mut token: Option<String> = None;

		loop {
			let page = self.list_page(kind, None, token.as_deref(), cancel).await?;
			for item in page.items {
				match item {
					PolicyResource::GlobalRole(role) => {
						roles.insert(role.metadata.name.clone(), role);
					}
					other => {
						return Err(ListError::Decode {
							kind,
							name: other.name().to_string(),
							message: format!("lister returned a {}", other.kind()),
						}
						.into())
					}
				}
			}
			token = next_token(page.continue_token);
			if token.is_none() {
				break;
			}
		}

		let resolved = resolve(&roles)?;

		let mut names: Vec<&String> = resolved.keys().collect();
		names.sort();
		let mut tuples = Vec::new();
		for name in names {
			let grants = role_grant_tuples(name, &resolved[name]).map_err(|source| {
				ReconcileError::Translation {
					kind,
					name: name.clone(),
					source,
				}
			})?;
			check_schema(kind, name, &grants)?;
			tuples.extend(grants);
		}

		debug!(
			roles = resolved.len(),
			tuples = tuples.len(),
			"built cluster snapshot"
		);
		Ok(ClusterSnapshot::new(resolved, tuples))
	}

	/// The full desired set for `tenant`: the snapshot's cluster tuples plus
	/// the translation of every namespaced resource.
	///
	/// The first resource that fails translation aborts the fetch.
	#[instrument(skip_all, fields(tenant = %tenant))]
	pub async fn fetch_desired(
		&self,
		tenant: &str,
		snapshot: &ClusterSnapshot,
		cancel: &CancellationToken,
	) -> Result<TupleSet> {
		let mut desired: TupleSet = snapshot
			.tuples
			.iter()
			.map(|t| (t.key.clone(), t.clone()))
			.collect();

		for kind in ResourceKind::NAMESPACED {
			let mut token: Option<String> = None;
			let mut listed = 0usize;
			loop {
				let page = self
					.list_page(kind, Some(tenant), token.as_deref(), cancel)
					.await?;
				listed += page.items.len();

				for resource in &page.items {
					let tuples = translate(resource, Some(&snapshot.resolved)).map_err(|source| {
						ReconcileError::Translation {
							kind: resource.kind(),
							name: resource.name().to_string(),
							source,
						}
					})?;
					check_schema(resource.kind(), resource.name(), &tuples)?;
					desired.extend(tuples.into_iter().map(|t| (t.key.clone(), t)));
				}

				token = next_token(page.continue_token);
				if token.is_none() {
					break;
				}
			}
			debug!(%kind, resources = listed, "fetched kind");
		}

		Ok(desired)
	}

	/// Every tuple currently stored for the tenant.
	#[instrument(skip_all, fields(store_id = %store_id))]
	pub async fn read_actual(
		&self,
		store_id: &StoreId,
		cancel: &CancellationToken,
	) -> Result<TupleSet> {
		let mut actual = TupleSet::new();
		let mut token: Option<String> = None;

		loop {
			let page = bounded(
				"read page",
				self.settings.page_timeout,
				cancel,
				self.store
					.read_tuples(store_id, token.as_deref(), self.settings.read_page_size),
			)
			.await?;
			trace!(tuples = page.tuples.len(), "read tuple page");
			actual.extend(page.tuples.into_iter().map(|t| (t.key.clone(), t)));

			token = next_token(page.continue_token);
			if token.is_none() {
				break;
			}
		}

		debug!(tuples = actual.len(), "read actual tuples");
		Ok(actual)
	}
}

fn check_schema(kind: ResourceKind, name: &str, tuples: &[Tuple]) -> Result<()> {
	for tuple in tuples {
		validate(tuple).map_err(|source| ReconcileError::Translation {
			kind,
			name: name.to_string(),
			source,
		})?;
	}
	Ok(())
}
