// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory [`PolicyLister`] and [`TupleStore`] implementations.
//!
//! Both paginate with numeric offset tokens like the real backends paginate
//! with opaque ones, and the store can be told to fail or stall specific
//! write calls.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use relsync_core::{
	ListError, PolicyLister, PolicyResource, ResourceKind, ResourcePage, StoreError, StoreId,
	Tuple, TupleKey, TuplePage, TupleStore,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parse_offset(token: Option<&str>) -> Result<usize, String> {
	match token {
		None | Some("") => Ok(0),
		Some(t) => t.parse().map_err(|_| format!("invalid continuation token {t:?}")),
	}
}

fn page_bounds(len: usize, offset: usize, limit: u32) -> (usize, Option<String>) {
	let end = len.min(offset.saturating_add(limit.max(1) as usize));
	let next = (end < len).then(|| end.to_string());
	(end, next)
}

/// One recorded `write_tuples` call.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCall {
	pub store: StoreId,
	pub writes: Vec<Tuple>,
	pub deletes: Vec<TupleKey>,
}

#[derive(Default)]
struct StoreState {
	stores: HashMap<String, StoreId>,
	tuples: HashMap<StoreId, BTreeMap<TupleKey, Tuple>>,
	calls: Vec<WriteCall>,
	failing_calls: BTreeSet<usize>,
	delayed_calls: HashMap<usize, Duration>,
}

#[derive(Default)]
pub struct MemoryTupleStore {
	state: Mutex<StoreState>,
}

impl MemoryTupleStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// The tenant's store id, created on first use.
	pub fn get_or_create(&self, tenant: &str) -> StoreId {
		let mut state = lock(&self.state);
		let next = state.stores.len() + 1;
		let id = state
			.stores
			.entry(tenant.to_string())
			.or_insert_with(|| StoreId::new(format!("store-{next:03}")))
			.clone();
		state.tuples.entry(id.clone()).or_default();
		id
	}

	/// Stores tuples directly, bypassing write call accounting.
	pub fn seed(&self, tenant: &str, tuples: impl IntoIterator<Item = Tuple>) {
		let id = self.get_or_create(tenant);
		let mut state = lock(&self.state);
		let stored = state.tuples.entry(id).or_default();
		for tuple in tuples {
			stored.insert(tuple.key.clone(), tuple);
		}
	}

	/// Stored tuples of the tenant, in key order.
	pub fn tuples(&self, tenant: &str) -> Vec<Tuple> {
		let state = lock(&self.state);
		state
			.stores
			.get(tenant)
			.and_then(|id| state.tuples.get(id))
			.map(|t| t.values().cloned().collect())
			.unwrap_or_default()
	}

	/// Every write call received so far, failed ones included.
	pub fn write_calls(&self) -> Vec<WriteCall> {
		lock(&self.state).calls.clone()
	}

	/// Makes the `n`th write call (1-based) fail without applying anything.
	pub fn fail_write_call(&self, n: usize) {
		lock(&self.state).failing_calls.insert(n);
	}

	/// Makes the `n`th write call (1-based) sleep before applying.
	pub fn delay_write_call(&self, n: usize, delay: Duration) {
		lock(&self.state).delayed_calls.insert(n, delay);
	}
}

#[async_trait]
impl TupleStore for MemoryTupleStore {
	async fn get_or_create_store(&self, tenant: &str) -> Result<StoreId, StoreError> {
		Ok(self.get_or_create(tenant))
	}

	async fn read_tuples(
		&self,
		store: &StoreId,
		continue_token: Option<&str>,
		page_size: u32,
	) -> Result<TuplePage, StoreError> {
		let offset = parse_offset(continue_token).map_err(StoreError::InvalidResponse)?;
		let state = lock(&self.state);
		let stored = state
			.tuples
			.get(store)
			.ok_or_else(|| StoreError::NotFound(store.to_string()))?;

		let (end, continue_token) = page_bounds(stored.len(), offset, page_size);
		let tuples = stored
			.values()
			.skip(offset)
			.take(end.saturating_sub(offset))
			.cloned()
			.collect();
		Ok(TuplePage {
			tuples,
			continue_token,
		})
	}

	async fn write_tuples(
		&self,
		store: &StoreId,
		writes: &[Tuple],
		deletes: &[TupleKey],
	) -> Result<(), StoreError> {
		let (call, delay) = {
			let mut state = lock(&self.state);
			state.calls.push(WriteCall {
				store: store.clone(),
				writes: writes.to_vec(),
				deletes: deletes.to_vec(),
			});
			let call = state.calls.len();
			(call, state.delayed_calls.get(&call).copied())
		};

		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}

		let mut state = lock(&self.state);
		if state.failing_calls.contains(&call) {
			return Err(StoreError::Rejected {
				status: 500,
				message: format!("injected failure on write call {call}"),
			});
		}
		let stored = state
			.tuples
			.get_mut(store)
			.ok_or_else(|| StoreError::NotFound(store.to_string()))?;
		for key in deletes {
			stored.remove(key);
		}
		for tuple in writes {
			stored.insert(tuple.key.clone(), tuple.clone());
		}
		Ok(())
	}
}

#[derive(Default)]
struct ListerState {
	resources: BTreeMap<(ResourceKind, Option<String>), Vec<PolicyResource>>,
	tenants: Option<Vec<String>>,
	list_calls: usize,
}

/// Serves a fixed set of policy resources.
#[derive(Default)]
pub struct StaticPolicyLister {
	state: Mutex<ListerState>,
}

impl StaticPolicyLister {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces (by name) a resource. Global roles are stored
	/// cluster-wide; everything else under its metadata namespace.
	pub fn upsert(&self, resource: PolicyResource) {
		let kind = resource.kind();
		let namespace = if kind.is_cluster_scoped() {
			None
		} else {
			resource.metadata().namespace.clone()
		};
		let mut state = lock(&self.state);
		let items = state.resources.entry((kind, namespace)).or_default();
		items.retain(|r| r.name() != resource.name());
		items.push(resource);
	}

	pub fn remove(&self, kind: ResourceKind, namespace: Option<&str>, name: &str) {
		let mut state = lock(&self.state);
		if let Some(items) = state
			.resources
			.get_mut(&(kind, namespace.map(str::to_string)))
		{
			items.retain(|r| r.name() != name);
		}
	}

	/// Pins the tenant list. Without it, tenants are the namespaces seen.
	pub fn set_tenants(&self, tenants: &[&str]) {
		lock(&self.state).tenants = Some(tenants.iter().map(|t| t.to_string()).collect());
	}

	pub fn list_calls(&self) -> usize {
		lock(&self.state).list_calls
	}
}

#[async_trait]
impl PolicyLister for StaticPolicyLister {
	async fn list(
		&self,
		kind: ResourceKind,
		namespace: Option<&str>,
		continue_token: Option<&str>,
		limit: u32,
	) -> Result<ResourcePage, ListError> {
		let offset = parse_offset(continue_token).map_err(|message| ListError::Backend {
			kind,
			message,
		})?;
		let mut state = lock(&self.state);
		state.list_calls += 1;

		let key = (kind, namespace.map(str::to_string));
		let items = state.resources.get(&key).map(Vec::as_slice).unwrap_or_default();
		let (end, continue_token) = page_bounds(items.len(), offset, limit);
		let items = items
			.get(offset.min(end)..end)
			.map(<[PolicyResource]>::to_vec)
			.unwrap_or_default();

		Ok(ResourcePage {
			items,
			continue_token,
		})
	}

	async fn list_tenants(&self) -> Result<Vec<String>, ListError> {
		let state = lock(&self.state);
		if let Some(tenants) = &state.tenants {
			return Ok(tenants.clone());
		}
		let tenants: BTreeSet<String> = state
			.resources
			.keys()
			.filter_map(|(_, namespace)| namespace.clone())
			.collect();
		Ok(tenants.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use relsync_core::{Folder, ObjectMeta};

	#[tokio::test]
	async fn store_pages_until_exhausted() {
		let store = MemoryTupleStore::new();
		store.seed(
			"org-1",
			(0..5).map(|i| Tuple::new(format!("user:u{i}"), "member", "team:sre")),
		);
		let id = store.get_or_create("org-1");

		let first = store.read_tuples(&id, None, 2).await.unwrap();
		assert_eq!(first.tuples.len(), 2);
		let second = store
			.read_tuples(&id, first.continue_token.as_deref(), 2)
			.await
			.unwrap();
		let third = store
			.read_tuples(&id, second.continue_token.as_deref(), 2)
			.await
			.unwrap();
		assert_eq!(third.tuples.len(), 1);
		assert_eq!(third.continue_token, None);
	}

	#[tokio::test]
	async fn lister_pages_and_discovers_tenants() {
		let lister = StaticPolicyLister::new();
		for name in ["a", "b", "c"] {
			lister.upsert(PolicyResource::Folder(Folder::new(
				ObjectMeta::namespaced(name, "org-1"),
				None,
			)));
		}
		let page = lister
			.list(ResourceKind::Folder, Some("org-1"), None, 2)
			.await
			.unwrap();
		assert_eq!(page.items.len(), 2);
		assert_eq!(page.continue_token.as_deref(), Some("2"));
		assert_eq!(lister.list_tenants().await.unwrap(), vec!["org-1"]);
	}

	#[tokio::test]
	async fn upsert_replaces_by_name() {
		let lister = StaticPolicyLister::new();
		let meta = ObjectMeta::namespaced("a", "org-1");
		lister.upsert(PolicyResource::Folder(Folder::new(meta.clone(), None)));
		lister.upsert(PolicyResource::Folder(Folder::new(meta, Some("p".into()))));
		let page = lister
			.list(ResourceKind::Folder, Some("org-1"), None, 10)
			.await
			.unwrap();
		assert_eq!(page.items.len(), 1);
	}
}
