// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Global role permission resolution.
//!
//! Roles form a dependency graph where a derived role depends on every role it
//! names in `role_refs`. The graph is processed with Kahn's algorithm: roles
//! with no outstanding dependencies are resolved first, and resolving a role
//! releases the roles waiting on it. Anything still unresolved when the queue
//! drains is on, or depends on, a cycle. A self-reference is simply a cycle of
//! length one.
//!
//! The effective set is a set union with overrides, so the result does not
//! depend on map iteration order even though the processing order may vary.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::error::ResolveError;
use crate::permission::Permission;
use crate::resource::GlobalRole;

/// Role name to its effective permissions, sorted by `(action, scope)`.
pub type ResolvedPermissions = HashMap<String, Vec<Permission>>;

/// Resolves the effective permission set of every role in `all_roles`.
///
/// Keys of `all_roles` are the role names that `role_refs` point at.
#[instrument(level = "debug", skip_all, fields(roles = all_roles.len()))]
pub fn resolve(all_roles: &HashMap<String, GlobalRole>) -> Result<ResolvedPermissions, ResolveError> {
	let mut names: Vec<&str> = all_roles.keys().map(String::as_str).collect();
	names.sort_unstable();

	let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(all_roles.len());
	let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

	for name in &names {
		let role = &all_roles[*name];
		for role_ref in &role.spec.role_refs {
			if !all_roles.contains_key(&role_ref.name) {
				return Err(ResolveError::UnknownReference {
					role: name.to_string(),
					reference: role_ref.name.clone(),
				});
			}
			dependents
				.entry(role_ref.name.as_str())
				.or_default()
				.push(*name);
		}
		in_degree.insert(*name, role.spec.role_refs.len());
	}

	let mut queue: VecDeque<&str> = names
		.iter()
		.copied()
		.filter(|name| in_degree[name] == 0)
		.collect();

	let mut resolved = ResolvedPermissions::with_capacity(all_roles.len());

	while let Some(name) = queue.pop_front() {
		let role = &all_roles[name];
		let inherited = role
			.spec
			.role_refs
			.iter()
			.filter_map(|r| resolved.get(&r.name))
			.flatten();
		let effective = compose(inherited, &role.spec.permissions_omitted, &role.spec.permissions);
		resolved.insert(name.to_string(), effective);

		if let Some(waiting) = dependents.get(name) {
			for dependent in waiting {
				if let Some(degree) = in_degree.get_mut(dependent) {
					*degree -= 1;
					if *degree == 0 {
						queue.push_back(*dependent);
					}
				}
			}
		}
	}

	if resolved.len() < all_roles.len() {
		let roles: Vec<String> = names
			.into_iter()
			.filter(|name| !resolved.contains_key(*name))
			.map(str::to_string)
			.collect();
		return Err(ResolveError::CycleDetected { roles });
	}

	debug!(resolved = resolved.len(), "resolved global role permissions");
	Ok(resolved)
}

/// Union of `inherited` minus `omitted`, then `own` merged in on top.
///
/// Keyed by `(action, scope)`, so a permission reached through several
/// inheritance paths appears once, and an own permission always replaces an
/// inherited one with the same key.
pub(crate) fn compose<'a>(
	inherited: impl IntoIterator<Item = &'a Permission>,
	omitted: &[Permission],
	own: &[Permission],
) -> Vec<Permission> {
	let omitted: HashSet<&Permission> = omitted.iter().collect();
	let mut effective: BTreeMap<(String, String), Permission> = inherited
		.into_iter()
		.filter(|p| !omitted.contains(p))
		.map(|p| (p.key(), p.clone()))
		.collect();

	for permission in own {
		effective.insert(permission.key(), permission.clone());
	}

	effective.into_values().collect()
}
