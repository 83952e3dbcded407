// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation of policy resources into relationship tuples.
//!
//! One pure function per resource kind, dispatched over the closed
//! [`PolicyResource`] union. Malformed input (unknown subject kind, unknown
//! role, bad permission syntax) is rejected with a [`TranslationError`] rather
//! than producing a tuple the store would misinterpret.

mod binding;
mod folder;
mod grant;
mod resource_permission;
mod role;
mod team;
mod user;

use crate::error::TranslationError;
use crate::resolver::ResolvedPermissions;
use crate::resource::PolicyResource;
use crate::tuple::Tuple;

pub use grant::role_grant_tuples;

/// Translates one policy resource into the tuples it implies.
///
/// `resolved` is the cluster-scoped global role permission map. Roles with
/// `role_refs` only inherit when it is supplied; without it they fall back to
/// their own permissions.
pub fn translate(
	resource: &PolicyResource,
	resolved: Option<&ResolvedPermissions>,
) -> Result<Vec<Tuple>, TranslationError> {
	if resource.name().is_empty() {
		return Err(TranslationError::MissingField("metadata.name"));
	}

	match resource {
		PolicyResource::Folder(folder) => folder::translate(folder),
		PolicyResource::GlobalRole(global) => {
			role::translate_global(global.name(), &global.spec, resolved)
		}
		PolicyResource::Role(r) => role::translate(&r.metadata.name, &r.spec, resolved),
		PolicyResource::RoleBinding(binding) => binding::translate(&binding.spec),
		PolicyResource::GlobalRoleBinding(binding) => binding::translate(&binding.spec),
		PolicyResource::ResourcePermission(permission) => {
			resource_permission::translate(&permission.spec)
		}
		PolicyResource::TeamBinding(binding) => team::translate(&binding.spec),
		PolicyResource::User(u) => user::translate(u),
	}
}

/// Tuples for every resolved global role, in role name order.
///
/// On failure returns the offending role name with the error.
pub fn cluster_tuples(
	resolved: &ResolvedPermissions,
) -> Result<Vec<Tuple>, (String, TranslationError)> {
	let mut names: Vec<&String> = resolved.keys().collect();
	names.sort();

	let mut tuples = Vec::new();
	for name in names {
		let grants = role_grant_tuples(name, &resolved[name]).map_err(|e| (name.clone(), e))?;
		tuples.extend(grants);
	}
	Ok(tuples)
}
