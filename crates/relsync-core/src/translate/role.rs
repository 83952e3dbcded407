// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tracing::debug;

use crate::error::TranslationError;
use crate::permission::Permission;
use crate::resolver::{compose, ResolvedPermissions};
use crate::resource::RoleSpec;
use crate::tuple::Tuple;

use super::grant::role_grant_tuples;

/// Grant tuples for a namespaced role's effective permissions.
///
/// The set is always composed from the role's own spec; referenced global
/// roles must all be present in `resolved`. A global role sharing the role's
/// name has no effect.
pub(super) fn translate(
	name: &str,
	spec: &RoleSpec,
	resolved: Option<&ResolvedPermissions>,
) -> Result<Vec<Tuple>, TranslationError> {
	let permissions = effective_permissions(name, spec, resolved)?;
	role_grant_tuples(name, &permissions)
}

/// Grant tuples for a global role, taken from its resolved set when present.
pub(super) fn translate_global(
	name: &str,
	spec: &RoleSpec,
	resolved: Option<&ResolvedPermissions>,
) -> Result<Vec<Tuple>, TranslationError> {
	match resolved.and_then(|r| r.get(name)) {
		Some(permissions) => role_grant_tuples(name, permissions),
		None => translate(name, spec, resolved),
	}
}

fn effective_permissions(
	name: &str,
	spec: &RoleSpec,
	resolved: Option<&ResolvedPermissions>,
) -> Result<Vec<Permission>, TranslationError> {
	if spec.role_refs.is_empty() {
		return Ok(compose(&[] as &[Permission], &[], &spec.permissions));
	}

	let Some(resolved) = resolved else {
		debug!(
			role = %name,
			role_refs = spec.role_refs.len(),
			"no resolved global roles available, using own permissions only"
		);
		return Ok(compose(&[] as &[Permission], &[], &spec.permissions));
	};

	let mut inherited = Vec::new();
	for role_ref in &spec.role_refs {
		let permissions =
			resolved
				.get(&role_ref.name)
				.ok_or_else(|| TranslationError::UnknownRoleRef {
					role: name.to_string(),
					reference: role_ref.name.clone(),
				})?;
		inherited.extend(permissions.iter());
	}

	Ok(compose(
		inherited,
		&spec.permissions_omitted,
		&spec.permissions,
	))
}
