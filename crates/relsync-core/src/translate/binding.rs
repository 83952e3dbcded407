// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::TranslationError;
use crate::resource::RoleBindingSpec;
use crate::subject::SubjectKind;
use crate::tuple::{object_ref, Tuple, RELATION_ASSIGNEE, TYPE_ROLE};

/// One `<subject> assignee role:<ref>` tuple per referenced role.
///
/// Shared by namespaced and global role bindings; both assign the subject to
/// roles by name.
pub(super) fn translate(spec: &RoleBindingSpec) -> Result<Vec<Tuple>, TranslationError> {
	let kind: SubjectKind = spec.subject.kind.parse()?;
	let user = kind.encode(&spec.subject.name)?;

	spec.role_refs
		.iter()
		.map(|role_ref| {
			if role_ref.name.is_empty() {
				return Err(TranslationError::MissingField("roleRef.name"));
			}
			Ok(Tuple::new(
				user.clone(),
				RELATION_ASSIGNEE,
				object_ref(TYPE_ROLE, &role_ref.name),
			))
		})
		.collect()
}
