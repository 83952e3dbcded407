// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::TranslationError;
use crate::resource::User;
use crate::subject::BasicRole;
use crate::tuple::{object_ref, Tuple, RELATION_ASSIGNEE, TYPE_ROLE, TYPE_USER};

/// Assigns the user to their basic role. A user with no role yields nothing.
pub(super) fn translate(user: &User) -> Result<Vec<Tuple>, TranslationError> {
	if user.spec.role.is_empty() {
		return Ok(Vec::new());
	}
	let role: BasicRole = user.spec.role.parse()?;
	Ok(vec![Tuple::new(
		object_ref(TYPE_USER, &user.metadata.name),
		RELATION_ASSIGNEE,
		object_ref(TYPE_ROLE, role.role_id()),
	)])
}
