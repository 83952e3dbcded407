// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mapping of `(action, scope)` permissions onto role grant tuples.
//!
//! Actions are `<kind>:<verb>`. A kind ending in `.permissions` refers to the
//! permissions of the base kind (`dashboards.permissions:read`). The scope
//! picks the object the grant lands on:
//!
//! | scope | object | relation |
//! |---|---|---|
//! | empty, `*`, `<kind>:*`, `<kind>:<attr>:*` | `group_resource:<kind>` | verb |
//! | `folders:<attr>:<id>`, action on folders | `folder:<id>` | verb |
//! | `folders:<attr>:<id>`, action on another kind | `folder:<id>` | `<kind>_<verb>` |
//! | `<kind>:<attr>:<id>` | `resource:<kind>/<id>` | verb |

use crate::error::TranslationError;
use crate::permission::Permission;
use crate::tuple::{
	object_ref, userset_ref, Tuple, RELATION_ASSIGNEE, TYPE_FOLDER, TYPE_GROUP_RESOURCE,
	TYPE_RESOURCE, TYPE_ROLE,
};

const FOLDERS_KIND: &str = "folders";
const PERMISSIONS_SUFFIX: &str = ".permissions";

fn verb_relation(verb: &str) -> Option<&'static str> {
	match verb {
		"read" => Some("get"),
		"write" => Some("update"),
		"create" => Some("create"),
		"delete" => Some("delete"),
		_ => None,
	}
}

fn permissions_relation(verb: &str) -> Option<&'static str> {
	match verb {
		"read" => Some("get_permissions"),
		"write" => Some("set_permissions"),
		_ => None,
	}
}

/// One grant tuple per permission, all held by the assignees of `role`.
pub fn role_grant_tuples(
	role: &str,
	permissions: &[Permission],
) -> Result<Vec<Tuple>, TranslationError> {
	permissions
		.iter()
		.map(|permission| grant_tuple(role, permission))
		.collect()
}

pub(crate) fn grant_tuple(role: &str, permission: &Permission) -> Result<Tuple, TranslationError> {
	let malformed = |reason: &'static str| TranslationError::MalformedPermission {
		action: permission.action.clone(),
		scope: permission.scope.clone(),
		reason,
	};

	let (kind, verb) = permission
		.action
		.rsplit_once(':')
		.filter(|(kind, verb)| !kind.is_empty() && !verb.is_empty())
		.ok_or_else(|| malformed("action must be <kind>:<verb>"))?;

	let (kind, relation) = match kind.strip_suffix(PERMISSIONS_SUFFIX) {
		Some(base) if !base.is_empty() => (base, permissions_relation(verb)),
		_ => (kind, verb_relation(verb)),
	};
	let relation = relation.ok_or_else(|| TranslationError::UnsupportedVerb {
		verb: verb.to_string(),
		context: permission.action.clone(),
	})?;

	let (object, relation) = grant_target(kind, relation, &permission.scope)
		.ok_or_else(|| malformed("scope must be *, <kind>:* or <kind>:<attribute>:<id>"))?;

	Ok(Tuple::new(
		userset_ref(TYPE_ROLE, role, RELATION_ASSIGNEE),
		relation,
		object,
	))
}

fn grant_target(kind: &str, relation: &str, scope: &str) -> Option<(String, String)> {
	let everything = || Some((object_ref(TYPE_GROUP_RESOURCE, kind), relation.to_string()));

	if scope.is_empty() || scope == "*" {
		return everything();
	}

	let mut parts = scope.splitn(3, ':');
	let scope_kind = parts.next().filter(|s| !s.is_empty())?;
	let attribute = parts.next()?;

	match parts.next() {
		None if attribute == "*" => everything(),
		Some("*") if !attribute.is_empty() => everything(),
		Some(id) if !attribute.is_empty() && !id.is_empty() => {
			if scope_kind == FOLDERS_KIND {
				let relation = if kind == FOLDERS_KIND {
					relation.to_string()
				} else {
					format!("{kind}_{relation}")
				};
				Some((object_ref(TYPE_FOLDER, id), relation))
			} else {
				Some((
					object_ref(TYPE_RESOURCE, &format!("{scope_kind}/{id}")),
					relation.to_string(),
				))
			}
		}
		_ => None,
	}
}
