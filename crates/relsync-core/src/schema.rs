// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type restrictions of the authorization model.
//!
//! Each `(object type, relation)` pair admits a fixed set of user types, some
//! of them usersets (`team#member`, `role#assignee`). Every tuple produced by
//! translation is checked against this table before it reaches the diff, so a
//! translator bug surfaces as a typed error instead of a rejected write.

use crate::error::TranslationError;
use crate::tuple::{
	Tuple, TypedRef, RELATION_ADMIN, RELATION_ASSIGNEE, RELATION_MEMBER, RELATION_PARENT,
	TYPE_FOLDER, TYPE_GROUP_RESOURCE, TYPE_RESOURCE, TYPE_ROLE, TYPE_SERVICE_ACCOUNT, TYPE_TEAM,
	TYPE_USER,
};

/// A user type admitted on a relation; `relation` is set for usersets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedUser {
	pub user_type: &'static str,
	pub relation: Option<&'static str>,
}

const fn direct(user_type: &'static str) -> AllowedUser {
	AllowedUser {
		user_type,
		relation: None,
	}
}

const fn userset(user_type: &'static str, relation: &'static str) -> AllowedUser {
	AllowedUser {
		user_type,
		relation: Some(relation),
	}
}

const SUBJECTS: &[AllowedUser] = &[
	direct(TYPE_USER),
	direct(TYPE_SERVICE_ACCOUNT),
	userset(TYPE_TEAM, RELATION_MEMBER),
	userset(TYPE_ROLE, RELATION_ASSIGNEE),
];
const TEAM_MEMBERS: &[AllowedUser] = &[direct(TYPE_USER), direct(TYPE_SERVICE_ACCOUNT)];
const ROLE_ASSIGNEES: &[AllowedUser] = &[userset(TYPE_ROLE, RELATION_ASSIGNEE)];
const FOLDERS: &[AllowedUser] = &[direct(TYPE_FOLDER)];

/// Relations a role grant can carry.
pub const GRANT_RELATIONS: &[&str] = &[
	"get",
	"update",
	"create",
	"delete",
	"get_permissions",
	"set_permissions",
];

/// Direct per-resource permission verbs.
pub const RESOURCE_VERBS: &[&str] = &["view", "edit", "admin"];

/// `<kind>_<grant relation>` on a folder, granting on every `<kind>` inside it.
fn is_folder_kind_grant(relation: &str) -> bool {
	GRANT_RELATIONS.iter().any(|grant| {
		relation
			.strip_suffix(grant)
			.and_then(|prefix| prefix.strip_suffix('_'))
			.is_some_and(|kind| !kind.is_empty())
	})
}

/// The user types admitted on `relation` of `object_type`, or `None` when the
/// model does not define that relation.
pub fn allowed_users(object_type: &str, relation: &str) -> Option<&'static [AllowedUser]> {
	match (object_type, relation) {
		(TYPE_ROLE, RELATION_ASSIGNEE) => Some(SUBJECTS),
		(TYPE_TEAM, RELATION_MEMBER | RELATION_ADMIN) => Some(TEAM_MEMBERS),
		(TYPE_FOLDER, RELATION_PARENT) => Some(FOLDERS),
		(TYPE_FOLDER | TYPE_RESOURCE, r) if RESOURCE_VERBS.contains(&r) => Some(SUBJECTS),
		(TYPE_FOLDER | TYPE_RESOURCE | TYPE_GROUP_RESOURCE, r) if GRANT_RELATIONS.contains(&r) => {
			Some(ROLE_ASSIGNEES)
		}
		(TYPE_FOLDER, r) if is_folder_kind_grant(r) => Some(ROLE_ASSIGNEES),
		_ => None,
	}
}

/// Checks a tuple against the type restrictions.
pub fn validate(tuple: &Tuple) -> Result<(), TranslationError> {
	let violation = |reason: String| TranslationError::SchemaViolation {
		tuple: tuple.key.to_string(),
		reason,
	};

	let object = TypedRef::parse(tuple.object())
		.filter(|o| o.relation.is_none())
		.ok_or_else(|| violation("object must be <type>:<id>".to_string()))?;
	let user = TypedRef::parse(tuple.user())
		.ok_or_else(|| violation("user must be <type>:<id> or <type>:<id>#<relation>".to_string()))?;

	let allowed = allowed_users(object.object_type, tuple.relation()).ok_or_else(|| {
		violation(format!(
			"relation {} is not defined on type {}",
			tuple.relation(),
			object.object_type
		))
	})?;

	if allowed
		.iter()
		.any(|a| a.user_type == user.object_type && a.relation == user.relation)
	{
		Ok(())
	} else {
		let user_type = match user.relation {
			Some(relation) => format!("{}#{relation}", user.object_type),
			None => user.object_type.to_string(),
		};
		Err(violation(format!(
			"{user_type} may not hold {} on {}",
			tuple.relation(),
			object.object_type
		)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ok(user: &str, relation: &str, object: &str) {
		let tuple = Tuple::new(user, relation, object);
		assert!(validate(&tuple).is_ok(), "{} should be valid", tuple.key);
	}

	fn rejected(user: &str, relation: &str, object: &str) {
		let tuple = Tuple::new(user, relation, object);
		assert!(
			matches!(validate(&tuple), Err(TranslationError::SchemaViolation { .. })),
			"{} should be rejected",
			tuple.key
		);
	}

	#[test]
	fn accepts_every_translated_shape() {
		ok("folder:parent", "parent", "folder:child");
		ok("role:editor#assignee", "update", "folder:ops");
		ok("role:editor#assignee", "dashboards_delete", "folder:ops");
		ok("role:editor#assignee", "get_permissions", "resource:dashboards/abc");
		ok("role:editor#assignee", "create", "group_resource:dashboards");
		ok("user:alice", "assignee", "role:editor");
		ok("team:sre#member", "assignee", "role:editor");
		ok("role:basic_viewer#assignee", "assignee", "role:dash-reader");
		ok("service-account:ci", "view", "resource:dashboards/abc");
		ok("team:sre#member", "admin", "folder:ops");
		ok("user:alice", "member", "team:sre");
		ok("service-account:ci", "admin", "team:sre");
	}

	#[test]
	fn rejects_wrong_user_types() {
		rejected("user:alice", "parent", "folder:child");
		rejected("user:alice", "get", "group_resource:dashboards");
		rejected("team:sre#member", "member", "team:platform");
		rejected("team:sre", "assignee", "role:editor");
		rejected("role:editor", "view", "folder:ops");
	}

	#[test]
	fn rejects_undefined_relations() {
		rejected("user:alice", "owner", "folder:ops");
		rejected("role:editor#assignee", "view", "group_resource:dashboards");
		rejected("role:editor#assignee", "_get", "folder:ops");
		rejected("user:alice", "assignee", "widget:x");
	}

	#[test]
	fn rejects_malformed_refs() {
		rejected("alice", "assignee", "role:editor");
		rejected("user:alice", "assignee", "role:editor#assignee");
	}
}
