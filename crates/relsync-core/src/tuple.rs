// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Relationship tuples and the typed references they are built from.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const TYPE_USER: &str = "user";
pub const TYPE_SERVICE_ACCOUNT: &str = "service-account";
pub const TYPE_TEAM: &str = "team";
pub const TYPE_ROLE: &str = "role";
pub const TYPE_FOLDER: &str = "folder";
pub const TYPE_RESOURCE: &str = "resource";
pub const TYPE_GROUP_RESOURCE: &str = "group_resource";

pub const RELATION_ASSIGNEE: &str = "assignee";
pub const RELATION_MEMBER: &str = "member";
pub const RELATION_ADMIN: &str = "admin";
pub const RELATION_PARENT: &str = "parent";

/// `type:id`
pub fn object_ref(object_type: &str, id: &str) -> String {
	format!("{object_type}:{id}")
}

/// `type:id#relation`, the set of all users holding `relation` on `type:id`.
pub fn userset_ref(object_type: &str, id: &str, relation: &str) -> String {
	format!("{object_type}:{id}#{relation}")
}

/// A parsed `type:id` or `type:id#relation` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedRef<'a> {
	pub object_type: &'a str,
	pub id: &'a str,
	pub relation: Option<&'a str>,
}

impl<'a> TypedRef<'a> {
	/// Parses a reference; returns `None` when the type or id is missing.
	pub fn parse(value: &'a str) -> Option<Self> {
		let (object_type, rest) = value.split_once(':')?;
		let (id, relation) = match rest.rsplit_once('#') {
			Some((id, relation)) => (id, Some(relation)),
			None => (rest, None),
		};
		if object_type.is_empty() || id.is_empty() || relation == Some("") {
			return None;
		}
		Some(Self {
			object_type,
			id,
			relation,
		})
	}
}

/// Identity of a relationship fact. Deletes are expressed with keys only, so
/// they can never carry condition metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TupleKey {
	pub user: String,
	pub relation: String,
	pub object: String,
}

impl TupleKey {
	pub fn new(
		user: impl Into<String>,
		relation: impl Into<String>,
		object: impl Into<String>,
	) -> Self {
		Self {
			user: user.into(),
			relation: relation.into(),
			object: object.into(),
		}
	}
}

impl fmt::Display for TupleKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}#{}@{}", self.object, self.relation, self.user)
	}
}

/// Named condition attached to a stored tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleCondition {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub context: Option<serde_json::Value>,
}

/// A relationship fact as written to or read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
	#[serde(flatten)]
	pub key: TupleKey,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub condition: Option<TupleCondition>,
}

impl Tuple {
	pub fn new(
		user: impl Into<String>,
		relation: impl Into<String>,
		object: impl Into<String>,
	) -> Self {
		Self {
			key: TupleKey::new(user, relation, object),
			condition: None,
		}
	}

	pub fn user(&self) -> &str {
		&self.key.user
	}

	pub fn relation(&self) -> &str {
		&self.key.relation
	}

	pub fn object(&self) -> &str {
		&self.key.object
	}
}

impl From<TupleKey> for Tuple {
	fn from(key: TupleKey) -> Self {
		Self {
			key,
			condition: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_plain_and_userset_refs() {
		let plain = TypedRef::parse("folder:ops").unwrap();
		assert_eq!(plain.object_type, "folder");
		assert_eq!(plain.id, "ops");
		assert_eq!(plain.relation, None);

		let userset = TypedRef::parse("team:sre#member").unwrap();
		assert_eq!(userset.object_type, "team");
		assert_eq!(userset.id, "sre");
		assert_eq!(userset.relation, Some("member"));
	}

	#[test]
	fn resource_ids_may_contain_slashes() {
		let r = TypedRef::parse("resource:dashboards/abc").unwrap();
		assert_eq!(r.id, "dashboards/abc");
	}

	#[test]
	fn rejects_incomplete_refs() {
		assert!(TypedRef::parse("folder").is_none());
		assert!(TypedRef::parse(":ops").is_none());
		assert!(TypedRef::parse("folder:").is_none());
		assert!(TypedRef::parse("team:sre#").is_none());
	}

	#[test]
	fn tuple_serializes_flat_without_condition() {
		let tuple = Tuple::new("user:alice", "assignee", "role:basic_viewer");
		let json = serde_json::to_value(&tuple).unwrap();
		assert_eq!(
			json,
			serde_json::json!({"user": "user:alice", "relation": "assignee", "object": "role:basic_viewer"})
		);
	}

	#[test]
	fn tuple_reads_condition() {
		let tuple: Tuple = serde_json::from_value(serde_json::json!({
			"user": "user:alice",
			"relation": "get",
			"object": "resource:dashboards/a",
			"condition": {"name": "in_hours"}
		}))
		.unwrap();
		assert_eq!(tuple.condition.unwrap().name, "in_hours");
	}

	#[test]
	fn key_display_uses_object_relation_user_order() {
		let key = TupleKey::new("folder:parent", "parent", "folder:child");
		assert_eq!(key.to_string(), "folder:child#parent@folder:parent");
	}
}
