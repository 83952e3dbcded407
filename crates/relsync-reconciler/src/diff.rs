// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use relsync_core::{Tuple, TupleKey};

/// Tuples keyed by their `(user, relation, object)` triple, in key order.
pub type TupleSet = BTreeMap<TupleKey, Tuple>;

/// Changes needed to make the actual set equal the desired set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TupleDiff {
	pub to_add: Vec<Tuple>,
	/// Keys only: deletes never carry condition metadata.
	pub to_delete: Vec<TupleKey>,
}

impl TupleDiff {
	pub fn is_empty(&self) -> bool {
		self.to_add.is_empty() && self.to_delete.is_empty()
	}

	pub fn len(&self) -> usize {
		self.to_add.len() + self.to_delete.len()
	}
}

/// `desired − actual` and `actual − desired` by triple equality.
pub fn diff(desired: &TupleSet, actual: &TupleSet) -> TupleDiff {
	let to_add = desired
		.iter()
		.filter(|(key, _)| !actual.contains_key(*key))
		.map(|(_, tuple)| tuple.clone())
		.collect();
	let to_delete = actual
		.keys()
		.filter(|key| !desired.contains_key(*key))
		.cloned()
		.collect();
	TupleDiff { to_add, to_delete }
}

pub fn tuple_set(tuples: impl IntoIterator<Item = Tuple>) -> TupleSet {
	tuples.into_iter().map(|t| (t.key.clone(), t)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use relsync_core::TupleCondition;

	fn t(user: &str, relation: &str, object: &str) -> Tuple {
		Tuple::new(user, relation, object)
	}

	#[test]
	fn computes_both_directions() {
		let desired = tuple_set([
			t("user:alice", "assignee", "role:basic_viewer"),
			t("folder:a", "parent", "folder:b"),
		]);
		let actual = tuple_set([
			t("folder:a", "parent", "folder:b"),
			t("user:bob", "assignee", "role:basic_admin"),
		]);
		let d = diff(&desired, &actual);
		assert_eq!(d.to_add, vec![t("user:alice", "assignee", "role:basic_viewer")]);
		assert_eq!(
			d.to_delete,
			vec![TupleKey::new("user:bob", "assignee", "role:basic_admin")]
		);
		assert_eq!(d.len(), 2);
	}

	#[test]
	fn identical_sets_have_empty_diff() {
		let set = tuple_set([t("user:alice", "member", "team:sre")]);
		assert!(diff(&set, &set).is_empty());
	}

	#[test]
	fn stored_conditions_do_not_affect_equality_or_deletes() {
		let mut conditional = t("user:bob", "view", "resource:dashboards/a");
		conditional.condition = Some(TupleCondition {
			name: "in_hours".into(),
			context: None,
		});
		let actual = tuple_set([conditional.clone(), t("user:carol", "view", "folder:x")]);
		let desired = tuple_set([t("user:bob", "view", "resource:dashboards/a")]);

		let d = diff(&desired, &actual);
		assert!(d.to_add.is_empty());
		assert_eq!(d.to_delete, vec![TupleKey::new("user:carol", "view", "folder:x")]);
	}

	#[test]
	fn duplicate_desired_tuples_collapse() {
		let desired = tuple_set([
			t("user:alice", "member", "team:sre"),
			t("user:alice", "member", "team:sre"),
		]);
		assert_eq!(diff(&desired, &TupleSet::new()).to_add.len(), 1);
	}
}
