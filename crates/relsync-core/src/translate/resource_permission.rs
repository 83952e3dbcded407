// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::TranslationError;
use crate::resource::{ResourcePermissionSpec, ResourceRef};
use crate::schema::RESOURCE_VERBS;
use crate::subject::SubjectKind;
use crate::tuple::{object_ref, Tuple, TYPE_FOLDER, TYPE_RESOURCE};

fn target(resource: &ResourceRef) -> Result<String, TranslationError> {
	if resource.kind.is_empty() {
		return Err(TranslationError::MissingField("resource.kind"));
	}
	if resource.name.is_empty() {
		return Err(TranslationError::MissingField("resource.name"));
	}
	Ok(if resource.kind == "folders" {
		object_ref(TYPE_FOLDER, &resource.name)
	} else {
		object_ref(
			TYPE_RESOURCE,
			&format!("{}/{}", resource.kind, resource.name),
		)
	})
}

pub(super) fn translate(spec: &ResourcePermissionSpec) -> Result<Vec<Tuple>, TranslationError> {
	let object = target(&spec.resource)?;

	spec.permissions
		.iter()
		.map(|entry| {
			if !RESOURCE_VERBS.contains(&entry.verb.as_str()) {
				return Err(TranslationError::UnsupportedVerb {
					verb: entry.verb.clone(),
					context: "resource permission".to_string(),
				});
			}
			let kind: SubjectKind = entry.kind.parse()?;
			Ok(Tuple::new(
				kind.encode(&entry.name)?,
				entry.verb.as_str(),
				object.clone(),
			))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::ResourcePermissionEntry;

	fn entry(kind: &str, name: &str, verb: &str) -> ResourcePermissionEntry {
		ResourcePermissionEntry {
			kind: kind.into(),
			name: name.into(),
			verb: verb.into(),
		}
	}

	fn spec(kind: &str, name: &str, entries: Vec<ResourcePermissionEntry>) -> ResourcePermissionSpec {
		ResourcePermissionSpec {
			resource: ResourceRef {
				kind: kind.into(),
				name: name.into(),
			},
			permissions: entries,
		}
	}

	#[test]
	fn dashboard_permissions_target_resource_object() {
		let tuples = translate(&spec(
			"dashboards",
			"abc",
			vec![entry("user", "alice", "edit"), entry("team", "sre", "view")],
		))
		.unwrap();
		assert_eq!(
			tuples,
			vec![
				Tuple::new("user:alice", "edit", "resource:dashboards/abc"),
				Tuple::new("team:sre#member", "view", "resource:dashboards/abc"),
			]
		);
	}

	#[test]
	fn folder_permissions_target_folder_object() {
		let tuples = translate(&spec("folders", "ops", vec![entry("basic-role", "Editor", "admin")])).unwrap();
		assert_eq!(
			tuples,
			vec![Tuple::new("role:basic_editor#assignee", "admin", "folder:ops")]
		);
	}

	#[test]
	fn unknown_verb_is_rejected() {
		assert!(matches!(
			translate(&spec("dashboards", "abc", vec![entry("user", "alice", "own")])).unwrap_err(),
			TranslationError::UnsupportedVerb { .. }
		));
	}

	#[test]
	fn missing_resource_name_is_rejected() {
		assert_eq!(
			translate(&spec("dashboards", "", vec![])).unwrap_err(),
			TranslationError::MissingField("resource.name")
		);
	}
}
