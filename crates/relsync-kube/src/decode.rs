// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversion of untyped custom resource objects into [`PolicyResource`]s.

use kube::api::DynamicObject;
use relsync_core::{ListError, PolicyResource, ResourceKind};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

fn typed<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
	serde_json::from_value(value)
}

/// Decodes one listed object as `kind`.
///
/// Only `metadata.name`, `metadata.namespace` and `spec` are read. A missing
/// spec decodes as empty, which is valid for kinds whose fields all default.
pub fn decode(kind: ResourceKind, object: DynamicObject) -> Result<PolicyResource, ListError> {
	let name = object.metadata.name.unwrap_or_default();
	let spec = match object.data.get("spec") {
		Some(Value::Null) | None => json!({}),
		Some(spec) => spec.clone(),
	};
	let value = json!({
		"metadata": {
			"name": name,
			"namespace": object.metadata.namespace,
		},
		"spec": spec,
	});

	let decoded = match kind {
		ResourceKind::Folder => typed(value).map(PolicyResource::Folder),
		ResourceKind::GlobalRole => typed(value).map(PolicyResource::GlobalRole),
		ResourceKind::Role => typed(value).map(PolicyResource::Role),
		ResourceKind::RoleBinding => typed(value).map(PolicyResource::RoleBinding),
		ResourceKind::GlobalRoleBinding => typed(value).map(PolicyResource::GlobalRoleBinding),
		ResourceKind::ResourcePermission => typed(value).map(PolicyResource::ResourcePermission),
		ResourceKind::TeamBinding => typed(value).map(PolicyResource::TeamBinding),
		ResourceKind::User => typed(value).map(PolicyResource::User),
	};

	decoded.map_err(|e| ListError::Decode {
		kind,
		name,
		message: e.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn object(value: Value) -> DynamicObject {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn decodes_role_binding() {
		let obj = object(json!({
			"apiVersion": "iam.relsync.dev/v0alpha1",
			"kind": "RoleBinding",
			"metadata": {"name": "alice-editor", "namespace": "org-1", "resourceVersion": "7"},
			"spec": {
				"subject": {"kind": "user", "name": "alice"},
				"roleRefs": [{"name": "editor"}]
			}
		}));
		match decode(ResourceKind::RoleBinding, obj).unwrap() {
			PolicyResource::RoleBinding(binding) => {
				assert_eq!(binding.metadata.name, "alice-editor");
				assert_eq!(binding.metadata.namespace.as_deref(), Some("org-1"));
				assert_eq!(binding.spec.subject.name, "alice");
				assert_eq!(binding.spec.role_refs.len(), 1);
			}
			other => panic!("unexpected resource: {other:?}"),
		}
	}

	#[test]
	fn missing_spec_is_empty_for_defaulted_kinds() {
		let obj = object(json!({
			"apiVersion": "iam.relsync.dev/v0alpha1",
			"kind": "Folder",
			"metadata": {"name": "root", "namespace": "org-1"}
		}));
		match decode(ResourceKind::Folder, obj).unwrap() {
			PolicyResource::Folder(folder) => assert_eq!(folder.spec.parent, None),
			other => panic!("unexpected resource: {other:?}"),
		}
	}

	#[test]
	fn global_role_reads_camel_case_fields() {
		let obj = object(json!({
			"apiVersion": "iam.relsync.dev/v0alpha1",
			"kind": "GlobalRole",
			"metadata": {"name": "basic_editor"},
			"spec": {
				"roleRefs": [{"name": "basic_viewer"}],
				"permissions": [{"action": "dashboards:write", "scope": "dashboards:*"}],
				"permissionsOmitted": [{"action": "folders:read", "scope": "folders:*"}]
			}
		}));
		match decode(ResourceKind::GlobalRole, obj).unwrap() {
			PolicyResource::GlobalRole(role) => {
				assert_eq!(role.spec.role_refs[0].name, "basic_viewer");
				assert_eq!(role.spec.permissions_omitted.len(), 1);
				assert_eq!(role.metadata.namespace, None);
			}
			other => panic!("unexpected resource: {other:?}"),
		}
	}

	#[test]
	fn invalid_spec_names_the_object() {
		let obj = object(json!({
			"apiVersion": "iam.relsync.dev/v0alpha1",
			"kind": "TeamBinding",
			"metadata": {"name": "broken", "namespace": "org-1"},
			"spec": {"subject": {"kind": "user", "name": "alice"}}
		}));
		match decode(ResourceKind::TeamBinding, obj).unwrap_err() {
			ListError::Decode { kind, name, .. } => {
				assert_eq!(kind, ResourceKind::TeamBinding);
				assert_eq!(name, "broken");
			}
			other => panic!("unexpected error: {other}"),
		}
	}
}
