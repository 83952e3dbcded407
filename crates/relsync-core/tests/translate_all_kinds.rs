// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use relsync_core::schema::validate;
use relsync_core::{
	cluster_tuples, resolve, translate, Folder, GlobalRole, GlobalRoleBinding, ObjectMeta,
	Permission, PolicyResource, ResourcePermission, ResourcePermissionEntry,
	ResourcePermissionSpec, ResourceRef, Role, RoleBinding, RoleBindingSpec, RoleRef, RoleSpec,
	Subject, TeamBinding, TeamBindingSpec, TeamPermission, Tuple, User, UserSpec,
};

const TENANT: &str = "org-1";

fn meta(name: &str) -> ObjectMeta {
	ObjectMeta::namespaced(name, TENANT)
}

fn globals() -> HashMap<String, GlobalRole> {
	[
		GlobalRole::custom(
			"basic_viewer",
			vec![
				Permission::new("dashboards:read", "dashboards:*"),
				Permission::new("folders:read", "folders:*"),
			],
		),
		GlobalRole::derived(
			"basic_editor",
			&["basic_viewer"],
			vec![Permission::new("dashboards:write", "dashboards:*")],
			vec![],
		),
	]
	.into_iter()
	.map(|r| (r.name().to_string(), r))
	.collect()
}

fn tenant_resources() -> Vec<PolicyResource> {
	vec![
		PolicyResource::Folder(Folder::new(meta("ops"), None)),
		PolicyResource::Folder(Folder::new(meta("ops-alerts"), Some("ops".into()))),
		PolicyResource::Role(Role {
			metadata: meta("folder-editor"),
			spec: RoleSpec {
				permissions: vec![Permission::new("dashboards:delete", "folders:uid:ops")],
				permissions_omitted: vec![Permission::new("folders:read", "folders:*")],
				role_refs: vec![RoleRef::new("basic_viewer")],
			},
		}),
		PolicyResource::RoleBinding(RoleBinding {
			metadata: meta("alice-folder-editor"),
			spec: RoleBindingSpec {
				subject: Subject::new("user", "alice"),
				role_refs: vec![RoleRef::new("folder-editor")],
			},
		}),
		PolicyResource::GlobalRoleBinding(GlobalRoleBinding {
			metadata: meta("sre-editor"),
			spec: RoleBindingSpec {
				subject: Subject::new("team", "sre"),
				role_refs: vec![RoleRef::new("basic_editor")],
			},
		}),
		PolicyResource::ResourcePermission(ResourcePermission {
			metadata: meta("dash-abc"),
			spec: ResourcePermissionSpec {
				resource: ResourceRef {
					kind: "dashboards".into(),
					name: "abc".into(),
				},
				permissions: vec![ResourcePermissionEntry {
					kind: "service-account".into(),
					name: "ci".into(),
					verb: "view".into(),
				}],
			},
		}),
		PolicyResource::TeamBinding(TeamBinding {
			metadata: meta("alice-sre"),
			spec: TeamBindingSpec {
				team: "sre".into(),
				subject: Subject::new("user", "alice"),
				permission: TeamPermission::Admin,
			},
		}),
		PolicyResource::User(User {
			metadata: meta("alice"),
			spec: UserSpec {
				role: "Viewer".into(),
			},
		}),
		PolicyResource::User(User {
			metadata: meta("bob"),
			spec: UserSpec::default(),
		}),
	]
}

fn all_tuples() -> Vec<Tuple> {
	let resolved = resolve(&globals()).unwrap();
	let mut tuples = cluster_tuples(&resolved).unwrap();
	for resource in tenant_resources() {
		tuples.extend(translate(&resource, Some(&resolved)).unwrap());
	}
	tuples
}

#[test]
fn every_translated_tuple_satisfies_the_schema() {
	for tuple in all_tuples() {
		validate(&tuple).unwrap_or_else(|e| panic!("{e}"));
	}
}

#[test]
fn expected_tuples_are_present() {
	let tuples = all_tuples();
	let expect = [
		("folder:ops", "parent", "folder:ops-alerts"),
		("role:folder-editor#assignee", "dashboards_delete", "folder:ops"),
		("role:folder-editor#assignee", "get", "group_resource:dashboards"),
		("user:alice", "assignee", "role:folder-editor"),
		("team:sre#member", "assignee", "role:basic_editor"),
		("service-account:ci", "view", "resource:dashboards/abc"),
		("user:alice", "admin", "team:sre"),
		("user:alice", "assignee", "role:basic_viewer"),
		("role:basic_editor#assignee", "update", "group_resource:dashboards"),
	];
	for (user, relation, object) in expect {
		assert!(
			tuples.contains(&Tuple::new(user, relation, object)),
			"missing {object}#{relation}@{user}"
		);
	}
}

#[test]
fn omitted_inherited_permission_is_not_granted() {
	let tuples = all_tuples();
	assert!(!tuples.contains(&Tuple::new(
		"role:folder-editor#assignee",
		"get",
		"group_resource:folders"
	)));
}

#[test]
fn user_without_role_contributes_nothing() {
	let resolved = resolve(&globals()).unwrap();
	let bob = PolicyResource::User(User {
		metadata: meta("bob"),
		spec: UserSpec::default(),
	});
	assert!(translate(&bob, Some(&resolved)).unwrap().is_empty());
}
