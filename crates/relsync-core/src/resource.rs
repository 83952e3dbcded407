// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Declarative policy resources read by the reconciler.
//!
//! The shapes mirror the Kubernetes-style objects they are stored as: a
//! [`ObjectMeta`] with name and namespace plus a kind-specific `spec`. Fields
//! that are validated during translation (subject kinds, verbs, basic role
//! names) are kept as raw strings so a bad value surfaces as a typed
//! [`TranslationError`](crate::TranslationError) naming the resource rather
//! than as a decode failure of the whole page.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::permission::Permission;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub namespace: Option<String>,
}

impl ObjectMeta {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			namespace: None,
		}
	}

	pub fn namespaced(name: impl Into<String>, namespace: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			namespace: Some(namespace.into()),
		}
	}
}

/// Every resource kind the reconciler lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
	Folder,
	GlobalRole,
	Role,
	RoleBinding,
	GlobalRoleBinding,
	ResourcePermission,
	TeamBinding,
	User,
}

impl ResourceKind {
	/// Namespace-scoped kinds, in the order a tenant pass lists them.
	pub const NAMESPACED: [ResourceKind; 7] = [
		ResourceKind::Folder,
		ResourceKind::Role,
		ResourceKind::RoleBinding,
		ResourceKind::GlobalRoleBinding,
		ResourceKind::ResourcePermission,
		ResourceKind::TeamBinding,
		ResourceKind::User,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ResourceKind::Folder => "Folder",
			ResourceKind::GlobalRole => "GlobalRole",
			ResourceKind::Role => "Role",
			ResourceKind::RoleBinding => "RoleBinding",
			ResourceKind::GlobalRoleBinding => "GlobalRoleBinding",
			ResourceKind::ResourcePermission => "ResourcePermission",
			ResourceKind::TeamBinding => "TeamBinding",
			ResourceKind::User => "User",
		}
	}

	/// Lowercase plural used in API paths.
	pub fn plural(&self) -> &'static str {
		match self {
			ResourceKind::Folder => "folders",
			ResourceKind::GlobalRole => "globalroles",
			ResourceKind::Role => "roles",
			ResourceKind::RoleBinding => "rolebindings",
			ResourceKind::GlobalRoleBinding => "globalrolebindings",
			ResourceKind::ResourcePermission => "resourcepermissions",
			ResourceKind::TeamBinding => "teambindings",
			ResourceKind::User => "users",
		}
	}

	pub fn is_cluster_scoped(&self) -> bool {
		matches!(self, ResourceKind::GlobalRole)
	}
}

impl fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A named reference from a role or binding to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
	pub name: String,
}

impl RoleRef {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

/// The subject of a binding or grant. `kind` is one of `user`,
/// `service-account`, `team` or `basic-role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
	pub kind: String,
	pub name: String,
}

impl Subject {
	pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			name: name.into(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
	pub metadata: ObjectMeta,
	#[serde(default)]
	pub spec: FolderSpec,
}

impl Folder {
	pub fn new(metadata: ObjectMeta, parent: Option<String>) -> Self {
		Self {
			metadata,
			spec: FolderSpec { parent },
		}
	}
}

/// Shared spec for [`GlobalRole`] and [`Role`].
///
/// With no `role_refs` the role is custom and `permissions` is its complete set.
/// With `role_refs` it is derived: the union of the referenced roles' permissions,
/// minus `permissions_omitted`, plus `permissions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
	#[serde(default)]
	pub permissions: Vec<Permission>,
	#[serde(default)]
	pub permissions_omitted: Vec<Permission>,
	#[serde(default)]
	pub role_refs: Vec<RoleRef>,
}

/// Cluster-scoped composable permission bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalRole {
	pub metadata: ObjectMeta,
	#[serde(default)]
	pub spec: RoleSpec,
}

impl GlobalRole {
	/// Creates a custom role with the given permissions.
	pub fn custom(name: impl Into<String>, permissions: Vec<Permission>) -> Self {
		Self {
			metadata: ObjectMeta::new(name),
			spec: RoleSpec {
				permissions,
				..Default::default()
			},
		}
	}

	/// Creates a derived role inheriting from `role_refs`.
	pub fn derived(
		name: impl Into<String>,
		role_refs: &[&str],
		permissions: Vec<Permission>,
		permissions_omitted: Vec<Permission>,
	) -> Self {
		Self {
			metadata: ObjectMeta::new(name),
			spec: RoleSpec {
				permissions,
				permissions_omitted,
				role_refs: role_refs.iter().map(|r| RoleRef::new(*r)).collect(),
			},
		}
	}

	pub fn name(&self) -> &str {
		&self.metadata.name
	}
}

/// Namespace-scoped role; may inherit from global roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
	pub metadata: ObjectMeta,
	#[serde(default)]
	pub spec: RoleSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBindingSpec {
	pub subject: Subject,
	#[serde(default)]
	pub role_refs: Vec<RoleRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
	pub metadata: ObjectMeta,
	pub spec: RoleBindingSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalRoleBinding {
	pub metadata: ObjectMeta,
	pub spec: RoleBindingSpec,
}

/// The concrete resource instance a [`ResourcePermission`] grants on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
	/// Plural resource kind, e.g. `dashboards` or `folders`.
	pub kind: String,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePermissionEntry {
	/// Subject kind, as for [`Subject::kind`].
	pub kind: String,
	pub name: String,
	/// `view`, `edit` or `admin`.
	pub verb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePermissionSpec {
	pub resource: ResourceRef,
	#[serde(default)]
	pub permissions: Vec<ResourcePermissionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePermission {
	pub metadata: ObjectMeta,
	pub spec: ResourcePermissionSpec,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamPermission {
	#[default]
	Member,
	Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBindingSpec {
	pub team: String,
	pub subject: Subject,
	#[serde(default)]
	pub permission: TeamPermission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBinding {
	pub metadata: ObjectMeta,
	pub spec: TeamBindingSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpec {
	/// Basic role name (`Viewer`, `Editor`, ...). Empty means no basic role.
	#[serde(default)]
	pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub metadata: ObjectMeta,
	#[serde(default)]
	pub spec: UserSpec,
}

/// Tagged union over every policy resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyResource {
	Folder(Folder),
	GlobalRole(GlobalRole),
	Role(Role),
	RoleBinding(RoleBinding),
	GlobalRoleBinding(GlobalRoleBinding),
	ResourcePermission(ResourcePermission),
	TeamBinding(TeamBinding),
	User(User),
}

impl PolicyResource {
	pub fn kind(&self) -> ResourceKind {
		match self {
			PolicyResource::Folder(_) => ResourceKind::Folder,
			PolicyResource::GlobalRole(_) => ResourceKind::GlobalRole,
			PolicyResource::Role(_) => ResourceKind::Role,
			PolicyResource::RoleBinding(_) => ResourceKind::RoleBinding,
			PolicyResource::GlobalRoleBinding(_) => ResourceKind::GlobalRoleBinding,
			PolicyResource::ResourcePermission(_) => ResourceKind::ResourcePermission,
			PolicyResource::TeamBinding(_) => ResourceKind::TeamBinding,
			PolicyResource::User(_) => ResourceKind::User,
		}
	}

	pub fn metadata(&self) -> &ObjectMeta {
		match self {
			PolicyResource::Folder(r) => &r.metadata,
			PolicyResource::GlobalRole(r) => &r.metadata,
			PolicyResource::Role(r) => &r.metadata,
			PolicyResource::RoleBinding(r) => &r.metadata,
			PolicyResource::GlobalRoleBinding(r) => &r.metadata,
			PolicyResource::ResourcePermission(r) => &r.metadata,
			PolicyResource::TeamBinding(r) => &r.metadata,
			PolicyResource::User(r) => &r.metadata,
		}
	}

	pub fn name(&self) -> &str {
		&self.metadata().name
	}
}
