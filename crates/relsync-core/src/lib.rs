// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the relsync authorization tuple reconciler.
//!
//! This crate provides:
//! - The declarative policy resources that are reconciled ([`PolicyResource`])
//! - Global role permission resolution with inheritance and cycle detection ([`resolve`])
//! - Translation of each policy resource kind into relationship tuples ([`translate`])
//! - Schema type restrictions every produced tuple must satisfy ([`schema`])
//! - The boundary traits for listing resources and reading/writing tuples
//!
//! Everything except the boundary traits is pure: no I/O, no shared state.

pub mod error;
pub mod lister;
pub mod permission;
pub mod resolver;
pub mod resource;
pub mod schema;
pub mod store;
pub mod subject;
pub mod translate;
pub mod tuple;

pub use error::{ResolveError, TranslationError};
pub use lister::{ListError, PolicyLister, ResourcePage};
pub use permission::Permission;
pub use resolver::{resolve, ResolvedPermissions};
pub use resource::{
	Folder, FolderSpec, GlobalRole, GlobalRoleBinding, ObjectMeta, PolicyResource, ResourceKind,
	ResourcePermission, ResourcePermissionEntry, ResourcePermissionSpec, ResourceRef, Role,
	RoleBinding, RoleBindingSpec, RoleRef, RoleSpec, Subject, TeamBinding, TeamBindingSpec,
	TeamPermission, User, UserSpec,
};
pub use store::{StoreError, StoreId, TuplePage, TupleStore};
pub use subject::{BasicRole, SubjectKind};
pub use translate::{cluster_tuples, role_grant_tuples, translate};
pub use tuple::{Tuple, TupleCondition, TupleKey};

/// Normalizes a continuation token: an absent or empty token means the listing is exhausted.
pub fn next_token(token: Option<String>) -> Option<String> {
	token.filter(|t| !t.is_empty())
}
