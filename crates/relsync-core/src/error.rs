// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors produced while resolving global role inheritance.
///
/// Both variants abort resolution entirely; no partial permission map is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	#[error("role {role} references unknown role {reference}")]
	UnknownReference { role: String, reference: String },

	/// Every role left unresolved after topological processing, sorted by name.
	#[error("role inheritance cycle detected involving: {}", roles.join(", "))]
	CycleDetected { roles: Vec<String> },
}

/// Errors produced when a single policy resource cannot be turned into tuples.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
	#[error("unknown subject kind: {0}")]
	UnknownSubjectKind(String),

	#[error("subject kind {kind} is not allowed for {context}")]
	SubjectKindNotAllowed { kind: String, context: &'static str },

	#[error("unknown basic role: {0}")]
	UnknownBasicRole(String),

	#[error("role {role} references unknown role {reference}")]
	UnknownRoleRef { role: String, reference: String },

	#[error("malformed permission ({action}, {scope}): {reason}")]
	MalformedPermission {
		action: String,
		scope: String,
		reason: &'static str,
	},

	#[error("unsupported verb {verb} in {context}")]
	UnsupportedVerb { verb: String, context: String },

	#[error("missing field: {0}")]
	MissingField(&'static str),

	#[error("tuple {tuple} violates schema: {reason}")]
	SchemaViolation { tuple: String, reason: String },
}
