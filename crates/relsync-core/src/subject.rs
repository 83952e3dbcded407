// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subject kinds and basic roles, and how each is encoded as a tuple user.

use std::fmt;
use std::str::FromStr;

use crate::error::TranslationError;
use crate::tuple::{
	object_ref, userset_ref, RELATION_ASSIGNEE, RELATION_MEMBER, TYPE_ROLE, TYPE_SERVICE_ACCOUNT,
	TYPE_TEAM, TYPE_USER,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
	User,
	ServiceAccount,
	Team,
	BasicRole,
}

impl SubjectKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			SubjectKind::User => "user",
			SubjectKind::ServiceAccount => "service-account",
			SubjectKind::Team => "team",
			SubjectKind::BasicRole => "basic-role",
		}
	}

	/// Encodes `name` as the tuple user for this kind.
	///
	/// Teams become the member set of the team and basic roles the assignee
	/// set of the canonical role, so a single tuple grants to everyone in them.
	pub fn encode(&self, name: &str) -> Result<String, TranslationError> {
		if name.is_empty() {
			return Err(TranslationError::MissingField("subject name"));
		}
		Ok(match self {
			SubjectKind::User => object_ref(TYPE_USER, name),
			SubjectKind::ServiceAccount => object_ref(TYPE_SERVICE_ACCOUNT, name),
			SubjectKind::Team => userset_ref(TYPE_TEAM, name, RELATION_MEMBER),
			SubjectKind::BasicRole => {
				let role: BasicRole = name.parse()?;
				userset_ref(TYPE_ROLE, role.role_id(), RELATION_ASSIGNEE)
			}
		})
	}
}

impl FromStr for SubjectKind {
	type Err = TranslationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"user" => Ok(SubjectKind::User),
			"service-account" => Ok(SubjectKind::ServiceAccount),
			"team" => Ok(SubjectKind::Team),
			"basic-role" => Ok(SubjectKind::BasicRole),
			other => Err(TranslationError::UnknownSubjectKind(other.to_string())),
		}
	}
}

impl fmt::Display for SubjectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Coarse per-user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicRole {
	None,
	Viewer,
	Editor,
	Admin,
}

impl BasicRole {
	/// Canonical internal role identifier, e.g. `basic_viewer`.
	pub fn role_id(&self) -> &'static str {
		match self {
			BasicRole::None => "basic_none",
			BasicRole::Viewer => "basic_viewer",
			BasicRole::Editor => "basic_editor",
			BasicRole::Admin => "basic_admin",
		}
	}
}

impl FromStr for BasicRole {
	type Err = TranslationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"None" => Ok(BasicRole::None),
			"Viewer" => Ok(BasicRole::Viewer),
			"Editor" => Ok(BasicRole::Editor),
			"Admin" => Ok(BasicRole::Admin),
			other => Err(TranslationError::UnknownBasicRole(other.to_string())),
		}
	}
}
