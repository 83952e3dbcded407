// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::TranslationError;
use crate::resource::{TeamBindingSpec, TeamPermission};
use crate::subject::SubjectKind;
use crate::tuple::{object_ref, Tuple, RELATION_ADMIN, RELATION_MEMBER, TYPE_TEAM};

pub(super) fn translate(spec: &TeamBindingSpec) -> Result<Vec<Tuple>, TranslationError> {
	let kind: SubjectKind = spec.subject.kind.parse()?;
	if !matches!(kind, SubjectKind::User | SubjectKind::ServiceAccount) {
		return Err(TranslationError::SubjectKindNotAllowed {
			kind: kind.to_string(),
			context: "team binding",
		});
	}
	if spec.team.is_empty() {
		return Err(TranslationError::MissingField("team"));
	}

	let relation = match spec.permission {
		TeamPermission::Member => RELATION_MEMBER,
		TeamPermission::Admin => RELATION_ADMIN,
	};

	Ok(vec![Tuple::new(
		kind.encode(&spec.subject.name)?,
		relation,
		object_ref(TYPE_TEAM, &spec.team),
	)])
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::Subject;

	fn spec(kind: &str, permission: TeamPermission) -> TeamBindingSpec {
		TeamBindingSpec {
			team: "sre".into(),
			subject: Subject::new(kind, "alice"),
			permission,
		}
	}

	#[test]
	fn member_and_admin_relations() {
		let member = translate(&spec("user", TeamPermission::Member)).unwrap();
		assert_eq!(member, vec![Tuple::new("user:alice", "member", "team:sre")]);

		let admin = translate(&spec("service-account", TeamPermission::Admin)).unwrap();
		assert_eq!(
			admin,
			vec![Tuple::new("service-account:alice", "admin", "team:sre")]
		);
	}

	#[test]
	fn nested_teams_are_not_allowed() {
		assert_eq!(
			translate(&spec("team", TeamPermission::Member)).unwrap_err(),
			TranslationError::SubjectKindNotAllowed {
				kind: "team".into(),
				context: "team binding"
			}
		);
	}
}
