// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `(action, scope)` grant, e.g. `("dashboards:read", "folders:uid:ops")`.
///
/// Identity is the pair; two permissions with the same action and scope are the
/// same permission regardless of where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
	pub action: String,
	#[serde(default)]
	pub scope: String,
}

impl Permission {
	pub fn new(action: impl Into<String>, scope: impl Into<String>) -> Self {
		Self {
			action: action.into(),
			scope: scope.into(),
		}
	}

	/// The `(action, scope)` key used when merging permission sets.
	pub fn key(&self) -> (String, String) {
		(self.action.clone(), self.scope.clone())
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} on {}", self.action, self.scope)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn equality_is_by_pair() {
		assert_eq!(
			Permission::new("dashboards:read", "dashboards:*"),
			Permission::new("dashboards:read", "dashboards:*")
		);
		assert_ne!(
			Permission::new("dashboards:read", "dashboards:*"),
			Permission::new("dashboards:write", "dashboards:*")
		);
	}

	#[test]
	fn scope_defaults_to_empty() {
		let p: Permission = serde_json::from_str(r#"{"action":"users:read"}"#).unwrap();
		assert_eq!(p.scope, "");
	}
}
