// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KubeConfigLayer {
	pub group: Option<String>,
	pub version: Option<String>,
	pub tenant_label_selector: Option<String>,
}

impl KubeConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.group.is_some() {
			self.group = other.group;
		}
		if other.version.is_some() {
			self.version = other.version;
		}
		if other.tenant_label_selector.is_some() {
			self.tenant_label_selector = other.tenant_label_selector;
		}
	}

	pub fn finalize(self) -> KubeConfig {
		let defaults = KubeConfig::default();
		KubeConfig {
			group: self.group.unwrap_or(defaults.group),
			version: self.version.unwrap_or(defaults.version),
			tenant_label_selector: self.tenant_label_selector,
		}
	}
}

/// Where the policy custom resources live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KubeConfig {
	pub group: String,
	pub version: String,
	pub tenant_label_selector: Option<String>,
}

impl Default for KubeConfig {
	fn default() -> Self {
		Self {
			group: "iam.relsync.dev".to_string(),
			version: "v0alpha1".to_string(),
			tenant_label_selector: None,
		}
	}
}
