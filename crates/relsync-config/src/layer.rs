// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::sections::{
	KubeConfigLayer, LoggingConfigLayer, OpenFgaConfigLayer, ReconcilerConfigLayer,
};

/// One source's view of the configuration; every field is optional so that
/// sources can be stacked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelsyncConfigLayer {
	#[serde(default)]
	pub reconciler: Option<ReconcilerConfigLayer>,
	#[serde(default)]
	pub openfga: Option<OpenFgaConfigLayer>,
	#[serde(default)]
	pub kube: Option<KubeConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

fn merge_section<T: Default>(target: &mut Option<T>, other: Option<T>, merge: impl FnOnce(&mut T, T)) {
	if let Some(other) = other {
		merge(target.get_or_insert_with(Default::default), other);
	}
}

impl RelsyncConfigLayer {
	/// Overlays `other` on top of `self`; set fields in `other` win.
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.reconciler, other.reconciler, ReconcilerConfigLayer::merge);
		merge_section(&mut self.openfga, other.openfga, OpenFgaConfigLayer::merge);
		merge_section(&mut self.kube, other.kube, KubeConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_keeps_sections_missing_from_overlay() {
		let mut base: RelsyncConfigLayer = toml::from_str(
			r#"
[reconciler]
write_batch_size = 50

[kube]
group = "iam.example.com"
"#,
		)
		.unwrap();
		let overlay: RelsyncConfigLayer = toml::from_str(
			r#"
[reconciler]
dry_run = true
"#,
		)
		.unwrap();

		base.merge(overlay);

		let reconciler = base.reconciler.unwrap();
		assert_eq!(reconciler.write_batch_size, Some(50));
		assert_eq!(reconciler.dry_run, Some(true));
		assert_eq!(base.kube.unwrap().group.as_deref(), Some("iam.example.com"));
	}
}
