// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::TranslationError;
use crate::resource::Folder;
use crate::tuple::{object_ref, Tuple, RELATION_PARENT, TYPE_FOLDER};

/// A folder with a parent yields `folder:<parent> parent folder:<name>`.
/// Root folders yield nothing.
pub(super) fn translate(folder: &Folder) -> Result<Vec<Tuple>, TranslationError> {
	let name = &folder.metadata.name;
	let parent = match folder.spec.parent.as_deref() {
		None | Some("") => return Ok(Vec::new()),
		Some(parent) => parent,
	};

	if parent == name {
		return Err(TranslationError::SchemaViolation {
			tuple: object_ref(TYPE_FOLDER, name),
			reason: "folder cannot be its own parent".to_string(),
		});
	}

	Ok(vec![Tuple::new(
		object_ref(TYPE_FOLDER, parent),
		RELATION_PARENT,
		object_ref(TYPE_FOLDER, name),
	)])
}
