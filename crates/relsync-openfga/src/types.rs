// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response bodies of the OpenFGA REST API.

use relsync_core::{Tuple, TupleKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
	pub id: String,
	pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListStoresResponse {
	#[serde(default)]
	pub stores: Vec<Store>,
	#[serde(default)]
	pub continuation_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateStoreRequest<'a> {
	pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ReadRequest<'a> {
	pub page_size: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub continuation_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct StoredTuple {
	pub key: Tuple,
}

#[derive(Debug, Deserialize)]
pub struct ReadResponse {
	#[serde(default)]
	pub tuples: Vec<StoredTuple>,
	#[serde(default)]
	pub continuation_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TupleKeys<'a, T> {
	pub tuple_keys: &'a [T],
}

/// Writes and deletes in one atomic request. Empty sides are omitted, since
/// the API rejects an empty `tuple_keys` list.
#[derive(Debug, Serialize)]
pub struct WriteRequest<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub writes: Option<TupleKeys<'a, Tuple>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub deletes: Option<TupleKeys<'a, TupleKey>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authorization_model_id: Option<&'a str>,
}

impl<'a> WriteRequest<'a> {
	pub fn new(
		writes: &'a [Tuple],
		deletes: &'a [TupleKey],
		authorization_model_id: Option<&'a str>,
	) -> Self {
		Self {
			writes: (!writes.is_empty()).then_some(TupleKeys { tuple_keys: writes }),
			deletes: (!deletes.is_empty()).then_some(TupleKeys { tuple_keys: deletes }),
			authorization_model_id,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn write_request_omits_empty_sides() {
		let writes = [Tuple::new("user:alice", "member", "team:sre")];
		let body = serde_json::to_value(WriteRequest::new(&writes, &[], None)).unwrap();
		assert_eq!(
			body,
			json!({"writes": {"tuple_keys": [{"user": "user:alice", "relation": "member", "object": "team:sre"}]}})
		);
	}

	#[test]
	fn read_response_parses_conditions() {
		let body: ReadResponse = serde_json::from_value(json!({
			"tuples": [{
				"key": {
					"user": "user:bob",
					"relation": "view",
					"object": "resource:dashboards/a",
					"condition": {"name": "in_hours", "context": {"tz": "UTC"}}
				},
				"timestamp": "2025-01-01T00:00:00Z"
			}],
			"continuation_token": ""
		}))
		.unwrap();
		assert_eq!(body.tuples.len(), 1);
		assert_eq!(body.tuples[0].key.condition.as_ref().unwrap().name, "in_hours");
	}
}
