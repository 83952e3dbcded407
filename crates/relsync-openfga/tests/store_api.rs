// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use relsync_core::{StoreError, StoreId, Tuple, TupleKey, TupleStore};
use relsync_openfga::{OpenFgaClient, RetryConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryConfig {
	RetryConfig {
		max_attempts: 3,
		base_delay: Duration::from_millis(1),
		max_delay: Duration::from_millis(5),
		backoff_factor: 2.0,
		jitter: false,
	}
}

fn client(server: &MockServer) -> OpenFgaClient {
	OpenFgaClient::new(server.uri(), Duration::from_secs(5))
		.unwrap()
		.with_retry_config(fast_retry())
}

#[tokio::test]
async fn finds_existing_store_across_pages_and_caches_it() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/stores"))
		.and(query_param("continuation_token", "page-2"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"stores": [{"id": "01STORE", "name": "tenant-org-1"}],
			"continuation_token": ""
		})))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/stores"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"stores": [{"id": "01OTHER", "name": "tenant-org-9"}],
			"continuation_token": "page-2"
		})))
		.expect(1)
		.mount(&server)
		.await;

	let client = client(&server);
	let first = client.get_or_create_store("org-1").await.unwrap();
	let second = client.get_or_create_store("org-1").await.unwrap();
	assert_eq!(first, StoreId::new("01STORE"));
	assert_eq!(first, second);
}

#[tokio::test]
async fn creates_missing_store() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/stores"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"stores": []})))
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/stores"))
		.and(body_json(json!({"name": "tenant-org-2"})))
		.respond_with(
			ResponseTemplate::new(201).set_body_json(json!({"id": "01NEW", "name": "tenant-org-2"})),
		)
		.expect(1)
		.mount(&server)
		.await;

	let id = client(&server).get_or_create_store("org-2").await.unwrap();
	assert_eq!(id.as_str(), "01NEW");
}

#[tokio::test]
async fn reads_page_with_token_and_bearer_auth() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/stores/01STORE/read"))
		.and(header("authorization", "Bearer t0ken"))
		.and(body_json(json!({"page_size": 50, "continuation_token": "abc"})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"tuples": [
				{"key": {"user": "user:alice", "relation": "member", "object": "team:sre"}},
				{"key": {
					"user": "user:bob",
					"relation": "view",
					"object": "resource:dashboards/a",
					"condition": {"name": "in_hours"}
				}}
			],
			"continuation_token": "def"
		})))
		.mount(&server)
		.await;

	let client = client(&server).with_api_token("t0ken");
	let page = client
		.read_tuples(&StoreId::new("01STORE"), Some("abc"), 50)
		.await
		.unwrap();
	assert_eq!(page.tuples.len(), 2);
	assert_eq!(page.tuples[0], Tuple::new("user:alice", "member", "team:sre"));
	assert!(page.tuples[1].condition.is_some());
	assert_eq!(page.continue_token.as_deref(), Some("def"));
}

#[tokio::test]
async fn read_retries_transient_failures() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/stores/s/read"))
		.respond_with(ResponseTemplate::new(503))
		.up_to_n_times(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/stores/s/read"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"tuples": []})))
		.mount(&server)
		.await;

	let page = client(&server)
		.read_tuples(&StoreId::new("s"), None, 100)
		.await
		.unwrap();
	assert!(page.tuples.is_empty());
	assert_eq!(page.continue_token, None);
}

#[tokio::test]
async fn write_sends_keys_only_deletes_and_model_id() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/stores/s/write"))
		.and(body_json(json!({
			"writes": {"tuple_keys": [{"user": "user:alice", "relation": "member", "object": "team:sre"}]},
			"deletes": {"tuple_keys": [{"user": "user:bob", "relation": "view", "object": "folder:x"}]},
			"authorization_model_id": "01MODEL"
		})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
		.expect(1)
		.mount(&server)
		.await;

	client(&server)
		.with_authorization_model_id("01MODEL")
		.write_tuples(
			&StoreId::new("s"),
			&[Tuple::new("user:alice", "member", "team:sre")],
			&[TupleKey::new("user:bob", "view", "folder:x")],
		)
		.await
		.unwrap();
}

#[tokio::test]
async fn write_failures_are_not_retried() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/stores/s/write"))
		.respond_with(ResponseTemplate::new(500).set_body_string("boom"))
		.expect(1)
		.mount(&server)
		.await;

	let err = client(&server)
		.write_tuples(&StoreId::new("s"), &[Tuple::new("user:a", "member", "team:b")], &[])
		.await
		.unwrap_err();
	assert!(matches!(err, StoreError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/stores/s/read"))
		.respond_with(ResponseTemplate::new(401))
		.expect(1)
		.mount(&server)
		.await;

	let err = client(&server)
		.read_tuples(&StoreId::new("s"), None, 10)
		.await
		.unwrap_err();
	assert!(matches!(err, StoreError::Rejected { status: 401, .. }));
}
