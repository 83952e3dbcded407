// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tuple store connection section.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const REDACTED: &str = "[REDACTED]";

#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OpenFgaConfigLayer {
	pub url: Option<String>,
	pub api_token: Option<String>,
	pub authorization_model_id: Option<String>,
	pub store_prefix: Option<String>,
	pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for OpenFgaConfigLayer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OpenFgaConfigLayer")
			.field("url", &self.url)
			.field("api_token", &self.api_token.as_ref().map(|_| REDACTED))
			.field("authorization_model_id", &self.authorization_model_id)
			.field("store_prefix", &self.store_prefix)
			.field("request_timeout_secs", &self.request_timeout_secs)
			.finish()
	}
}

impl OpenFgaConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.api_token.is_some() {
			self.api_token = other.api_token;
		}
		if other.authorization_model_id.is_some() {
			self.authorization_model_id = other.authorization_model_id;
		}
		if other.store_prefix.is_some() {
			self.store_prefix = other.store_prefix;
		}
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
	}

	pub fn finalize(self) -> OpenFgaConfig {
		let defaults = OpenFgaConfig::default();
		OpenFgaConfig {
			url: self.url.unwrap_or(defaults.url),
			api_token: self.api_token,
			authorization_model_id: self.authorization_model_id,
			store_prefix: self.store_prefix.unwrap_or(defaults.store_prefix),
			request_timeout_secs: self.request_timeout_secs.unwrap_or(defaults.request_timeout_secs),
		}
	}
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenFgaConfig {
	pub url: String,
	pub api_token: Option<String>,
	pub authorization_model_id: Option<String>,
	pub store_prefix: String,
	pub request_timeout_secs: u64,
}

impl OpenFgaConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
			return Err(ConfigError::InvalidValue {
				key: "openfga.url".to_string(),
				message: format!("'{}' is not an http(s) URL", self.url),
			});
		}
		if self.request_timeout_secs == 0 {
			return Err(ConfigError::Validation(
				"openfga.request_timeout_secs must be greater than zero".to_string(),
			));
		}
		Ok(())
	}
}

impl fmt::Debug for OpenFgaConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OpenFgaConfig")
			.field("url", &self.url)
			.field("api_token", &self.api_token.as_ref().map(|_| REDACTED))
			.field("authorization_model_id", &self.authorization_model_id)
			.field("store_prefix", &self.store_prefix)
			.field("request_timeout_secs", &self.request_timeout_secs)
			.finish()
	}
}

impl Default for OpenFgaConfig {
	fn default() -> Self {
		Self {
			url: "http://localhost:8080".to_string(),
			api_token: None,
			authorization_model_id: None,
			store_prefix: "tenant-".to_string(),
			request_timeout_secs: 10,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_api_token_is_redacted() {
		let config = OpenFgaConfigLayer {
			api_token: Some("super-secret".to_string()),
			..Default::default()
		}
		.finalize();
		let debug = format!("{config:?}");
		assert!(!debug.contains("super-secret"));
		assert!(debug.contains(REDACTED));

		let layer = OpenFgaConfigLayer {
			api_token: Some("super-secret".to_string()),
			..Default::default()
		};
		assert!(!format!("{layer:?}").contains("super-secret"));
	}

	#[test]
	fn test_finalize_defaults() {
		let config = OpenFgaConfigLayer::default().finalize();
		assert_eq!(config.url, "http://localhost:8080");
		assert_eq!(config.store_prefix, "tenant-");
		assert_eq!(config.request_timeout_secs, 10);
		assert!(config.api_token.is_none());
	}

	#[test]
	fn test_validate_rejects_non_http_url() {
		let config = OpenFgaConfig {
			url: "localhost:8080".to_string(),
			..Default::default()
		};
		assert!(matches!(
			config.validate(),
			Err(ConfigError::InvalidValue { .. })
		));
	}
}
