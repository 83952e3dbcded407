// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use relsync_common_http::{is_retryable_status, RetryableError};
use relsync_core::StoreError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenFgaError {
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("request timed out")]
	Timeout,

	#[error("unauthorized")]
	Unauthorized,

	#[error("rate limited")]
	RateLimited,

	#[error("invalid response from OpenFGA: {0}")]
	InvalidResponse(String),

	#[error("OpenFGA API error: {status} - {message}")]
	ApiError { status: u16, message: String },

	#[error("invalid client configuration: {0}")]
	InvalidConfig(String),
}

impl RetryableError for OpenFgaError {
	fn is_retryable(&self) -> bool {
		match self {
			OpenFgaError::Network(e) => e.is_retryable(),
			OpenFgaError::Timeout => true,
			OpenFgaError::RateLimited => true,
			OpenFgaError::Unauthorized => false,
			OpenFgaError::InvalidResponse(_) => false,
			OpenFgaError::ApiError { status, .. } => StatusCode::from_u16(*status)
				.map(is_retryable_status)
				.unwrap_or(false),
			OpenFgaError::InvalidConfig(_) => false,
		}
	}
}

impl From<OpenFgaError> for StoreError {
	fn from(err: OpenFgaError) -> Self {
		match err {
			OpenFgaError::Unauthorized => StoreError::Rejected {
				status: 401,
				message: "unauthorized".to_string(),
			},
			OpenFgaError::RateLimited => StoreError::Rejected {
				status: 429,
				message: "rate limited".to_string(),
			},
			OpenFgaError::ApiError { status, message } => StoreError::Rejected { status, message },
			OpenFgaError::InvalidResponse(message) => StoreError::InvalidResponse(message),
			other => StoreError::Request(other.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn server_errors_are_retryable() {
		assert!(OpenFgaError::ApiError {
			status: 503,
			message: String::new()
		}
		.is_retryable());
		assert!(!OpenFgaError::ApiError {
			status: 400,
			message: String::new()
		}
		.is_retryable());
		assert!(OpenFgaError::Timeout.is_retryable());
		assert!(!OpenFgaError::Unauthorized.is_retryable());
	}

	#[test]
	fn maps_to_store_error() {
		let err: StoreError = OpenFgaError::ApiError {
			status: 400,
			message: "validation_error".into(),
		}
		.into();
		assert!(matches!(err, StoreError::Rejected { status: 400, .. }));

		let err: StoreError = OpenFgaError::Timeout.into();
		assert!(matches!(err, StoreError::Request(_)));
	}
}
