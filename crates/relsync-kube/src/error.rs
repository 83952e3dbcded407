// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KubeError {
	#[error("K8s API error: {message}")]
	ApiError { message: String },

	#[error("K8s client configuration error: {message}")]
	Config { message: String },
}

impl From<kube::Error> for KubeError {
	fn from(err: kube::Error) -> Self {
		KubeError::ApiError {
			message: err.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use kube::core::ErrorResponse;

	#[test]
	fn api_errors_keep_the_server_message() {
		let err: KubeError = kube::Error::Api(ErrorResponse {
			status: "Failure".into(),
			message: "namespaces is forbidden".into(),
			reason: "Forbidden".into(),
			code: 403,
		})
		.into();
		match err {
			KubeError::ApiError { message } => assert!(message.contains("forbidden")),
			other => panic!("unexpected error: {other}"),
		}
	}
}
