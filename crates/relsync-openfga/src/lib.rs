// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenFGA HTTP API client.
//!
//! Implements [`relsync_core::TupleStore`] against the OpenFGA REST API with
//! one store per tenant, looked up by name and created on first use.

pub mod client;
pub mod error;
pub mod types;

pub use client::OpenFgaClient;
pub use error::OpenFgaError;
pub use relsync_common_http::RetryConfig;
