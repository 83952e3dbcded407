// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lists relsync policy resources from a Kubernetes API server.
//!
//! The resources are custom resources in a single API group; each tenant is a
//! namespace.

pub mod decode;
pub mod error;
pub mod lister;

pub use error::KubeError;
pub use lister::KubePolicyLister;
