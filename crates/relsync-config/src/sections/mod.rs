// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod kube;
mod logging;
mod openfga;
mod reconciler;

pub use kube::{KubeConfig, KubeConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use openfga::{OpenFgaConfig, OpenFgaConfigLayer};
pub use reconciler::{ReconcilerConfig, ReconcilerConfigLayer};
