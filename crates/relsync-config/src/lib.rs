// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the relsync daemon.
//!
//! Layers are read from built-in defaults, a TOML file and `RELSYNC_*`
//! environment variables, merged in that order and then validated.
//!
//! # Usage
//!
//! ```ignore
//! use relsync_config::load_config;
//!
//! let config = load_config(None)?;
//! println!("reconciling every {}s", config.reconciler.interval_secs);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

use std::path::Path;

pub use error::ConfigError;
pub use layer::RelsyncConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelsyncConfig {
	pub reconciler: ReconcilerConfig,
	pub openfga: OpenFgaConfig,
	pub kube: KubeConfig,
	pub logging: LoggingConfig,
}

/// Loads configuration with the standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`RELSYNC_*`)
/// 2. Config file: `config_path` when given, which must exist, otherwise
///    `/etc/relsync/relsync.toml` if present
/// 3. Built-in defaults
pub fn load_config(config_path: Option<&Path>) -> Result<RelsyncConfig, ConfigError> {
	let file = match config_path {
		Some(path) => TomlSource::required(path),
		None => TomlSource::system(),
	};
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(file),
		Box::new(EnvSource::new()),
	])
}

/// Merges `sources` in precedence order and finalizes the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<RelsyncConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = RelsyncConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

fn finalize(layer: RelsyncConfigLayer) -> Result<RelsyncConfig, ConfigError> {
	let reconciler = layer.reconciler.unwrap_or_default().finalize();
	let openfga = layer.openfga.unwrap_or_default().finalize();
	let kube = layer.kube.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	reconciler.validate()?;
	openfga.validate()?;

	info!(
		openfga_url = %openfga.url,
		kube_group = %kube.group,
		write_batch_size = reconciler.write_batch_size,
		interval_secs = reconciler.interval_secs,
		tenant_concurrency = reconciler.tenant_concurrency,
		dry_run = reconciler.dry_run,
		pinned_tenants = reconciler.tenants.len(),
		"Configuration loaded"
	);

	Ok(RelsyncConfig {
		reconciler,
		openfga,
		kube,
		logging,
	})
}
