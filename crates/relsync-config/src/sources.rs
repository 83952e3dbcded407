// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file and environment
//! variables.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::RelsyncConfigLayer;
use crate::sections::{
	KubeConfigLayer, LoggingConfigLayer, OpenFgaConfigLayer, ReconcilerConfigLayer,
};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/relsync/relsync.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<RelsyncConfigLayer, ConfigError>;
}

/// Built-in defaults. Every default is applied in `finalize`, so this layer
/// is empty.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<RelsyncConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(RelsyncConfigLayer::default())
	}
}

pub struct TomlSource {
	path: PathBuf,
	required: bool,
}

impl TomlSource {
	/// A file that is skipped when it does not exist.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// A file that must exist, e.g. one named on the command line.
	pub fn required(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<RelsyncConfigLayer, ConfigError> {
		if !self.required && !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(RelsyncConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: RelsyncConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `RELSYNC_<SECTION>_<FIELD>`.
#[derive(Default)]
pub struct EnvSource {
	vars: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reads a fixed set of variables instead of the process environment.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		let value = match &self.vars {
			Some(vars) => vars.get(name).cloned(),
			None => std::env::var(name).ok(),
		};
		value.filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {} value '{v}'", std::any::type_name::<T>()),
			}),
			None => Ok(None),
		}
	}

	fn list(&self, name: &str) -> Option<Vec<String>> {
		self.var(name).map(|s| {
			s.split(',')
				.map(|s| s.trim().to_string())
				.filter(|s| !s.is_empty())
				.collect()
		})
	}

	fn reconciler(&self) -> Result<ReconcilerConfigLayer, ConfigError> {
		Ok(ReconcilerConfigLayer {
			write_batch_size: self.parse("RELSYNC_RECONCILER_WRITE_BATCH_SIZE")?,
			list_page_size: self.parse("RELSYNC_RECONCILER_LIST_PAGE_SIZE")?,
			read_page_size: self.parse("RELSYNC_RECONCILER_READ_PAGE_SIZE")?,
			interval_secs: self.parse("RELSYNC_RECONCILER_INTERVAL_SECS")?,
			page_timeout_secs: self.parse("RELSYNC_RECONCILER_PAGE_TIMEOUT_SECS")?,
			batch_timeout_secs: self.parse("RELSYNC_RECONCILER_BATCH_TIMEOUT_SECS")?,
			tenant_concurrency: self.parse("RELSYNC_RECONCILER_TENANT_CONCURRENCY")?,
			dry_run: self.bool("RELSYNC_RECONCILER_DRY_RUN"),
			tenants: self.list("RELSYNC_RECONCILER_TENANTS"),
		})
	}

	fn openfga(&self) -> Result<OpenFgaConfigLayer, ConfigError> {
		Ok(OpenFgaConfigLayer {
			url: self.var("RELSYNC_OPENFGA_URL"),
			api_token: self.var("RELSYNC_OPENFGA_API_TOKEN"),
			authorization_model_id: self.var("RELSYNC_OPENFGA_AUTHORIZATION_MODEL_ID"),
			store_prefix: self.var("RELSYNC_OPENFGA_STORE_PREFIX"),
			request_timeout_secs: self.parse("RELSYNC_OPENFGA_REQUEST_TIMEOUT_SECS")?,
		})
	}

	fn kube(&self) -> KubeConfigLayer {
		KubeConfigLayer {
			group: self.var("RELSYNC_KUBE_GROUP"),
			version: self.var("RELSYNC_KUBE_VERSION"),
			tenant_label_selector: self.var("RELSYNC_KUBE_TENANT_LABEL_SELECTOR"),
		}
	}

	fn logging(&self) -> LoggingConfigLayer {
		LoggingConfigLayer {
			level: self.var("RELSYNC_LOGGING_LEVEL"),
			json: self.bool("RELSYNC_LOGGING_JSON"),
		}
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<RelsyncConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(RelsyncConfigLayer {
			reconciler: Some(self.reconciler()?),
			openfga: Some(self.openfga()?),
			kube: Some(self.kube()),
			logging: Some(self.logging()),
		})
	}
}
