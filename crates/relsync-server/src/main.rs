// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! relsync daemon binary.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use relsync_config::{LoggingConfig, RelsyncConfig};
use relsync_kube::KubePolicyLister;
use relsync_openfga::OpenFgaClient;
use relsync_reconciler::{
	CancellationToken, ReconcileScheduler, Reconciler, ReconcilerSettings,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// relsync - keeps the authorization tuple store in sync with policy resources.
#[derive(Parser, Debug)]
#[command(name = "relsync-server", about = "Authorization tuple reconciler", version)]
struct Args {
	/// Path to a TOML config file. Defaults to /etc/relsync/relsync.toml when present.
	#[arg(long, short, env = "RELSYNC_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the periodic reconciler until interrupted (default)
	Run,
	/// Run a single pass, print its report as JSON and exit
	Once {
		/// Reconcile only this tenant
		#[arg(long)]
		tenant: Option<String>,
	},
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(ExitCode::SUCCESS);
	}

	dotenvy::dotenv().ok();

	let config = relsync_config::load_config(args.config.as_deref())?;
	init_tracing(&config.logging);

	tracing::info!(
		openfga = %config.openfga.url,
		group = %config.kube.group,
		version = %config.kube.version,
		dry_run = config.reconciler.dry_run,
		"starting relsync-server"
	);

	let reconciler = Arc::new(build_reconciler(&config).await?);

	match args.command {
		Some(Command::Once { tenant }) => run_once(reconciler, tenant).await,
		_ => {
			run_daemon(reconciler).await;
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	if logging.json {
		registry
			.with(tracing_subscriber::fmt::layer().json())
			.init();
	} else {
		registry.with(tracing_subscriber::fmt::layer()).init();
	}
}

fn reconciler_settings(config: &RelsyncConfig) -> ReconcilerSettings {
	let r = &config.reconciler;
	ReconcilerSettings {
		write_batch_size: r.write_batch_size,
		list_page_size: r.list_page_size,
		read_page_size: r.read_page_size,
		page_timeout: Duration::from_secs(r.page_timeout_secs),
		batch_timeout: Duration::from_secs(r.batch_timeout_secs),
		tenant_concurrency: r.tenant_concurrency,
		dry_run: r.dry_run,
		tenants: r.tenants.clone(),
		interval: Duration::from_secs(r.interval_secs),
	}
}

async fn build_reconciler(config: &RelsyncConfig) -> Result<Reconciler, Box<dyn std::error::Error>> {
	let mut lister = KubePolicyLister::try_default(&config.kube.group, &config.kube.version).await?;
	if let Some(selector) = &config.kube.tenant_label_selector {
		lister = lister.with_tenant_label_selector(selector);
	}

	let fga = &config.openfga;
	let mut store = OpenFgaClient::new(&fga.url, Duration::from_secs(fga.request_timeout_secs))?
		.with_store_prefix(&fga.store_prefix);
	if let Some(token) = &fga.api_token {
		store = store.with_api_token(token);
	}
	if let Some(model_id) = &fga.authorization_model_id {
		store = store.with_authorization_model_id(model_id);
	}

	Ok(Reconciler::new(
		Arc::new(lister),
		Arc::new(store),
		reconciler_settings(config),
	))
}

async fn run_once(
	reconciler: Arc<Reconciler>,
	tenant: Option<String>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
	let cancel = CancellationToken::new();
	let interrupt = cancel.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			tracing::info!("Received shutdown signal, cancelling pass");
			interrupt.cancel();
		}
	});

	let succeeded = match tenant {
		Some(tenant) => {
			let report = reconciler.reconcile(&tenant, &cancel).await?;
			println!("{}", serde_json::to_string_pretty(&report)?);
			true
		}
		None => {
			let report = reconciler.reconcile_all(&cancel).await?;
			println!("{}", serde_json::to_string_pretty(&report)?);
			report.is_success()
		}
	};

	Ok(if succeeded {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}

async fn run_daemon(reconciler: Arc<Reconciler>) {
	let scheduler = ReconcileScheduler::new(reconciler);
	scheduler.start().await;

	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("Received shutdown signal"),
		Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signal"),
	}

	tracing::info!("Shutting down reconcile scheduler...");
	let health = scheduler.health().await;
	scheduler.shutdown().await;
	tracing::info!(state = ?health.status, "relsync-server shutdown complete");
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn settings_follow_config() {
		let mut config = RelsyncConfig::default();
		config.reconciler.write_batch_size = 7;
		config.reconciler.interval_secs = 42;
		config.reconciler.tenants = vec!["org-1".into()];
		let settings = reconciler_settings(&config);
		assert_eq!(settings.write_batch_size, 7);
		assert_eq!(settings.interval, Duration::from_secs(42));
		assert_eq!(settings.tenants, vec!["org-1".to_string()]);
	}

	#[test]
	fn default_settings_match_config_defaults() {
		assert_eq!(
			reconciler_settings(&RelsyncConfig::default()),
			ReconcilerSettings::default()
		);
	}

	#[test]
	fn parses_once_with_tenant() {
		let args = Args::parse_from(["relsync-server", "once", "--tenant", "org-1"]);
		match args.command {
			Some(Command::Once { tenant }) => assert_eq!(tenant.as_deref(), Some("org-1")),
			other => panic!("unexpected command: {other:?}"),
		}
	}
}
