// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use relsync_config::{load_from_sources, ConfigSource, DefaultsSource, EnvSource, TomlSource};

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
	let path = dir.path().join("relsync.toml");
	std::fs::write(&path, content).unwrap();
	path
}

#[test]
fn environment_overrides_file_overrides_defaults() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_config(
		&dir,
		r#"
[reconciler]
write_batch_size = 50
interval_secs = 60
tenants = ["org-1"]

[openfga]
url = "http://fga.internal:8080"
store_prefix = "org-"

[logging]
level = "debug"
"#,
	);

	let env = EnvSource::from_vars([
		("RELSYNC_RECONCILER_WRITE_BATCH_SIZE", "10"),
		("RELSYNC_OPENFGA_API_TOKEN", "token-123"),
	]);

	// Deliberately out of order; sources are sorted by precedence.
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(env),
		Box::new(TomlSource::required(&path)),
		Box::new(DefaultsSource),
	];
	let config = load_from_sources(sources).unwrap();

	assert_eq!(config.reconciler.write_batch_size, 10);
	assert_eq!(config.reconciler.interval_secs, 60);
	assert_eq!(config.reconciler.read_page_size, 100);
	assert_eq!(config.reconciler.tenants, vec!["org-1".to_string()]);
	assert_eq!(config.openfga.url, "http://fga.internal:8080");
	assert_eq!(config.openfga.store_prefix, "org-");
	assert_eq!(config.openfga.api_token.as_deref(), Some("token-123"));
	assert_eq!(config.kube.group, "iam.relsync.dev");
	assert_eq!(config.logging.level, "debug");
	assert!(!config.logging.json);
}

#[test]
fn zero_batch_size_in_file_is_rejected() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_config(&dir, "[reconciler]\nwrite_batch_size = 0\n");
	let err = load_from_sources(vec![Box::new(TomlSource::required(&path))]).unwrap_err();
	assert!(err.to_string().contains("write_batch_size"));
}

#[test]
fn unknown_sections_are_ignored() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_config(&dir, "[metrics]\nenabled = true\n");
	let config = load_from_sources(vec![Box::new(TomlSource::required(&path))]).unwrap();
	assert_eq!(config.reconciler.write_batch_size, 100);
}
