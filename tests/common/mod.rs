//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use gtm_graph::{ContainerGraph, GraphBuilder};
use std::path::PathBuf;
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Build the web container fixture with the default configuration.
#[allow(dead_code)]
pub fn web_container() -> ContainerGraph {
    init_logging();
    GraphBuilder::default()
        .build_file(fixture_path("web_container.json"))
        .unwrap()
}

/// Write `content` to `<temp_dir>/<name>` and return the path.
#[allow(dead_code)]
pub fn write_temp_file(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
