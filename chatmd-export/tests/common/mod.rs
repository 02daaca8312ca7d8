//! Shared harness for the integration tests.

use chatmd_export::assemble::{assemble_with_config, AssembleConfig};
use chatmd_export::options::ConversionOptions;
use chatmd_export::page::StaticPage;
use chatmd_export::settle::SettleConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Load a fixture from tests/fixtures.
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

/// Assembly config with zero waits so tests don't sleep.
pub fn fast_config() -> AssembleConfig {
    AssembleConfig {
        settle: SettleConfig {
            max_passes: 3,
            interval: Duration::ZERO,
        },
        matchers: Vec::new(),
    }
}

/// Export a fixture end to end.
pub fn export_fixture(name: &str, options: &ConversionOptions) -> String {
    let mut page = StaticPage::new(fixture(name));
    assemble_with_config(&mut page, options, &fast_config())
        .unwrap_or_else(|e| panic!("export of {name} failed: {e}"))
}

/// Options without the metadata preamble, which most assertions don't want.
pub fn bare_options() -> ConversionOptions {
    ConversionOptions {
        include_meta: false,
        ..ConversionOptions::default()
    }
}
