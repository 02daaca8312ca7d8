//! Shared configuration loader for the chatmd toolchain.
//!
//! `defaults/chatmd.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files
//! on top of those defaults via [`Loader`] before deserializing into
//! [`ChatmdConfig`].

use chatmd_export::assemble::AssembleConfig;
use chatmd_export::locate::Matcher;
use chatmd_export::options::ConversionOptions;
use chatmd_export::queue::FlushFormat;
use chatmd_export::settle::SettleConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/chatmd.default.toml");

/// Top-level configuration consumed by chatmd applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatmdConfig {
    pub export: ExportSection,
    pub settle: SettleSection,
    pub locate: LocateSection,
    pub queue: QueueSection,
}

impl ChatmdConfig {
    /// Assembly tunables (settle knobs plus the matcher list).
    pub fn assemble_config(&self) -> AssembleConfig {
        AssembleConfig {
            settle: (&self.settle).into(),
            matchers: self.locate.matchers.clone(),
        }
    }
}

/// Default export options; the CLI layers request-specific flags on top.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSection {
    pub include_meta: bool,
    pub include_timestamps: bool,
    pub collapse_images: bool,
}

impl From<&ExportSection> for ConversionOptions {
    fn from(section: &ExportSection) -> Self {
        ConversionOptions {
            include_title: None,
            include_meta: section.include_meta,
            include_timestamps: section.include_timestamps,
            collapse_images: section.collapse_images,
        }
    }
}

/// Mirrors the knobs of the lazy-load settler.
#[derive(Debug, Clone, Deserialize)]
pub struct SettleSection {
    pub max_passes: u32,
    pub interval_ms: u64,
}

impl From<&SettleSection> for SettleConfig {
    fn from(section: &SettleSection) -> Self {
        SettleConfig {
            max_passes: section.max_passes,
            interval: Duration::from_millis(section.interval_ms),
        }
    }
}

/// The message-root matcher list, in priority order.
#[derive(Debug, Clone, Deserialize)]
pub struct LocateSection {
    pub matchers: Vec<Matcher>,
}

/// Flush document shape for the capture queue.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSection {
    pub banner: String,
    pub separator: String,
}

impl From<&QueueSection> for FlushFormat {
    fn from(section: &QueueSection) -> Self {
        FlushFormat {
            banner: section.banner.clone(),
            separator: section.separator.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ChatmdConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ChatmdConfig, ConfigError> {
    Loader::new().build()
}
