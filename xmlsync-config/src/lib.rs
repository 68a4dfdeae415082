//! Shared configuration loader for the xmlsync tools.
//!
//! `defaults/xmlsync.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`XmlsyncConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use xmlsync::writer::WriteOptions;

const DEFAULT_TOML: &str = include_str!("../defaults/xmlsync.default.toml");

/// Top-level configuration consumed by xmlsync applications.
#[derive(Debug, Clone, Deserialize)]
pub struct XmlsyncConfig {
    pub formatting: FormattingConfig,
    pub check: CheckConfig,
}

/// Mirrors the knobs exposed by the document writer.
#[derive(Debug, Clone, Deserialize)]
pub struct FormattingConfig {
    pub indent_string: String,
    pub attr_wrap_column: usize,
    pub declaration: bool,
}

impl From<FormattingConfig> for WriteOptions {
    fn from(config: FormattingConfig) -> Self {
        WriteOptions {
            indent_string: config.indent_string,
            attr_wrap_column: config.attr_wrap_column,
            declaration: config.declaration,
        }
    }
}

impl From<&FormattingConfig> for WriteOptions {
    fn from(config: &FormattingConfig) -> Self {
        WriteOptions {
            indent_string: config.indent_string.clone(),
            attr_wrap_column: config.attr_wrap_column,
            declaration: config.declaration,
        }
    }
}

/// Knobs for the `check` command.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    pub fail_on_warnings: bool,
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
    pub fn build(self) -> Result<XmlsyncConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<XmlsyncConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.formatting.indent_string, "  ");
        assert_eq!(config.formatting.attr_wrap_column, 80);
        assert!(config.formatting.declaration);
        assert!(!config.check.fail_on_warnings);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("formatting.attr_wrap_column", 120i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.formatting.attr_wrap_column, 120);
    }

    #[test]
    fn formatting_config_converts_to_write_options() {
        let config = load_defaults().expect("defaults to deserialize");
        let options: WriteOptions = (&config.formatting).into();
        assert_eq!(options.indent_string, "  ");
        assert_eq!(options.attr_wrap_column, 80);
        assert!(options.declaration);
    }
}
