//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod formats;
pub mod merge;

use crate::{Config, Result, Validate};
use std::path::{Path, PathBuf};

/// Files probed by [`Config::load`], first match wins
pub const DEFAULT_PATHS: [&str; 4] = [".abit.toml", ".abit.yml", ".abit.yaml", ".abit.json"];

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Configuration source for layered loading
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    /// `ABIT_<SECTION>_<FIELD>` variables
    Environment,
    /// Explicit config object (for programmatic use)
    Explicit(Config),
}

/// Builder for loading and merging configurations
///
/// Precedence: defaults < file < environment < explicit overrides
///
/// # Example
///
/// ```no_run
/// use abit_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".abit.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), abit_config::error::ConfigError>(())
/// ```
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.sources.push(ConfigSource::Explicit(config));
        self
    }

    /// Merge all sources in order and validate the result
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    config = merge::merge(config, file::load_from_file(&path)?);
                }
                // variables are applied in place so a value equal to the
                // default still overrides the file
                ConfigSource::Environment => env::apply_env(&mut config)?,
                ConfigSource::Explicit(explicit) => config = merge::merge(config, explicit),
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from the first of [`DEFAULT_PATHS`] that exists,
    /// falling back to defaults, then apply the environment overlay.
    pub fn load() -> Result<Self> {
        let mut builder = ConfigBuilder::new();

        if let Some(path) = DEFAULT_PATHS.iter().find(|p| Path::new(p).exists()) {
            builder = builder.with_file(path);
        }

        builder.with_env().build()
    }

    /// Load configuration from a specific file plus the environment overlay
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}
