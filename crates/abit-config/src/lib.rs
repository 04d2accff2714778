//! Configuration management for abit
//!
//! This crate provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment)
//! - Type-safe configuration structs
//!
//! Secrets (bot token, LLM key) are never part of the config file; they are
//! read from the environment by the crates that need them.
//!
//! # Example
//!
//! ```no_run
//! use abit_config::Config;
//!
//! // Load from default location (.abit.{toml,yml,json})
//! let config = Config::load()?;
//!
//! // Or load from specific file
//! let config = Config::from_file("path/to/config.toml")?;
//!
//! let top_k = config.retrieval.top_k;
//! let cap = config.chunking.max_chars;
//! # Ok::<(), abit_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, ErrorFormatter, Result};
pub use loader::ConfigBuilder;
pub use types::*;

/// Trait for config validation
pub use validation::Validate;
