//! Core utilities for the pbxkit tools
//!
//! This crate provides functionality shared by the library and the CLI:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults for every section
//!
//! # Example
//!
//! ```rust,no_run
//! use pbxkit_core::config::Config;
//!
//! let config = Config::load(None).expect("Invalid configuration");
//! println!("Log level: {}", config.schema.logging.level);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
