//! CLI utilities for the pbxkit tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Error reports with context and suggestions

#![warn(missing_docs)]

pub mod output;
