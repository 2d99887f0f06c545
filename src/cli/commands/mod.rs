//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod generators;
pub mod init;
pub mod run;
pub mod validate;
