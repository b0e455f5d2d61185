//! Core types and utilities for notion-bridge
//!
//! # Modules
//!
//! - `config`: Environment loading and bridge configuration
//! - `error`: Error types and Result alias

pub mod config;
pub mod error;

// Re-exports
pub use config::BridgeConfig;
pub use error::{Error, Result};
