//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod engine_config;
pub mod logging;
pub mod sanitize;

pub use engine_config::{EngineConfig, HistoryConfig, ShortLinkConfig};
