//! Framer configuration
//!
//! Plain runtime configuration with validated presets.

pub mod framer;

pub use framer::FramerConfig;

/// Configuration validation and error handling
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid limit configuration: {0}")]
    Limit(String),
}
