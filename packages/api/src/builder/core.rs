//! Core `FramerBuilder` structure
//!
//! Collects framer limits through method chaining and validates them once,
//! when the framer is built around its stream.

use h3frame_stream::{ConfigurationError, Framer, FramerConfig};
#[cfg(feature = "async")]
use h3frame_stream::AsyncFramer;
use tracing::debug;

/// Fluent builder for [`Framer`] and [`AsyncFramer`].
#[derive(Debug, Clone, Default)]
pub struct FramerBuilder {
    config: FramerConfig,
}

impl FramerBuilder {
    /// Builder starting from the default limits
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder starting from the memory-constrained preset
    #[must_use]
    pub fn low_memory() -> Self {
        Self {
            config: FramerConfig::low_memory(),
        }
    }

    /// Builder starting from the high-throughput preset
    #[must_use]
    pub fn high_throughput() -> Self {
        Self {
            config: FramerConfig::high_throughput(),
        }
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn config(mut self, config: FramerConfig) -> Self {
        self.config = config;
        self
    }

    /// Largest payload `read_frame_data` will accept
    #[must_use]
    pub fn max_frame_payload(mut self, max: u64) -> Self {
        self.config.max_frame_payload = max;
        self
    }

    /// Ceiling on the up-front allocation made by `read_frame_data`
    #[must_use]
    pub fn initial_read_buffer(mut self, size: usize) -> Self {
        self.config.initial_read_buffer = size;
        self
    }

    /// The configuration collected so far
    #[must_use]
    pub fn as_config(&self) -> &FramerConfig {
        &self.config
    }

    /// Wrap a blocking stream.
    ///
    /// # Errors
    ///
    /// Returns the `ConfigurationError` from `FramerConfig::validate`.
    pub fn build<S>(self, stream: S) -> Result<Framer<S>, ConfigurationError> {
        self.config.validate()?;
        debug!(config = ?self.config, "building framer");
        Ok(Framer::with_config(stream, self.config))
    }

    /// Wrap a tokio stream.
    ///
    /// # Errors
    ///
    /// Returns the `ConfigurationError` from `FramerConfig::validate`.
    #[cfg(feature = "async")]
    pub fn build_async<S>(self, stream: S) -> Result<AsyncFramer<S>, ConfigurationError> {
        self.config.validate()?;
        debug!(config = ?self.config, "building async framer");
        Ok(AsyncFramer::with_config(stream, self.config))
    }
}
