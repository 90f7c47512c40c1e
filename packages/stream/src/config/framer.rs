//! Framer Configuration Module
//!
//! Limits applied while reading frames off a stream.

use super::ConfigurationError;

/// Runtime framer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramerConfig {
    /// Largest frame payload `read_frame_data` will buffer.
    pub max_frame_payload: u64,
    /// Upper bound on the up-front allocation made by `read_frame_data`;
    /// larger payloads grow the buffer as bytes arrive.
    pub initial_read_buffer: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_frame_payload: 16_777_216, // 16MB
            initial_read_buffer: 8192,     // 8KB
        }
    }
}

impl FramerConfig {
    /// Create memory-constrained framer configuration
    #[must_use]
    pub fn low_memory() -> Self {
        Self {
            max_frame_payload: 262_144, // 256KB
            initial_read_buffer: 4096,  // 4KB
        }
    }

    /// Create high-throughput framer configuration
    #[must_use]
    pub fn high_throughput() -> Self {
        Self {
            max_frame_payload: 67_108_864, // 64MB
            initial_read_buffer: 65_536,   // 64KB
        }
    }

    #[must_use]
    pub fn with_max_frame_payload(mut self, max: u64) -> Self {
        self.max_frame_payload = max;
        self
    }

    #[must_use]
    pub fn with_initial_read_buffer(mut self, size: usize) -> Self {
        self.initial_read_buffer = size;
        self
    }

    /// Size of the next chunk `read_frame_data` reads once `filled` of `len`
    /// payload bytes are buffered.
    ///
    /// The buffer doubles from `initial_read_buffer`. Never zero while bytes
    /// remain, even for an unvalidated config.
    #[must_use]
    pub(crate) fn read_step(&self, filled: usize, len: usize) -> usize {
        let step = filled.max(self.initial_read_buffer).max(1);
        (len - filled).min(step)
    }

    /// Validate framer configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Limit` if `max_frame_payload` is zero or
    /// `initial_read_buffer` is zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_frame_payload == 0 {
            return Err(ConfigurationError::Limit(
                "max_frame_payload must be greater than zero".to_string(),
            ));
        }
        if self.initial_read_buffer == 0 {
            return Err(ConfigurationError::Limit(
                "initial_read_buffer must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
