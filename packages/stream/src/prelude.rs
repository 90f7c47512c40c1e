//! Canonical types for framing a stream

pub use crate::config::{ConfigurationError, FramerConfig};
pub use crate::error::{Code, Error, Kind, Result, TimedOut, Violation};
#[cfg(feature = "async")]
pub use crate::protocols::AsyncFramer;
pub use crate::protocols::{FrameHeader, FrameType, Framer, ReadLimit, UnexpectedEnd, VarInt};
pub use crate::telemetry::FramerStats;
