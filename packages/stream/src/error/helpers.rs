use std::fmt;

use crate::protocols::varint::VarInt;

/// A marker type to indicate that a transport operation timed out.
///
/// Transports that surface deadlines as their own error type can wrap this
/// marker so `Error::is_timeout` recognises them through any number of layers.
#[derive(Debug)]
pub struct TimedOut;

impl fmt::Display for TimedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("timed out")
    }
}

impl std::error::Error for TimedOut {}

/// The out-of-range value rejected by the varint encoder.
#[derive(Debug)]
pub struct TooLarge(pub u64);

impl fmt::Display for TooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} exceeds {}", self.0, VarInt::MAX)
    }
}

impl std::error::Error for TooLarge {}
