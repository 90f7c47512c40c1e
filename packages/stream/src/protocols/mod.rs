//! HTTP/3 stream framing
//!
//! Varint codec, frame type codes, read-limit bookkeeping and the blocking and
//! async framers built on them.

pub mod frames;
pub mod framer;
pub mod limit;
pub mod varint;

#[cfg(feature = "async")]
pub mod async_framer;

pub use frames::{FrameHeader, FrameType};
pub use framer::Framer;
pub use limit::ReadLimit;
pub use varint::{UnexpectedEnd, VarInt};

#[cfg(feature = "async")]
pub use async_framer::AsyncFramer;

// Include tests
#[cfg(test)]
mod wire_tests;
