//! h3frame Public API
//!
//! Read and write HTTP/3 frames (RFC 9114 §7.1) over a single byte stream,
//! with every frame boundary enforced on the read side.
//!
//! ```
//! use std::io::Cursor;
//!
//! use h3frame::{FrameType, H3Frame};
//!
//! let mut writer = H3Frame::builder().build(Vec::new()).unwrap();
//! writer.write_frame(FrameType::SETTINGS, &[0x06, 0x44, 0x00]).unwrap();
//!
//! let mut reader = H3Frame::builder()
//!     .max_frame_payload(1024)
//!     .build(Cursor::new(writer.into_inner()))
//!     .unwrap();
//! let header = reader.read_frame_header().unwrap();
//! assert_eq!(header.ty, FrameType::SETTINGS);
//! assert_eq!(reader.read_varint().unwrap().into_inner(), 6);
//! assert_eq!(reader.read_varint().unwrap().into_inner(), 1024);
//! reader.end_frame().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;

// Re-export all public API components
pub use builder::FramerBuilder;

// Re-export important types from the stream package
pub use h3frame_stream::prelude::*;
pub use h3frame_stream::{config, error, protocols, telemetry};

/// Main entry point providing static builder methods
pub struct H3Frame;

impl H3Frame {
    /// Create a new framer builder with default limits
    #[must_use]
    pub fn builder() -> FramerBuilder {
        FramerBuilder::new()
    }

    /// Wrap a blocking stream with default limits
    pub fn wrap<S>(stream: S) -> Framer<S> {
        Framer::new(stream)
    }

    /// Wrap a tokio stream with default limits
    #[cfg(feature = "async")]
    pub fn wrap_async<S>(stream: S) -> AsyncFramer<S> {
        AsyncFramer::new(stream)
    }
}
