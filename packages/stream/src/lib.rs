//! # h3frame stream
//!
//! Frame-boundary enforcement for a single HTTP/3 stream (RFC 9114 §7.1).
//!
//! A [`Framer`] wraps one bidirectional byte stream. Reading a frame header
//! opens a read limit covering exactly the frame payload: reads are capped at
//! the boundary, reading past it poisons the stream, and the frame can only be
//! closed once every payload byte has been consumed. Frame headers and payload
//! fields use QUIC variable-length integers (RFC 9000 §16), see [`VarInt`].
//!
//! ```
//! use std::io::Cursor;
//!
//! use h3frame_stream::{FrameType, Framer};
//!
//! let mut writer = Framer::new(Vec::new());
//! writer.write_frame(FrameType::DATA, b"hello").unwrap();
//!
//! let mut reader = Framer::new(Cursor::new(writer.into_inner()));
//! let header = reader.read_frame_header().unwrap();
//! assert_eq!(header.ty, FrameType::DATA);
//! assert_eq!(reader.read_frame_data().unwrap(), &b"hello"[..]);
//! reader.end_frame().unwrap();
//! assert!(reader.read_frame_header().unwrap_err().is_end_of_stream());
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod protocols;
pub mod telemetry;

// Prelude with canonical types
pub mod prelude;

pub use crate::prelude::*;
