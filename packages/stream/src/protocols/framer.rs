//! Blocking frame reader/writer over a single HTTP/3 stream
//!
//! A [`Framer`] owns one bidirectional byte stream. Reading a frame header
//! opens a read limit covering exactly the frame payload; reads are capped at
//! that boundary and `end_frame` refuses to close a frame that was not fully
//! consumed. Writes are passed through unchecked.

use std::io::{self, Read, Write};

use bytes::{Bytes, BytesMut};
use tracing::trace;

use super::frames::{FrameHeader, FrameType};
use super::limit::ReadLimit;
use super::varint::{VarInt, VarIntDecoder};
use crate::config::FramerConfig;
use crate::error::{self, Result, Violation};
use crate::telemetry::FramerStats;

/// Frame-boundary-enforcing wrapper around a blocking byte stream.
#[derive(Debug)]
pub struct Framer<S> {
    stream: S,
    limit: ReadLimit,
    config: FramerConfig,
    stats: FramerStats,
}

impl<S> Framer<S> {
    /// Wraps `stream` with the default configuration.
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, FramerConfig::default())
    }

    pub fn with_config(stream: S, config: FramerConfig) -> Self {
        Self {
            stream,
            limit: ReadLimit::Idle,
            config,
            stats: FramerStats::default(),
        }
    }

    /// Current position relative to frame boundaries.
    #[inline]
    pub fn state(&self) -> ReadLimit {
        self.limit
    }

    /// Payload bytes left in the open frame, or `None` between frames.
    #[inline]
    pub fn remaining(&self) -> Option<u64> {
        self.limit.remaining()
    }

    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.limit.is_poisoned()
    }

    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    pub fn stats(&self) -> FramerStats {
        self.stats.snapshot()
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Mutable access to the transport.
    ///
    /// Reading from it directly bypasses frame accounting.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Gives the transport back, e.g. to reset it after a protocol error.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Closes the open frame, re-arming the framer for the next header.
    ///
    /// # Errors
    ///
    /// Fails with a frame error if no frame is open or if payload bytes are
    /// still unread.
    pub fn end_frame(&mut self) -> Result<()> {
        self.limit.end_frame()?;
        trace!("frame closed");
        Ok(())
    }
}

impl<S: Read> Framer<S> {
    /// Reads the type and length of the next frame and opens a read limit
    /// covering its payload.
    ///
    /// # Errors
    ///
    /// - `EndOfStream` if the transport ended cleanly before the header.
    /// - A frame error if a frame is still open (the state is left as is), or
    ///   if the header is cut short (the stream is poisoned).
    pub fn read_frame_header(&mut self) -> Result<FrameHeader> {
        self.limit.check_idle()?;
        let ty = self.read_varint()?;
        let len = match self.read_varint() {
            Err(err) if err.is_end_of_stream() => return Err(self.limit.truncated_header()),
            other => other?,
        };

        let header = FrameHeader::new(FrameType::from(ty), len.into_inner());
        self.limit.begin_frame(header.len);
        self.stats.frames_read += 1;
        trace!(frame_type = %header.ty, len = header.len, "frame header");
        Ok(header)
    }

    /// Reads the whole remaining payload of the open frame.
    ///
    /// The frame must still be closed with [`end_frame`](Self::end_frame).
    ///
    /// # Errors
    ///
    /// Fails with a frame error if no frame is open, if the payload is larger
    /// than `max_frame_payload`, or if the stream ends early. The latter two
    /// poison the stream.
    pub fn read_frame_data(&mut self) -> Result<Bytes> {
        let len = self.limit.check_in_frame()?;
        let max = self.config.max_frame_payload;
        let len = match usize::try_from(len) {
            Ok(len) if (len as u64) <= max => len,
            _ => {
                let err = error::frame(Violation::PayloadTooLarge { len, max });
                return Err(self.limit.poison(err));
            }
        };

        let mut data = BytesMut::with_capacity(self.config.read_step(0, len));
        while data.len() < len {
            let filled = data.len();
            let step = self.config.read_step(filled, len);
            data.resize(filled + step, 0);
            self.read_exact(&mut data[filled..])?;
        }
        Ok(data.freeze())
    }

    /// Reads a single byte, charged against the open frame.
    ///
    /// # Errors
    ///
    /// A read past the frame boundary fails without touching the transport and
    /// poisons the stream. End of stream between frames is `EndOfStream`;
    /// inside a frame it is a frame error.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.limit.check()?;
        self.limit.charge(1)?;

        let mut byte = [0u8; 1];
        match self.fill(&mut byte)? {
            0 => Err(self.limit.end_of_stream(1)),
            _ => Ok(byte[0]),
        }
    }

    /// Reads up to `buf.len()` bytes, never past the end of the open frame.
    ///
    /// # Errors
    ///
    /// Asking for more bytes once the frame is exhausted poisons the stream.
    /// End of stream is reported as in [`read_byte`](Self::read_byte).
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.limit.check()?;
        if buf.is_empty() {
            return Ok(0);
        }

        let want = self.limit.clamp(buf.len());
        if want == 0 {
            // Every further byte lies beyond the frame boundary.
            self.limit.charge(buf.len())?;
            return Ok(0);
        }

        let n = self.fill(&mut buf[..want])?;
        if n == 0 {
            return Err(self.limit.end_of_stream(0));
        }
        self.limit.charge(n)?;
        Ok(n)
    }

    /// Fills `buf` completely.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read). Ending between frames with part of `buf`
    /// filled is a frame error, not `EndOfStream`.
    pub fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<()> {
        let mut started = false;
        while !buf.is_empty() {
            match self.read(buf) {
                Ok(n) => {
                    started = true;
                    let rest = buf;
                    buf = &mut rest[n..];
                }
                Err(err) if started && err.is_end_of_stream() => {
                    return Err(self.limit.poison(error::frame(Violation::TruncatedFrame {
                        remaining: buf.len() as u64,
                    })));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Reads a QUIC varint, charging every byte against the open frame.
    ///
    /// # Errors
    ///
    /// `EndOfStream` only if the stream ends before the first byte between
    /// frames; ending partway through is a frame error.
    pub fn read_varint(&mut self) -> Result<VarInt> {
        let mut decoder = VarIntDecoder::new(self.read_byte()?);
        while !decoder.is_complete() {
            match self.read_byte() {
                Ok(byte) => decoder.push(byte),
                Err(err) if err.is_end_of_stream() => {
                    return Err(self.limit.truncated_varint(decoder.len()));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(decoder.finish())
    }

    /// One transport read, retrying on interruption.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.stream.read(buf) {
                Ok(n) => {
                    self.stats.record_read(n);
                    return Ok(n);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.limit.transport_failed(err)),
            }
        }
    }
}

impl<S: Write> Framer<S> {
    /// Writes raw bytes. Nothing checks them against any frame length.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as `Kind::Io` and poison the stream.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.limit.check()?;
        match self.stream.write(buf) {
            Ok(n) => {
                self.stats.record_write(n);
                Ok(n)
            }
            Err(err) => Err(self.limit.transport_failed(err)),
        }
    }

    /// Writes all of `buf`.
    ///
    /// # Errors
    ///
    /// As [`write`](Self::write).
    pub fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.limit.check()?;
        match self.stream.write_all(buf) {
            Ok(()) => {
                self.stats.record_write(buf.len());
                Ok(())
            }
            Err(err) => Err(self.limit.transport_failed(err)),
        }
    }

    /// Commits written data to the transport.
    ///
    /// # Errors
    ///
    /// As [`write`](Self::write).
    pub fn flush(&mut self) -> Result<()> {
        self.limit.check()?;
        self.stream
            .flush()
            .map_err(|err| self.limit.transport_failed(err))
    }

    /// Writes `value` as a QUIC varint.
    ///
    /// # Errors
    ///
    /// `IntegerTooLarge` if `value > 2^62 - 1`; nothing is written and the
    /// stream stays usable.
    pub fn write_varint(&mut self, value: u64) -> Result<()> {
        self.limit.check()?;
        let (bytes, len) = VarInt::from_u64(value)?.to_array();
        self.write_all(&bytes[..len])
    }

    /// Writes a frame header announcing `len` payload bytes.
    ///
    /// The caller is trusted to follow it with exactly `len` bytes.
    ///
    /// # Errors
    ///
    /// `IntegerTooLarge` if either field is out of range, checked before
    /// anything is written.
    pub fn write_frame_header(&mut self, ty: FrameType, len: u64) -> Result<()> {
        self.limit.check()?;
        let (header, size) = FrameHeader::new(ty, len).to_array()?;
        self.write_all(&header[..size])?;
        self.stats.frames_written += 1;
        Ok(())
    }

    /// Writes a complete frame: header followed by `payload`.
    ///
    /// # Errors
    ///
    /// As [`write_frame_header`](Self::write_frame_header) and
    /// [`write_all`](Self::write_all).
    pub fn write_frame(&mut self, ty: FrameType, payload: &[u8]) -> Result<()> {
        self.write_frame_header(ty, payload.len() as u64)?;
        self.write_all(payload)
    }
}
