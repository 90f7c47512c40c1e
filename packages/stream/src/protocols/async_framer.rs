//! Async frame reader/writer over a tokio byte stream
//!
//! Same contract as [`Framer`](super::framer::Framer): suspends wherever the
//! underlying stream suspends and adds no cancellation semantics of its own.
//! Dropping a pending read future after it pulled bytes from the transport
//! leaves those bytes charged, so callers that cancel reads should treat the
//! stream as broken.

use std::io;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use super::frames::{FrameHeader, FrameType};
use super::limit::ReadLimit;
use super::varint::{VarInt, VarIntDecoder};
use crate::config::FramerConfig;
use crate::error::{self, Result, Violation};
use crate::telemetry::FramerStats;

/// Frame-boundary-enforcing wrapper around an async byte stream.
#[derive(Debug)]
pub struct AsyncFramer<S> {
    stream: S,
    limit: ReadLimit,
    config: FramerConfig,
    stats: FramerStats,
}

impl<S> AsyncFramer<S> {
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

    #[inline]
    pub fn state(&self) -> ReadLimit {
        self.limit
    }

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

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Closes the open frame. Never touches the transport.
    ///
    /// # Errors
    ///
    /// Fails with a frame error if no frame is open or payload is unread.
    pub fn end_frame(&mut self) -> Result<()> {
        self.limit.end_frame()?;
        trace!("frame closed");
        Ok(())
    }
}

impl<S: AsyncRead + Unpin> AsyncFramer<S> {
    /// Reads the next frame header and opens a read limit over its payload.
    ///
    /// # Errors
    ///
    /// As [`Framer::read_frame_header`](super::framer::Framer::read_frame_header).
    pub async fn read_frame_header(&mut self) -> Result<FrameHeader> {
        self.limit.check_idle()?;
        let ty = self.read_varint().await?;
        let len = match self.read_varint().await {
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
    /// # Errors
    ///
    /// As [`Framer::read_frame_data`](super::framer::Framer::read_frame_data).
    pub async fn read_frame_data(&mut self) -> Result<Bytes> {
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
            self.read_exact(&mut data[filled..]).await?;
        }
        Ok(data.freeze())
    }

    /// Reads one byte, charged before the transport is touched.
    ///
    /// # Errors
    ///
    /// As [`Framer::read_byte`](super::framer::Framer::read_byte).
    pub async fn read_byte(&mut self) -> Result<u8> {
        self.limit.check()?;
        self.limit.charge(1)?;

        let mut byte = [0u8; 1];
        match self.fill(&mut byte).await? {
            0 => Err(self.limit.end_of_stream(1)),
            _ => Ok(byte[0]),
        }
    }

    /// Reads up to `buf.len()` bytes without crossing the frame boundary.
    ///
    /// # Errors
    ///
    /// As [`Framer::read`](super::framer::Framer::read).
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.limit.check()?;
        if buf.is_empty() {
            return Ok(0);
        }

        let want = self.limit.clamp(buf.len());
        if want == 0 {
            self.limit.charge(buf.len())?;
            return Ok(0);
        }

        let n = self.fill(&mut buf[..want]).await?;
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
    /// As [`Framer::read_exact`](super::framer::Framer::read_exact).
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]).await {
                Ok(n) => filled += n,
                Err(err) if filled > 0 && err.is_end_of_stream() => {
                    return Err(self.limit.poison(error::frame(Violation::TruncatedFrame {
                        remaining: (buf.len() - filled) as u64,
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
    /// As [`Framer::read_varint`](super::framer::Framer::read_varint).
    pub async fn read_varint(&mut self) -> Result<VarInt> {
        let mut decoder = VarIntDecoder::new(self.read_byte().await?);
        while !decoder.is_complete() {
            match self.read_byte().await {
                Ok(byte) => decoder.push(byte),
                Err(err) if err.is_end_of_stream() => {
                    return Err(self.limit.truncated_varint(decoder.len()));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(decoder.finish())
    }

    async fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.stream.read(buf).await {
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

impl<S: AsyncWrite + Unpin> AsyncFramer<S> {
    /// Writes raw bytes, unchecked against any frame length.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as `Kind::Io` and poison the stream.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.limit.check()?;
        match self.stream.write(buf).await {
            Ok(n) => {
                self.stats.record_write(n);
                Ok(n)
            }
            Err(err) => Err(self.limit.transport_failed(err)),
        }
    }

    /// # Errors
    ///
    /// As [`write`](Self::write).
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.limit.check()?;
        match self.stream.write_all(buf).await {
            Ok(()) => {
                self.stats.record_write(buf.len());
                Ok(())
            }
            Err(err) => Err(self.limit.transport_failed(err)),
        }
    }

    /// # Errors
    ///
    /// As [`write`](Self::write).
    pub async fn flush(&mut self) -> Result<()> {
        self.limit.check()?;
        match self.stream.flush().await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.limit.transport_failed(err)),
        }
    }

    /// Writes `value` as a QUIC varint.
    ///
    /// # Errors
    ///
    /// `IntegerTooLarge` if `value > 2^62 - 1`; nothing is written.
    pub async fn write_varint(&mut self, value: u64) -> Result<()> {
        self.limit.check()?;
        let (bytes, len) = VarInt::from_u64(value)?.to_array();
        self.write_all(&bytes[..len]).await
    }

    /// Writes a frame header announcing `len` payload bytes.
    ///
    /// # Errors
    ///
    /// `IntegerTooLarge` if either field is out of range.
    pub async fn write_frame_header(&mut self, ty: FrameType, len: u64) -> Result<()> {
        self.limit.check()?;
        let (header, size) = FrameHeader::new(ty, len).to_array()?;
        self.write_all(&header[..size]).await?;
        self.stats.frames_written += 1;
        Ok(())
    }

    /// Writes a complete frame: header followed by `payload`.
    ///
    /// # Errors
    ///
    /// As [`write_frame_header`](Self::write_frame_header).
    pub async fn write_frame(&mut self, ty: FrameType, payload: &[u8]) -> Result<()> {
        self.write_frame_header(ty, payload.len() as u64).await?;
        self.write_all(payload).await
    }
}
