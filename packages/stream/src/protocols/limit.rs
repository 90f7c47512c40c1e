//! Read-limit bookkeeping shared by the blocking and async framers.
//!
//! Every byte read from the transport is charged here. Reading a frame header
//! opens a limit; reading past it, or hitting end of stream before it is
//! used up, poisons the stream for good.

use tracing::debug;

use crate::error::{self, Error, Violation};

/// Where a framed stream stands relative to frame boundaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReadLimit {
    /// Between frames; the next read must be a frame header.
    #[default]
    Idle,
    /// Inside a frame with `remaining` payload bytes left.
    InFrame { remaining: u64 },
    /// A framing or transport failure occurred. Nothing may touch the
    /// transport again.
    Poisoned,
}

impl ReadLimit {
    /// Fails if the stream is poisoned.
    #[inline]
    pub(crate) fn check(&self) -> Result<(), Error> {
        match self {
            ReadLimit::Poisoned => Err(error::frame(Violation::Poisoned)),
            _ => Ok(()),
        }
    }

    /// Payload bytes left in the open frame, if any.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        match *self {
            ReadLimit::InFrame { remaining } => Some(remaining),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        matches!(self, ReadLimit::Poisoned)
    }

    /// Enters the poisoned state and returns the error that caused it.
    pub(crate) fn poison(&mut self, err: Error) -> Error {
        if !self.is_poisoned() {
            debug!(error = %err, "poisoning framed stream");
            *self = ReadLimit::Poisoned;
        }
        err
    }

    /// Precondition for reading a frame header.
    pub(crate) fn check_idle(&self) -> Result<(), Error> {
        match *self {
            ReadLimit::Idle => Ok(()),
            ReadLimit::InFrame { remaining } => {
                Err(error::frame(Violation::NestedHeader { remaining }))
            }
            ReadLimit::Poisoned => Err(error::frame(Violation::Poisoned)),
        }
    }

    /// Precondition for reading frame data: returns the open frame's
    /// remaining length.
    pub(crate) fn check_in_frame(&self) -> Result<u64, Error> {
        match *self {
            ReadLimit::InFrame { remaining } => Ok(remaining),
            ReadLimit::Idle => Err(error::frame(Violation::NoActiveFrame)),
            ReadLimit::Poisoned => Err(error::frame(Violation::Poisoned)),
        }
    }

    /// Opens a frame of `len` payload bytes.
    pub(crate) fn begin_frame(&mut self, len: u64) {
        debug_assert_eq!(*self, ReadLimit::Idle);
        *self = ReadLimit::InFrame { remaining: len };
    }

    /// Closes the open frame; all of its payload must have been read.
    pub(crate) fn end_frame(&mut self) -> Result<(), Error> {
        match *self {
            ReadLimit::InFrame { remaining: 0 } => {
                *self = ReadLimit::Idle;
                Ok(())
            }
            ReadLimit::InFrame { remaining } => {
                Err(error::frame(Violation::FrameNotConsumed { remaining }))
            }
            ReadLimit::Idle => Err(error::frame(Violation::NoActiveFrame)),
            ReadLimit::Poisoned => Err(error::frame(Violation::Poisoned)),
        }
    }

    /// Records that `n` bytes were read.
    ///
    /// Without an open frame this is a no-op. Inside a frame, going past the
    /// boundary poisons the stream.
    pub(crate) fn charge(&mut self, n: usize) -> Result<(), Error> {
        match self {
            ReadLimit::Idle => Ok(()),
            ReadLimit::InFrame { remaining } => {
                let requested = n as u64;
                if requested > *remaining {
                    let err = error::frame(Violation::LimitExceeded {
                        requested,
                        remaining: *remaining,
                    });
                    return Err(self.poison(err));
                }
                *remaining -= requested;
                Ok(())
            }
            ReadLimit::Poisoned => Err(error::frame(Violation::Poisoned)),
        }
    }

    /// Largest block read allowed for a buffer of `len` bytes.
    ///
    /// Inside a frame the read is capped at the boundary. An exhausted frame
    /// yields zero even for a non-empty buffer; callers treat that as an
    /// over-read and charge the full request.
    pub(crate) fn clamp(&self, len: usize) -> usize {
        match *self {
            ReadLimit::InFrame { remaining } => {
                usize::try_from(remaining).map_or(len, |remaining| len.min(remaining))
            }
            _ => len,
        }
    }

    /// Classifies a clean end of stream from the transport.
    ///
    /// Between frames it is an ordinary end of stream. Inside a frame the
    /// payload was truncated and the stream is poisoned; `pending` is the
    /// number of bytes already charged for the read that came up empty.
    pub(crate) fn end_of_stream(&mut self, pending: u64) -> Error {
        match *self {
            ReadLimit::InFrame { remaining } => self.poison(error::frame(
                Violation::TruncatedFrame { remaining: remaining + pending },
            )),
            _ => error::end_of_stream(),
        }
    }

    /// The stream ended after part of a frame header was read.
    pub(crate) fn truncated_header(&mut self) -> Error {
        self.poison(error::frame(Violation::TruncatedHeader))
    }

    /// A varint was cut short by the end of the stream.
    pub(crate) fn truncated_varint(&mut self, expected: usize) -> Error {
        self.poison(error::frame(Violation::TruncatedVarint { expected }))
    }

    /// The transport failed; its state is now unknown.
    pub(crate) fn transport_failed(&mut self, err: std::io::Error) -> Error {
        tracing::warn!(error = %err, "transport failure on framed stream");
        self.poison(error::io(err))
    }
}
