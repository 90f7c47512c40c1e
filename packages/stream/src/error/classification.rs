use std::error::Error as StdError;
use std::fmt;
use std::io;

use super::helpers::TimedOut;
use super::types::{Error, Kind, Violation};

/// HTTP/3 application error code (RFC 9114 §8.1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(u64);

impl Code {
    pub const H3_NO_ERROR: Code = Code(0x100);
    pub const H3_INTERNAL_ERROR: Code = Code(0x102);
    pub const H3_FRAME_ERROR: Code = Code(0x106);
    pub const H3_EXCESSIVE_LOAD: Code = Code(0x107);

    /// The numeric value sent on the wire.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Code::H3_NO_ERROR => f.write_str("H3_NO_ERROR"),
            Code::H3_INTERNAL_ERROR => f.write_str("H3_INTERNAL_ERROR"),
            Code::H3_FRAME_ERROR => f.write_str("H3_FRAME_ERROR"),
            Code::H3_EXCESSIVE_LOAD => f.write_str("H3_EXCESSIVE_LOAD"),
            Code(other) => write!(f, "Code({other:#x})"),
        }
    }
}

impl Error {
    /// Returns true if a framing invariant was violated.
    #[must_use]
    pub fn is_frame_error(&self) -> bool {
        matches!(self.inner.kind, Kind::Frame)
    }

    /// Returns true if the transport ended cleanly between frames.
    #[must_use]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self.inner.kind, Kind::EndOfStream)
    }

    /// Returns true if the varint encoder rejected an out-of-range value.
    #[must_use]
    pub fn is_integer_too_large(&self) -> bool {
        matches!(self.inner.kind, Kind::IntegerTooLarge)
    }

    /// Returns true if the underlying transport failed.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self.inner.kind, Kind::Io)
    }

    /// Returns true if the operation was refused because the stream was
    /// already poisoned.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        matches!(self.violation(), Some(Violation::Poisoned))
    }

    /// Returns true if the error is related to a timeout.
    ///
    /// The whole source chain is inspected, so a deadline reported by the
    /// transport is still recognised after being wrapped by other layers.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if err.is::<TimedOut>() {
                return true;
            }
            if let Some(io) = err.downcast_ref::<io::Error>() {
                if io.kind() == io::ErrorKind::TimedOut {
                    return true;
                }
                if let Some(inner) = io.get_ref()
                    && inner.is::<TimedOut>()
                {
                    return true;
                }
            }
            source = err.source();
        }

        false
    }

    /// The application error code a caller should use when closing the stream
    /// after this error.
    #[must_use]
    pub fn code(&self) -> Code {
        match self.inner.kind {
            Kind::Frame => match self.violation() {
                Some(Violation::PayloadTooLarge { .. }) => Code::H3_EXCESSIVE_LOAD,
                _ => Code::H3_FRAME_ERROR,
            },
            Kind::EndOfStream => Code::H3_NO_ERROR,
            Kind::IntegerTooLarge | Kind::Io => Code::H3_INTERNAL_ERROR,
        }
    }
}
