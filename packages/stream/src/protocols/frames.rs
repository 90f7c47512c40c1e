//! HTTP/3 frame type codes and headers (RFC 9114 §7.2)

use std::fmt;

use super::varint::VarInt;
use crate::error::Result;

/// HTTP/3 frame type.
///
/// The code space is open-ended: unknown types are carried through so the
/// caller can skip them, as RFC 9114 §9 requires.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameType(u64);

impl FrameType {
    pub const DATA: FrameType = FrameType(0x0);
    pub const HEADERS: FrameType = FrameType(0x1);
    pub const CANCEL_PUSH: FrameType = FrameType(0x3);
    pub const SETTINGS: FrameType = FrameType(0x4);
    pub const PUSH_PROMISE: FrameType = FrameType(0x5);
    pub const GOAWAY: FrameType = FrameType(0x7);
    pub const MAX_PUSH_ID: FrameType = FrameType(0xd);

    #[inline]
    #[must_use]
    pub const fn new(code: u64) -> Self {
        FrameType(code)
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Reserved "grease" types of the form `0x1f * N + 0x21`.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 >= 0x21 && (self.0 - 0x21) % 0x1f == 0
    }

    /// HTTP/2 frame types that have no HTTP/3 equivalent and must be treated
    /// as a connection error when received (RFC 9114 §7.2.8).
    #[must_use]
    pub const fn is_http2_only(self) -> bool {
        matches!(self.0, 0x2 | 0x6 | 0x8 | 0x9)
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            FrameType::DATA => "DATA",
            FrameType::HEADERS => "HEADERS",
            FrameType::CANCEL_PUSH => "CANCEL_PUSH",
            FrameType::SETTINGS => "SETTINGS",
            FrameType::PUSH_PROMISE => "PUSH_PROMISE",
            FrameType::GOAWAY => "GOAWAY",
            FrameType::MAX_PUSH_ID => "MAX_PUSH_ID",
            _ => return None,
        })
    }
}

impl From<VarInt> for FrameType {
    #[inline]
    fn from(code: VarInt) -> Self {
        FrameType(code.into_inner())
    }
}

impl fmt::Debug for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "FrameType({:#x})", self.0),
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None if self.is_reserved() => write!(f, "reserved({:#x})", self.0),
            None => write!(f, "unknown({:#x})", self.0),
        }
    }
}

/// Type and length of the frame currently open on a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub ty: FrameType,
    pub len: u64,
}

impl FrameHeader {
    /// Largest header on the wire: two eight-byte varints.
    pub const MAX_SIZE: usize = 2 * VarInt::MAX_SIZE;

    #[inline]
    #[must_use]
    pub const fn new(ty: FrameType, len: u64) -> Self {
        Self { ty, len }
    }

    /// Bytes the header itself occupies on the wire, if both fields fit the
    /// varint range.
    #[must_use]
    pub fn encoded_len(&self) -> Option<usize> {
        let ty = VarInt::from_u64(self.ty.value()).ok()?;
        let len = VarInt::from_u64(self.len).ok()?;
        Some(ty.size() + len.size())
    }

    /// Encodes type then length into a stack buffer, returning it with the
    /// number of bytes used.
    ///
    /// # Errors
    ///
    /// `IntegerTooLarge` if either field is outside the varint range.
    pub fn to_array(&self) -> Result<([u8; Self::MAX_SIZE], usize)> {
        let ty = VarInt::from_u64(self.ty.value())?;
        let len = VarInt::from_u64(self.len)?;

        let mut out = [0u8; Self::MAX_SIZE];
        let mut dst = &mut out[..];
        ty.encode(&mut dst);
        len.encode(&mut dst);
        Ok((out, ty.size() + len.size()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_types() {
        assert!(FrameType::new(0x21).is_reserved());
        assert!(FrameType::new(0x21 + 0x1f * 7).is_reserved());
        assert!(!FrameType::new(0x20).is_reserved());
        assert!(!FrameType::SETTINGS.is_reserved());
    }

    #[test]
    fn test_http2_only_types() {
        for code in [0x2, 0x6, 0x8, 0x9] {
            assert!(FrameType::new(code).is_http2_only());
        }
        assert!(!FrameType::DATA.is_http2_only());
        assert!(!FrameType::GOAWAY.is_http2_only());
    }

    #[test]
    fn test_display() {
        assert_eq!(FrameType::HEADERS.to_string(), "HEADERS");
        assert_eq!(FrameType::new(0x40).to_string(), "reserved(0x40)");
        assert_eq!(FrameType::new(0x2a).to_string(), "unknown(0x2a)");
    }

    #[test]
    fn test_header_encoded_len() {
        assert_eq!(FrameHeader::new(FrameType::DATA, 63).encoded_len(), Some(2));
        assert_eq!(FrameHeader::new(FrameType::DATA, 64).encoded_len(), Some(3));
        assert_eq!(FrameHeader::new(FrameType::new(u64::MAX), 0).encoded_len(), None);
    }

    #[test]
    fn test_header_to_array() {
        let (bytes, n) = FrameHeader::new(FrameType::SETTINGS, 16_384).to_array().unwrap();
        assert_eq!(&bytes[..n], &[0x04, 0x80, 0x00, 0x40, 0x00]);

        let (bytes, n) = FrameHeader::new(FrameType::new(VarInt::MAX.into_inner()), 0)
            .to_array()
            .unwrap();
        assert_eq!(n, 9);
        assert_eq!(&bytes[..8], &[0xff; 8]);
        assert_eq!(bytes[8], 0x00);

        let err = FrameHeader::new(FrameType::DATA, 1 << 62).to_array().unwrap_err();
        assert!(err.is_integer_too_large());
    }
}
