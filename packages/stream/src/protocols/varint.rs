//! QUIC variable-length integers (RFC 9000 §16)
//!
//! The two most significant bits of the first byte give the encoded width
//! (`00` → 1, `01` → 2, `10` → 4, `11` → 8 bytes); the remaining bits hold the
//! value in network byte order.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{self, Error};

/// An integer in the range `0..=VarInt::MAX`.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarInt(u64);

/// The buffer ran out before a complete varint could be decoded.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unexpected end of buffer")]
pub struct UnexpectedEnd;

impl VarInt {
    /// The largest representable value, `2^62 - 1`.
    pub const MAX: VarInt = VarInt((1 << 62) - 1);
    /// The widest encoding, in bytes.
    pub const MAX_SIZE: usize = 8;

    /// Wraps `value`, rejecting anything above `VarInt::MAX`.
    ///
    /// # Errors
    ///
    /// Returns an `IntegerTooLarge` error when `value > 2^62 - 1`.
    #[inline]
    pub fn from_u64(value: u64) -> Result<Self, Error> {
        if value <= Self::MAX.0 {
            Ok(VarInt(value))
        } else {
            Err(error::integer_too_large(value))
        }
    }

    /// Every `u32` fits.
    #[inline]
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        VarInt(value as u64)
    }

    /// Wraps `value` without a range check.
    ///
    /// Callers must guarantee `value <= VarInt::MAX`; the decoder relies on
    /// this since 62 bits is all the wire format can carry.
    #[inline]
    pub(crate) const fn from_u64_unchecked(value: u64) -> Self {
        VarInt(value)
    }

    #[inline]
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// Number of bytes the minimal encoding of this value takes.
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        let x = self.0;
        if x < 1 << 6 {
            1
        } else if x < 1 << 14 {
            2
        } else if x < 1 << 30 {
            4
        } else {
            8
        }
    }

    /// Total encoded width announced by the first byte of a varint.
    #[inline]
    #[must_use]
    pub const fn encoded_len(first: u8) -> usize {
        1 << (first >> 6)
    }

    /// Writes the minimal encoding of this value.
    pub fn encode<B: BufMut>(self, buf: &mut B) {
        let x = self.0;
        match self.size() {
            1 => buf.put_u8(x as u8),
            2 => buf.put_u16(0b01 << 14 | x as u16),
            4 => buf.put_u32(0b10 << 30 | x as u32),
            _ => buf.put_u64(0b11 << 62 | x),
        }
    }

    /// Encodes into a fixed array, returning it with the number of bytes used.
    #[must_use]
    pub fn to_array(self) -> ([u8; Self::MAX_SIZE], usize) {
        let mut out = [0u8; Self::MAX_SIZE];
        let len = self.size();
        let mut dst = &mut out[..];
        self.encode(&mut dst);
        (out, len)
    }

    /// Reads one varint from the front of `buf`.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEnd` if `buf` holds fewer bytes than the first byte
    /// announces. Nothing is consumed in that case.
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, UnexpectedEnd> {
        if !buf.has_remaining() {
            return Err(UnexpectedEnd);
        }
        let len = Self::encoded_len(buf.chunk()[0]);
        if buf.remaining() < len {
            return Err(UnexpectedEnd);
        }
        let value = match len {
            1 => u64::from(buf.get_u8() & 0x3f),
            2 => u64::from(buf.get_u16() & 0x3fff),
            4 => u64::from(buf.get_u32() & 0x3fff_ffff),
            _ => buf.get_u64() & 0x3fff_ffff_ffff_ffff,
        };
        Ok(VarInt(value))
    }
}

impl From<VarInt> for u64 {
    #[inline]
    fn from(x: VarInt) -> u64 {
        x.0
    }
}

impl From<u8> for VarInt {
    #[inline]
    fn from(x: u8) -> Self {
        VarInt(u64::from(x))
    }
}

impl From<u16> for VarInt {
    #[inline]
    fn from(x: u16) -> Self {
        VarInt(u64::from(x))
    }
}

impl From<u32> for VarInt {
    #[inline]
    fn from(x: u32) -> Self {
        VarInt::from_u32(x)
    }
}

impl TryFrom<u64> for VarInt {
    type Error = Error;

    #[inline]
    fn try_from(x: u64) -> Result<Self, Error> {
        VarInt::from_u64(x)
    }
}

impl TryFrom<usize> for VarInt {
    type Error = Error;

    #[inline]
    fn try_from(x: usize) -> Result<Self, Error> {
        VarInt::from_u64(x as u64)
    }
}

impl fmt::Display for VarInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Accumulates a varint fed one byte at a time.
///
/// Shared by the blocking and async framers, which pull bytes from different
/// kinds of transport but must agree on the decoding.
#[derive(Debug)]
pub(crate) struct VarIntDecoder {
    value: u64,
    len: usize,
    seen: usize,
}

impl VarIntDecoder {
    pub(crate) fn new(first: u8) -> Self {
        Self {
            value: u64::from(first & 0x3f),
            len: VarInt::encoded_len(first),
            seen: 1,
        }
    }

    /// Total width announced by the first byte.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.seen == self.len
    }

    pub(crate) fn push(&mut self, byte: u8) {
        debug_assert!(!self.is_complete());
        self.value = (self.value << 8) | u64::from(byte);
        self.seen += 1;
    }

    pub(crate) fn finish(self) -> VarInt {
        debug_assert!(self.is_complete());
        VarInt::from_u64_unchecked(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(v: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        VarInt::from_u64(v).expect("in range").encode(&mut buf);
        buf
    }

    #[test]
    fn test_rfc9000_sample_encodings() {
        // RFC 9000 Appendix A.1
        assert_eq!(encoded(151_288_809_941_952_652), [0xc2, 0x19, 0x7c, 0x5e, 0xff, 0x14, 0xe8, 0x8c]);
        assert_eq!(encoded(494_878_333), [0x9d, 0x7f, 0x3e, 0x7d]);
        assert_eq!(encoded(15_293), [0x7b, 0xbd]);
        assert_eq!(encoded(37), [0x25]);
    }

    #[test]
    fn test_non_minimal_encoding_decodes() {
        // 37 in two bytes, also from RFC 9000 Appendix A.1
        let mut buf = &[0x40, 0x25][..];
        assert_eq!(VarInt::decode(&mut buf), Ok(VarInt(37)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_size_boundaries() {
        for (value, size) in [
            (0, 1),
            (63, 1),
            (64, 2),
            (16_383, 2),
            (16_384, 4),
            (1_073_741_823, 4),
            (1_073_741_824, 8),
            (VarInt::MAX.0, 8),
        ] {
            assert_eq!(encoded(value).len(), size, "width of {value}");
            let mut buf = &encoded(value)[..];
            assert_eq!(VarInt::decode(&mut buf).map(u64::from), Ok(value));
        }
    }

    #[test]
    fn test_too_large_is_an_error() {
        let err = VarInt::from_u64(1 << 62).unwrap_err();
        assert!(err.is_integer_too_large());
        assert!(VarInt::try_from(u64::MAX).is_err());
    }

    #[test]
    fn test_decode_short_buffer_consumes_nothing() {
        let mut buf = &[0xc0, 0x00, 0x01][..];
        assert_eq!(VarInt::decode(&mut buf), Err(UnexpectedEnd));
        assert_eq!(buf.len(), 3);

        let mut empty = &[][..];
        assert_eq!(VarInt::decode(&mut empty), Err(UnexpectedEnd));
    }

    #[test]
    fn test_incremental_decoder_matches_buffer_decoder() {
        let bytes = encoded(494_878_333);
        let mut decoder = VarIntDecoder::new(bytes[0]);
        assert_eq!(decoder.len(), 4);
        for &b in &bytes[1..] {
            decoder.push(b);
        }
        assert!(decoder.is_complete());
        assert_eq!(decoder.finish(), VarInt(494_878_333));
    }

    #[test]
    fn test_to_array() {
        let (bytes, len) = VarInt::from_u32(15_293).to_array();
        assert_eq!(&bytes[..len], &[0x7b, 0xbd]);
    }
}
