//! Wire Format Tests
//!
//! End-to-end checks of the frame layout: what the writer emits is what the
//! reader accepts, with frame boundaries enforced in between.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::protocols::{FrameHeader, FrameType, Framer, ReadLimit, VarInt};

    fn write_frames(frames: &[(FrameType, &[u8])]) -> Vec<u8> {
        let mut writer = Framer::new(Vec::new());
        for (ty, payload) in frames {
            writer.write_frame(*ty, payload).unwrap();
        }
        writer.flush().unwrap();
        writer.into_inner()
    }

    /// Every boundary value decodes back through the stream reader with the
    /// minimal width.
    #[test]
    fn test_varint_boundaries_through_stream() {
        let values = [
            0,
            63,
            64,
            16_383,
            16_384,
            1_073_741_823,
            1_073_741_824,
            (1 << 62) - 1,
        ];
        let widths = [1, 1, 2, 2, 4, 4, 8, 8];

        let mut writer = Framer::new(Vec::new());
        for v in values {
            writer.write_varint(v).unwrap();
        }
        let wire = writer.into_inner();
        assert_eq!(wire.len(), widths.iter().sum::<usize>());

        let mut reader = Framer::new(Cursor::new(wire));
        for (v, width) in values.iter().zip(widths) {
            let before = reader.stats().bytes_read;
            assert_eq!(reader.read_varint().unwrap().into_inner(), *v);
            assert_eq!(reader.stats().bytes_read - before, width as u64);
        }
        assert!(reader.read_varint().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn test_integer_too_large_produces_no_output() {
        let mut writer = Framer::new(Vec::new());
        assert!(writer.write_varint(1 << 62).unwrap_err().is_integer_too_large());
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn test_sequence_of_frames_round_trips() {
        let reserved = FrameType::new(0x21);
        let wire = write_frames(&[
            (FrameType::SETTINGS, &[0x06, 0x44, 0x00][..]),
            (reserved, &b"grease"[..]),
            (FrameType::HEADERS, &b""[..]),
            (FrameType::DATA, &[0xaa; 100][..]),
        ]);

        let mut reader = Framer::new(Cursor::new(wire));
        let mut seen = Vec::new();
        loop {
            let header = match reader.read_frame_header() {
                Ok(header) => header,
                Err(err) if err.is_end_of_stream() => break,
                Err(err) => panic!("unexpected error: {err}"),
            };
            let payload = reader.read_frame_data().unwrap();
            assert_eq!(payload.len() as u64, header.len);
            reader.end_frame().unwrap();
            seen.push(header);
        }

        assert_eq!(
            seen,
            [
                FrameHeader::new(FrameType::SETTINGS, 3),
                FrameHeader::new(reserved, 6),
                FrameHeader::new(FrameType::HEADERS, 0),
                FrameHeader::new(FrameType::DATA, 100),
            ]
        );
        assert_eq!(reader.stats().frames_read, 4);
    }

    #[test]
    fn test_double_header_read_is_rejected() {
        let wire = write_frames(&[(FrameType::DATA, &b"xyz"[..]), (FrameType::DATA, &b""[..])]);
        let mut reader = Framer::new(Cursor::new(wire));
        reader.read_frame_header().unwrap();

        let err = reader.read_frame_header().unwrap_err();
        assert!(err.is_frame_error());
        assert_eq!(reader.state(), ReadLimit::InFrame { remaining: 3 });
    }

    #[test]
    fn test_early_end_frame_is_rejected() {
        let wire = write_frames(&[(FrameType::DATA, &b"xyz"[..])]);
        let mut reader = Framer::new(Cursor::new(wire));
        reader.read_frame_header().unwrap();
        reader.read_byte().unwrap();

        assert!(reader.end_frame().unwrap_err().is_frame_error());
        assert_eq!(reader.remaining(), Some(2));
    }

    #[test]
    fn test_reading_one_byte_too_many_poisons() {
        let wire = write_frames(&[(FrameType::DATA, &b"xyz"[..]), (FrameType::DATA, &b"next"[..])]);
        let mut reader = Framer::new(Cursor::new(wire));
        let header = reader.read_frame_header().unwrap();

        for _ in 0..header.len {
            reader.read_byte().unwrap();
        }
        let err = reader.read_byte().unwrap_err();
        assert!(err.is_frame_error());
        assert!(reader.is_poisoned());

        assert!(reader.end_frame().unwrap_err().is_poisoned());
        assert!(reader.read_frame_header().unwrap_err().is_poisoned());
        assert!(reader.write_all(b"late").unwrap_err().is_poisoned());
    }

    #[test]
    fn test_truncated_varint_is_not_end_of_stream() {
        // An 8-byte type field with only 3 bytes on the wire.
        let mut reader = Framer::new(Cursor::new(vec![0xc0, 0x00, 0x00]));
        let err = reader.read_frame_header().unwrap_err();
        assert!(err.is_frame_error());
        assert!(!err.is_end_of_stream());
    }

    #[test]
    fn test_clean_end_between_frames() {
        let wire = write_frames(&[(FrameType::GOAWAY, &[0x00][..])]);
        let mut reader = Framer::new(Cursor::new(wire));
        reader.read_frame_header().unwrap();
        reader.read_frame_data().unwrap();
        reader.end_frame().unwrap();

        let err = reader.read_frame_header().unwrap_err();
        assert!(err.is_end_of_stream());
        assert!(!reader.is_poisoned());
    }

    #[test]
    fn test_header_bytes_match_varint_encoding() {
        let wire = write_frames(&[(FrameType::new(0x1f * 3 + 0x21), &[0u8; 300][..])]);
        let mut expected = Vec::new();
        VarInt::from_u32(0x1f * 3 + 0x21).encode(&mut expected);
        VarInt::from_u32(300).encode(&mut expected);
        assert_eq!(&wire[..expected.len()], &expected[..]);
        assert_eq!(wire.len(), expected.len() + 300);
    }
}
