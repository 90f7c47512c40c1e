//! Blocking framer tests against transports that deliver data piecemeal,
//! get interrupted, or sit on a real socket.

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    use h3frame_stream::{FrameHeader, FrameType, Framer, FramerConfig, Violation};

    /// Hands out at most `chunk` bytes per read and reports `Interrupted`
    /// before every other read.
    struct Trickle {
        data: Cursor<Vec<u8>>,
        chunk: usize,
        interrupt: bool,
    }

    impl Trickle {
        fn new(data: Vec<u8>, chunk: usize) -> Self {
            Self {
                data: Cursor::new(data),
                chunk,
                interrupt: false,
            }
        }
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            let n = buf.len().min(self.chunk);
            self.data.read(&mut buf[..n])
        }
    }

    fn encode(frames: &[(FrameType, &[u8])]) -> Vec<u8> {
        let mut framer = Framer::new(Vec::new());
        for (ty, payload) in frames {
            framer.write_frame(*ty, payload).expect("encode frame");
        }
        framer.into_inner()
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_trickled_stream_reassembles_frames() {
        init_logging();

        let body = vec![0x5a; 5000];
        let wire = encode(&[
            (FrameType::HEADERS, &[0x00, 0x00, 0xd9][..]),
            (FrameType::DATA, &body[..]),
        ]);

        let config = FramerConfig::default().with_initial_read_buffer(512);
        let mut framer = Framer::with_config(Trickle::new(wire, 3), config);

        let headers = framer.read_frame_header().unwrap();
        assert_eq!(headers, FrameHeader::new(FrameType::HEADERS, 3));
        assert_eq!(framer.read_frame_data().unwrap(), &[0x00, 0x00, 0xd9][..]);
        framer.end_frame().unwrap();

        let data = framer.read_frame_header().unwrap();
        assert_eq!(data, FrameHeader::new(FrameType::DATA, 5000));
        assert_eq!(framer.read_frame_data().unwrap(), body);
        framer.end_frame().unwrap();

        assert!(framer.read_frame_header().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn test_settings_payload_parsed_field_by_field() {
        // SETTINGS: QPACK_MAX_TABLE_CAPACITY (0x01) = 4096,
        // MAX_FIELD_SECTION_SIZE (0x06) = 16384
        let mut payload = Framer::new(Vec::new());
        for v in [0x01, 4096, 0x06, 16_384] {
            payload.write_varint(v).unwrap();
        }
        let payload = payload.into_inner();
        let wire = encode(&[(FrameType::SETTINGS, &payload[..])]);

        let mut framer = Framer::new(Cursor::new(wire));
        framer.read_frame_header().unwrap();

        let mut settings = Vec::new();
        while framer.remaining() != Some(0) {
            let id = framer.read_varint().unwrap().into_inner();
            let value = framer.read_varint().unwrap().into_inner();
            settings.push((id, value));
        }
        framer.end_frame().unwrap();

        assert_eq!(settings, [(0x01, 4096), (0x06, 16_384)]);
    }

    #[test]
    fn test_unknown_frames_can_be_skipped() {
        let wire = encode(&[
            (FrameType::new(0x21 + 0x1f), &b"ignored"[..]),
            (FrameType::DATA, &b"kept"[..]),
        ]);
        let mut framer = Framer::new(Cursor::new(wire));

        let mut kept = Vec::new();
        while let Ok(header) = framer.read_frame_header() {
            if header.ty.is_reserved() {
                let mut sink = [0u8; 4];
                while framer.remaining() != Some(0) {
                    framer.read(&mut sink).unwrap();
                }
            } else {
                kept.extend_from_slice(&framer.read_frame_data().unwrap());
            }
            framer.end_frame().unwrap();
        }
        assert_eq!(kept, b"kept");
    }

    #[test]
    fn test_frame_cut_short_by_peer() {
        init_logging();

        let mut wire = encode(&[(FrameType::DATA, &[1u8; 10][..])]);
        wire.truncate(6);

        let mut framer = Framer::new(Trickle::new(wire, 2));
        framer.read_frame_header().unwrap();
        let err = framer.read_frame_data().unwrap_err();
        assert!(err.is_frame_error());
        assert_eq!(err.violation(), Some(&Violation::TruncatedFrame { remaining: 6 }));
        assert!(framer.is_poisoned());
    }

    #[test]
    fn test_frames_over_tcp() {
        init_logging();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let writer = thread::spawn(move || {
            let stream = TcpStream::connect(addr).unwrap();
            let mut framer = Framer::new(stream);
            framer.write_frame(FrameType::SETTINGS, &[]).unwrap();
            framer.write_frame_header(FrameType::DATA, 6).unwrap();
            framer.write_all(b"abc").unwrap();
            framer.flush().unwrap();
            framer.write_all(b"def").unwrap();
            framer.flush().unwrap();
            framer.stats()
        });

        let (stream, _) = listener.accept().unwrap();
        let mut framer = Framer::new(stream);

        assert_eq!(framer.read_frame_header().unwrap().ty, FrameType::SETTINGS);
        framer.end_frame().unwrap();
        assert_eq!(framer.read_frame_header().unwrap().len, 6);
        assert_eq!(framer.read_frame_data().unwrap(), &b"abcdef"[..]);
        framer.end_frame().unwrap();

        let sent = writer.join().unwrap();
        assert!(framer.read_frame_header().unwrap_err().is_end_of_stream());
        assert_eq!(sent.frames_written, 2);
        assert_eq!(framer.stats().bytes_read, sent.bytes_written);
    }
}
