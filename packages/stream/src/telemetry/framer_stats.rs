//! Per-stream framing statistics
//!
//! A framer has exactly one owner, so the counters are plain integers rather
//! than atomics. `snapshot` hands out a copy.

/// Counters maintained by a framer over the life of its stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FramerStats {
    /// Frame headers successfully read
    pub frames_read: u64,
    /// Frame headers written through `write_frame_header`/`write_frame`
    pub frames_written: u64,
    /// Bytes pulled from the transport, headers included
    pub bytes_read: u64,
    /// Bytes handed to the transport
    pub bytes_written: u64,
}

impl FramerStats {
    #[inline]
    pub(crate) fn record_read(&mut self, n: usize) {
        self.bytes_read += n as u64;
    }

    #[inline]
    pub(crate) fn record_write(&mut self, n: usize) {
        self.bytes_written += n as u64;
    }

    /// Snapshot of the current counters
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> FramerStats {
        *self
    }
}
