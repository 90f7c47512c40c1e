use std::error::Error as StdError;
use std::fmt;

/// A Result alias where the Err case is `h3frame_stream::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while framing an HTTP/3 stream.
pub struct Error {
    pub(crate) inner: Box<Inner>,
}

pub(crate) struct Inner {
    pub(crate) kind: Kind,
    pub(crate) source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Broad category of a framing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Kind {
    /// A framing invariant was violated (`H3_FRAME_ERROR`).
    Frame,
    /// The transport ended cleanly between frames.
    EndOfStream,
    /// A value above `VarInt::MAX` was handed to the encoder.
    IntegerTooLarge,
    /// The underlying transport failed.
    Io,
}

/// Specific framing violation carried as the source of a `Kind::Frame` error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Violation {
    #[error("frame header read while a frame of {remaining} bytes is still open")]
    NestedHeader { remaining: u64 },
    #[error("frame ended with {remaining} unread bytes")]
    FrameNotConsumed { remaining: u64 },
    #[error("no frame is open")]
    NoActiveFrame,
    #[error("read of {requested} bytes crosses the frame boundary ({remaining} remaining)")]
    LimitExceeded { requested: u64, remaining: u64 },
    #[error("stream ended inside a frame header")]
    TruncatedHeader,
    #[error("stream ended inside a {expected}-byte varint")]
    TruncatedVarint { expected: usize },
    #[error("stream ended with {remaining} frame bytes outstanding")]
    TruncatedFrame { remaining: u64 },
    #[error("frame payload of {len} bytes exceeds the {max}-byte limit")]
    PayloadTooLarge { len: u64, max: u64 },
    #[error("stream is poisoned by an earlier framing failure")]
    Poisoned,
}

impl Error {
    pub(crate) fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner { kind, source: None }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub(crate) fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    /// The broad category of this error.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// The framing violation behind a `Kind::Frame` error.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        self.inner
            .source
            .as_ref()
            .and_then(|source| source.downcast_ref::<Violation>())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("h3frame::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.inner.kind {
            Kind::Frame => "frame protocol error",
            Kind::EndOfStream => "end of stream",
            Kind::IntegerTooLarge => "integer too large for varint encoding",
            Kind::Io => "transport error",
        };
        match &self.inner.source {
            Some(source) if self.inner.kind != Kind::EndOfStream => write!(f, "{prefix}: {source}"),
            _ => f.write_str(prefix),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

impl From<Violation> for Error {
    fn from(violation: Violation) -> Self {
        Error::new(Kind::Frame).with(violation)
    }
}
