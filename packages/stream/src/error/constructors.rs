use super::types::{Error, Kind, Violation};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creates an `Error` for a framing violation.
pub fn frame(violation: Violation) -> Error {
    Error::from(violation)
}

/// Creates an `Error` for a clean end of stream between frames.
pub fn end_of_stream() -> Error {
    Error::new(Kind::EndOfStream)
}

/// Creates an `Error` for a value outside the varint range.
pub fn integer_too_large(value: u64) -> Error {
    Error::new(Kind::IntegerTooLarge).with(super::helpers::TooLarge(value))
}

/// Creates an `Error` wrapping a transport failure.
pub fn io<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Io).with(e.into())
}
