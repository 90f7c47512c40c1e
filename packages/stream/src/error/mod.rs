pub mod classification;
pub mod constructors;
pub mod helpers;
pub mod types;

pub use classification::Code;
pub use constructors::*;
pub use helpers::TimedOut;
pub use types::{Error, Kind, Result, Violation};
