//! Framing telemetry

pub mod framer_stats;

pub use framer_stats::FramerStats;
