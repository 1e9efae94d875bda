//! Data models
//!
//! Printer-side models reported by the relay and the order model the
//! receipt renderer consumes.

pub mod order;
pub mod printer;

// Re-exports
pub use order::*;
pub use printer::*;
