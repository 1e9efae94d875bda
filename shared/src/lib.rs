//! Shared types for the Savor Spoon print client
//!
//! Wire types exchanged with the cloud print relay and the order data
//! consumed by the receipt renderer. No I/O lives here.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use client::{
    PrintOptions, PrintRequest, PrintResult, PrinterRegistration, RegistrationResult,
    RequestError, TestResult,
};
pub use models::{HealthStatus, OrderData, OrderItem, PrinterInfo, QueueStatus, QueuedJob};
pub use serde::{Deserialize, Serialize};
