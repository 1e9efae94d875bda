//! Request/response types exchanged with the cloud print relay
//!
//! Field names follow the relay's snake_case JSON contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::PrinterInfo;

// =============================================================================
// Print API DTOs
// =============================================================================

/// Reasons a print request cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("print text must not be empty")]
    EmptyText,

    #[error("restaurant id must not be empty")]
    MissingRestaurantId,
}

/// Call-site overrides for a single print
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    /// Overrides the client's configured restaurant
    pub restaurant_id: Option<String>,
    pub order_id: Option<String>,
    pub table: Option<String>,
}

impl PrintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restaurant_id(mut self, restaurant_id: impl Into<String>) -> Self {
        self.restaurant_id = Some(restaurant_id.into());
        self
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

/// Body of `POST /print`
///
/// Built fresh for every attempt and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRequest {
    pub restaurant_id: String,
    pub text: String,
    /// ISO-8601 creation time
    pub timestamp: String,
    pub order_id: Option<String>,
    pub table: Option<String>,
}

impl PrintRequest {
    /// Build a request, resolving the restaurant from `options` or `default_restaurant_id`
    pub fn new(
        text: &str,
        options: &PrintOptions,
        default_restaurant_id: &str,
        timestamp: impl Into<String>,
    ) -> Result<Self, RequestError> {
        if text.trim().is_empty() {
            return Err(RequestError::EmptyText);
        }

        let restaurant_id = options
            .restaurant_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(default_restaurant_id);
        if restaurant_id.is_empty() {
            return Err(RequestError::MissingRestaurantId);
        }

        Ok(Self {
            restaurant_id: restaurant_id.to_string(),
            text: text.to_string(),
            timestamp: timestamp.into(),
            order_id: options.order_id.clone(),
            table: options.table.clone(),
        })
    }
}

/// Outcome of a print submission
///
/// `Queued` means the relay accepted the job but has not printed it yet. For
/// the caller it counts as a success: the relay owns the job from here on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrintResult {
    Success {
        message: String,
        restaurant_id: String,
        printer_ip: String,
        timestamp: String,
    },
    Queued {
        message: String,
    },
    Failure {
        message: String,
    },
}

impl PrintResult {
    /// Success and Queued both satisfy the caller
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Queued { .. })
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Queued { message } | Self::Failure { message } => {
                message
            }
        }
    }
}

/// Response of `POST /test/{restaurant_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub restaurant_id: Option<String>,
    pub printer_info: Option<serde_json::Value>,
}

// =============================================================================
// Printer registration DTOs
// =============================================================================

/// A restaurant printer to announce to the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterRegistration {
    pub restaurant_id: String,
    pub printer_ip: String,
    #[serde(default = "crate::models::default_printer_port")]
    pub printer_port: u16,
    pub location: Option<String>,
}

/// Response of `POST /printers/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub printer_info: Option<PrinterInfo>,
}
