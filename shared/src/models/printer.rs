//! Printer Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw TCP port most thermal printers listen on
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

pub(crate) fn default_printer_port() -> u16 {
    DEFAULT_PRINTER_PORT
}

/// A printer registered with the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterInfo {
    /// Owning restaurant; filled from the registry key when the relay omits it
    #[serde(default)]
    pub restaurant_id: String,
    pub ip: String,
    #[serde(default = "default_printer_port")]
    pub port: u16,
    pub location: Option<String>,
    pub status: Option<String>,
    pub last_seen: Option<String>,
}

impl PrinterInfo {
    /// Parse the relay's `registered_printers` field
    ///
    /// The relay keys printers by restaurant id in an object; newer relays
    /// send a plain array. Object entries come back ordered by restaurant id.
    pub fn list_from_value(value: Value) -> Result<Vec<PrinterInfo>, serde_json::Error> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(_) => serde_json::from_value(value),
            Value::Object(map) => {
                let mut printers = map
                    .into_iter()
                    .map(|(restaurant_id, entry)| {
                        let mut info: PrinterInfo = serde_json::from_value(entry)?;
                        if info.restaurant_id.is_empty() {
                            info.restaurant_id = restaurant_id;
                        }
                        Ok(info)
                    })
                    .collect::<Result<Vec<_>, serde_json::Error>>()?;
                printers.sort_by(|a, b| a.restaurant_id.cmp(&b.restaurant_id));
                Ok(printers)
            }
            other => serde_json::from_value(other),
        }
    }

    /// `ip:port` address of the printer
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

/// Relay health report
///
/// The relay defines the shape; well-known fields are typed and everything
/// else is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: Option<String>,
    pub server: Option<String>,
    pub version: Option<String>,
    pub registered_printers: Option<u64>,
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some("healthy")
    }
}

/// A job waiting in the relay's retry queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedJob {
    pub id: String,
    pub restaurant_id: String,
    #[serde(default)]
    pub text: String,
    pub timestamp: Option<String>,
    #[serde(default)]
    pub attempts: u32,
}

/// Response of `GET /queue`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    #[serde(default)]
    pub queue_size: usize,
    #[serde(default)]
    pub jobs: Vec<QueuedJob>,
}
