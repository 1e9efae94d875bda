//! Order files for the operator binary

use std::path::Path;

use shared::OrderData;

use crate::error::{AppError, AppResult};

/// Read an order from a JSON file
pub fn read_order(path: &Path) -> AppResult<OrderData> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ReadOrder {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| AppError::ParseOrder {
        path: path.to_path_buf(),
        source,
    })
}
