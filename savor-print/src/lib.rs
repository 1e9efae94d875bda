//! Savor Spoon print integration
//!
//! [`IntegrationFacade`] turns orders into printed receipts through the
//! cloud print relay and reports progress through a [`StatusReporter`].

pub mod config;
pub mod error;
pub mod facade;
pub mod logger;
pub mod orders;
pub mod status;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use facade::{FacadeSettings, IntegrationFacade};
pub use status::{
    MessageKind, NoopReporter, PrintStatus, RecordingReporter, ReportEvent, StatusReporter,
    TerminalReporter,
};
