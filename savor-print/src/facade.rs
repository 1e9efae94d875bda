//! Integration facade
//!
//! Glue between an ordering front end and the print client: render the
//! order, submit it with retry, and keep the status indicator in step.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use savor_client::{
    ClientResult, HealthStatus, HttpClient, NetworkHttpClient, PrintClient, PrintOptions,
    PrintResult,
};
use savor_receipt::ReceiptRenderer;
use shared::OrderData;
use tracing::{error, info, instrument, warn};

use crate::status::{MessageKind, PrintStatus, StatusReporter};

/// How long Success or Error stays up before the indicator returns to Online
pub const DEFAULT_STATUS_RESET: Duration = Duration::from_secs(3);
/// How long a user message stays visible
pub const DEFAULT_MESSAGE_DURATION: Duration = Duration::from_secs(5);

pub const PRINT_SUCCESS_MESSAGE: &str = "Receipt printed successfully!";

/// Timing of status feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacadeSettings {
    pub status_reset_delay: Duration,
    pub message_duration: Duration,
}

impl Default for FacadeSettings {
    fn default() -> Self {
        Self {
            status_reset_delay: DEFAULT_STATUS_RESET,
            message_duration: DEFAULT_MESSAGE_DURATION,
        }
    }
}

pub struct IntegrationFacade<R: StatusReporter, H: HttpClient = NetworkHttpClient> {
    client: PrintClient<H>,
    renderer: ReceiptRenderer,
    reporter: Arc<R>,
    settings: FacadeSettings,
    /// Bumped on every status change; a pending reset only fires if unchanged
    generation: Arc<AtomicU64>,
}

impl<R: StatusReporter, H: HttpClient> IntegrationFacade<R, H> {
    pub fn new(client: PrintClient<H>, renderer: ReceiptRenderer, reporter: R) -> Self {
        Self {
            client,
            renderer,
            reporter: Arc::new(reporter),
            settings: FacadeSettings::default(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_settings(mut self, settings: FacadeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn client(&self) -> &PrintClient<H> {
        &self.client
    }

    pub fn renderer(&self) -> &ReceiptRenderer {
        &self.renderer
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Check the relay and report Online or Offline
    #[instrument(skip(self))]
    pub async fn initialize_connection(&self) -> ClientResult<HealthStatus> {
        match self.client.check_server_status().await {
            Ok(health) => {
                info!("Print system initialized");
                self.set_status(PrintStatus::Online);
                Ok(health)
            }
            Err(e) => {
                warn!(error = %e, "Print system initialization failed");
                self.set_status(PrintStatus::Offline);
                Err(e)
            }
        }
    }

    /// Render and print an order
    ///
    /// Never fails: errors come back as [`PrintResult::Failure`] after being
    /// reported.
    #[instrument(skip(self, order), fields(order_id = ?order.order_id, table = ?order.table))]
    pub async fn print_order(&self, order: &OrderData) -> PrintResult {
        self.set_status(PrintStatus::Printing);

        let text = self.renderer.render(order);
        let options = PrintOptions {
            restaurant_id: None,
            order_id: order.order_id.clone(),
            table: order.table.clone(),
        };

        match self.client.print_with_retry(&text, &options).await {
            Ok(result) => {
                info!(queued = result.is_queued(), "Order printed");
                self.finish(PrintStatus::Success, PRINT_SUCCESS_MESSAGE, MessageKind::Success);
                result
            }
            Err(e) => {
                error!(error = %e, "Print order failed");
                let message = format!("Print failed: {e}");
                self.finish(PrintStatus::Error, &message, MessageKind::Error);
                PrintResult::Failure {
                    message: e.to_string(),
                }
            }
        }
    }

    fn set_status(&self, status: PrintStatus) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.reporter.set_status(status);
        generation
    }

    fn finish(&self, status: PrintStatus, message: &str, kind: MessageKind) {
        let generation = self.set_status(status);
        self.reporter
            .show_message(message, kind, self.settings.message_duration);
        if status.is_transient() {
            self.schedule_reset(generation);
        }
    }

    /// Return to Online after the reset delay unless the status moved on
    fn schedule_reset(&self, generation: u64) {
        let reporter = Arc::clone(&self.reporter);
        let current = Arc::clone(&self.generation);
        let delay = self.settings.status_reset_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current
                .compare_exchange(generation, generation + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                reporter.set_status(PrintStatus::Online);
            }
        });
    }
}
