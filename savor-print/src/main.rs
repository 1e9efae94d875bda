//! savor-print - operator tool for the Savor Spoon cloud print relay
//!
//! # Usage
//!
//! ```bash
//! # Relay health
//! SAVOR_PRINT_API_KEY=... savor-print health
//!
//! # Print an order exported from the website
//! savor-print print --order order.json
//!
//! # Preview a receipt without touching the network
//! savor-print render --order order.json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use savor_client::{PrintClient, PrinterRegistration};
use savor_print::facade::FacadeSettings;
use savor_print::orders::read_order;
use savor_print::{AppConfig, IntegrationFacade, TerminalReporter, logger};
use serde::Serialize;
use shared::PrintResult;
use shared::models::DEFAULT_PRINTER_PORT;

#[derive(Parser)]
#[command(name = "savor-print")]
#[command(author, version, about = "Savor Spoon cloud print client")]
struct Cli {
    /// Relay base URL
    #[arg(long, global = true, env = "SAVOR_PRINT_SERVER_URL")]
    server_url: Option<String>,

    /// Default restaurant
    #[arg(long, global = true, env = "SAVOR_PRINT_RESTAURANT_ID")]
    restaurant_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay health
    Health,
    /// List printers registered with the relay
    Printers,
    /// Print the relay's test page
    Test {
        /// Target restaurant, defaults to the configured one
        #[arg(long = "target")]
        target: Option<String>,
    },
    /// Show the relay's retry queue
    Queue,
    /// Register a restaurant printer
    Register {
        /// Printer LAN address
        #[arg(long)]
        ip: String,

        #[arg(long, default_value_t = DEFAULT_PRINTER_PORT)]
        port: u16,

        /// Human-readable location
        #[arg(long)]
        location: Option<String>,
    },
    /// Render and print an order
    Print {
        /// Order JSON file
        #[arg(long)]
        order: PathBuf,
    },
    /// Render an order to stdout without printing
    Render {
        /// Order JSON file
        #[arg(long)]
        order: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.server_url {
        config.server_url = url;
    }
    if let Some(id) = cli.restaurant_id {
        config.restaurant_id = id;
    }

    logger::init_logger(config.log_json);

    run(cli.command, config).await
}

async fn run(command: Commands, config: AppConfig) -> anyhow::Result<()> {
    let connect = || -> anyhow::Result<PrintClient> {
        PrintClient::new(config.client_config()?).context("invalid client configuration")
    };

    match command {
        Commands::Health => output(&connect()?.check_server_status().await?),
        Commands::Printers => output(&connect()?.get_registered_printers().await?),
        Commands::Test { target } => output(&connect()?.test_print(target.as_deref()).await?),
        Commands::Queue => output(&connect()?.queue_status().await?),
        Commands::Register { ip, port, location } => {
            let registration = PrinterRegistration {
                restaurant_id: config.restaurant_id.clone(),
                printer_ip: ip,
                printer_port: port,
                location,
            };
            output(&connect()?.register_printer(&registration).await?)
        }
        Commands::Print { order } => {
            let order = read_order(&order)?;
            let facade = IntegrationFacade::new(connect()?, config.renderer(), TerminalReporter)
                .with_settings(FacadeSettings {
                    status_reset_delay: config.status_reset_delay,
                    ..FacadeSettings::default()
                });

            let result = facade.print_order(&order).await;
            output(&result)?;
            if let PrintResult::Failure { message } = result {
                anyhow::bail!(message);
            }
            Ok(())
        }
        Commands::Render { order } => {
            let order = read_order(&order)?;
            print!("{}", config.renderer().render(&order));
            Ok(())
        }
    }
}

fn output<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
