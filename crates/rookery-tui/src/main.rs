//! Rookery TUI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Browse a local API with an existing token
//! ROOKERY_TOKEN=... rookery --api-url http://localhost:3000
//!
//! # Log in with email and password
//! ROOKERY_PASSWORD=... rookery --email ada@rookery.test
//!
//! # Try it without a server
//! rookery --demo
//! ```

use std::{fs::File, sync::Arc};

use clap::Parser;
use rookery_app::{Feed, Runtime};
use rookery_client::{InteractionClient, MemoryClient, http::HttpClient};
use rookery_tui::{Args, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Arc::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    tracing::info!("Rookery starting");

    let feed = Feed::new(args.app_config());
    if args.demo {
        tracing::info!("Using in-memory demo server");
        run(feed, MemoryClient::demo(), &args).await
    } else {
        tracing::info!("Using API at {}", args.api_url);
        run(feed, HttpClient::new(args.client_config())?, &args).await
    }
}

async fn run<C: InteractionClient>(
    feed: Feed,
    client: C,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let driver = TerminalDriver::new()?;
    let mut runtime = Runtime::new(driver, feed, client);
    if let Some(credentials) = args.credentials() {
        runtime = runtime.with_credentials(credentials);
    }

    let result = runtime.run().await;
    tracing::info!("Rookery stopped");
    Ok(result?)
}

