//! Smsgate Poller
//!
//! A long-running gateway daemon that polls a remote queue for pending
//! text-message jobs, hands each one to the device SMS capability, and
//! acknowledges the attempt back to the queue.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Repository: HTTP communication with the job queue
//! - Services: SMS send capability and status board
//! - Scheduler: The fixed-interval poll loop
//!
//! The process is supervisor-friendly: a host runtime (systemd, container
//! orchestrator) keeps it alive, and SIGINT triggers a graceful stop at
//! the next safe point of the loop.

mod config;
mod repository;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::HttpJobQueue;
use crate::scheduler::JobPoller;
use crate::service::{CommandSmsSender, InMemoryStatusBoard, StatusService};
use smsgate_client::QueueClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smsgate_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting smsgate poller");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: gateway_id={}, queue_url={}",
        config.gateway_id, config.queue_url
    );

    // Initialize queue client with the configured request timeout
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let client = QueueClient::with_client(config.queue_url.clone(), http_client);
    let queue = Arc::new(HttpJobQueue::new(client));

    info!("Queue client initialized");

    // Initialize the send capability
    let sender = CommandSmsSender::new(config.sms_command.clone());
    if let Err(e) = sender.check_available() {
        warn!("Send command not verified: {:#}", e);
    }
    let sender = Arc::new(sender);

    let status: Arc<dyn StatusService> = Arc::new(InMemoryStatusBoard::new());

    // Create and start the poller
    let mut poller = JobPoller::new(queue, sender, Arc::clone(&status));

    info!("Poll interval: {:?}", config.poll_interval);
    poller.start(config.poll_interval);

    // Run until the host asks us to stop
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown signal received");
    poller.stop().await;

    let last = status.snapshot();
    info!("Final status: {} ({})", last.state, last.message);

    Ok(())
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<Config> {
    match Config::from_env() {
        Ok(config) => {
            config.validate()?;
            Ok(config)
        }
        Err(_) => {
            info!("Failed to load config from environment, using defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}
