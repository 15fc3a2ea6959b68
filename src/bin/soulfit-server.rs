// ABOUTME: Server binary for the SoulFit posture and Pilates program wizard
// ABOUTME: Loads configuration, initializes logging and serves the HTTP routes until Ctrl+C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

//! # SoulFit Server Binary
//!
//! Starts the wizard HTTP API against the configured `OpenAI`-compatible
//! endpoint.

use anyhow::Result;
use clap::Parser;
use soulfit_server::{
    config::ServerConfig, logging, resources::ServerResources, routes,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "soulfit-server")]
#[command(about = "SoulFit - Posture analysis and Pilates program wizard API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override listener address
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    info!("Starting SoulFit server");
    info!("{}", config.summary());

    let address = format!("{}:{}", config.host, config.http_port);
    let resources = Arc::new(ServerResources::new(config.clone())?);
    let app = routes::router(&resources);
    let sweeper = resources
        .sessions
        .spawn_sweeper(config.sessions.sweep_interval);

    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on {address}");
    display_available_endpoints(&config);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received, draining connections");
}

/// Display all available API endpoints
fn display_available_endpoints(config: &ServerConfig) {
    info!("=== Available API Endpoints ===");
    display_health_endpoints(&config.host, config.http_port);
    display_analysis_endpoints(&config.host, config.http_port);
    display_wizard_endpoints(&config.host, config.http_port);
    info!("=== End of Endpoint List ===");
}

fn display_health_endpoints(host: &str, port: u16) {
    info!("Health:");
    info!("   Health Check:      GET  http://{host}:{port}/health");
    info!("   Readiness:         GET  http://{host}:{port}/ready");
}

#[allow(clippy::cognitive_complexity)]
fn display_analysis_endpoints(host: &str, port: u16) {
    info!("Analysis:");
    info!("   Analyze Posture:   POST http://{host}:{port}/analyze-posture");
    info!("   Extract Report:    POST http://{host}:{port}/extract-body-composition");
    info!("   Generate Program:  POST http://{host}:{port}/generate-program");
}

#[allow(clippy::cognitive_complexity)]
fn display_wizard_endpoints(host: &str, port: u16) {
    info!("Wizard Sessions:");
    info!("   Create Session:    POST   http://{host}:{port}/api/wizard");
    info!("   Get Session:       GET    http://{host}:{port}/api/wizard/{{id}}");
    info!("   Delete Session:    DELETE http://{host}:{port}/api/wizard/{{id}}");
    info!("   Dispatch Action:   POST   http://{host}:{port}/api/wizard/{{id}}/actions");
    info!("   Next Step:         POST   http://{host}:{port}/api/wizard/{{id}}/next");
    info!("   Posture Images:    POST   http://{host}:{port}/api/wizard/{{id}}/posture-images");
    info!("   Report Image:      POST   http://{host}:{port}/api/wizard/{{id}}/report-image");
    info!("   Generate Program:  POST   http://{host}:{port}/api/wizard/{{id}}/program");
    info!("   More Exercises:    POST   http://{host}:{port}/api/wizard/{{id}}/program/more");
    info!("   Export Program:    GET    http://{host}:{port}/api/wizard/{{id}}/export");
}
