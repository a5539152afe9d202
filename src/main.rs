// Main entry point for imgresize-server.
// Parses configuration, sets up logging and runs the HTTP and/or gRPC
// front-ends over a shared resize executor until a shutdown signal arrives.

mod executor;
mod grpc;
mod resize;
mod shutdown_signal;
mod web;

use clap::{Parser, ValueEnum};
use executor::ResizeExecutor;
use shutdown_signal::{Shutdown, shutdown_signal};
use std::net::SocketAddr;
use thiserror::Error;
use tracing::Level;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// HTTP API only
    Http,
    /// gRPC ImageService only
    Grpc,
    /// Both front-ends in one process
    All,
}

/// Command line arguments for imgresize-server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Which front-ends to run.
    #[arg(long, value_enum, env = "IMGRESIZE_MODE", default_value_t = Mode::All)]
    mode: Mode,

    /// Hostname/IP to bind the HTTP server to.
    /// If this option is specified without value, it will default to "*", meaning the server will listen on all interfaces.
    #[arg(long, env = "IMGRESIZE_HOST", default_value = "localhost", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number for the HTTP server.
    #[arg(long, env = "IMGRESIZE_HTTP_PORT", default_value_t = 8001)]
    http_port: u16,

    /// Socket address for the gRPC server.
    #[arg(long, env = "IMGRESIZE_GRPC_ADDR", default_value = grpc::DEFAULT_GRPC_ADDR)]
    grpc_addr: SocketAddr,

    /// Maximum number of resize operations running at once; excess requests queue.
    #[arg(long, env = "IMGRESIZE_WORKERS", default_value_t = executor::DEFAULT_WORKERS)]
    workers: usize,

    /// Deployment environment. "development" enables debug logging.
    #[arg(long, env = "ENV", default_value = "development")]
    env: String,
}

#[derive(Debug, Error)]
enum ServerError {
    #[error("HTTP server error: {0}")]
    Http(#[from] std::io::Error),
    #[error("gRPC server error: {0}")]
    Grpc(#[from] tonic::transport::Error),
}

#[tokio::main]
async fn main() {
    let config = AppConfig::parse();

    let max_level = if config.env == "development" {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting imgresize-server in {:?} mode...", config.mode);

    let executor = ResizeExecutor::new(config.workers);
    tracing::info!(
        "Resize executor initialized with {} worker(s).",
        executor.workers()
    );

    let shutdown = Shutdown::on(shutdown_signal());

    let http = run_http(&config, executor.clone(), shutdown.clone());
    let grpc = run_grpc(&config, executor, shutdown);

    if let Err(e) = tokio::try_join!(http, grpc) {
        tracing::error!("FATAL: {}", e);
        eprintln!("FATAL: {}. Exiting.", e);
        std::process::exit(1);
    }

    tracing::info!("imgresize-server has shut down.");
}

async fn run_http(
    config: &AppConfig,
    executor: ResizeExecutor,
    shutdown: Shutdown,
) -> Result<(), ServerError> {
    if config.mode == Mode::Grpc {
        return Ok(());
    }

    let (addr, listener) = web::create_listener(&config.host, config.http_port).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, web::create_app(executor))
        .with_graceful_shutdown(shutdown.wait())
        .await?;

    tracing::info!("HTTP server stopped.");
    Ok(())
}

async fn run_grpc(
    config: &AppConfig,
    executor: ResizeExecutor,
    shutdown: Shutdown,
) -> Result<(), ServerError> {
    if config.mode == Mode::Http {
        return Ok(());
    }

    grpc::serve(config.grpc_addr, executor, shutdown.wait()).await?;

    tracing::info!("gRPC server stopped.");
    Ok(())
}
