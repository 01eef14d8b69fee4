//! KETNEY gateway daemon.
//!
//! Serves the wallet API over HTTP. By default the wallet starts seeded
//! with the demo balance and history; `--empty` starts from zero for a
//! fresh-account run.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ketney_gateway::{build_router, AppState, GatewayConfig};

#[derive(Parser)]
#[command(name = "ketney-gateway", about = "KETNEY wallet API gateway")]
struct Cli {
    /// HTTP port to listen on.
    #[arg(long, default_value_t = 3020)]
    port: u16,

    /// Start with an empty wallet instead of the seeded demo account.
    #[arg(long)]
    empty: bool,

    /// Simulated latency of the mock external services, in milliseconds.
    #[arg(long, default_value_t = 500)]
    mock_latency_ms: u64,

    /// Upper bound on one step-up verification call, in milliseconds.
    #[arg(long, default_value_t = 5_000)]
    step_up_timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = GatewayConfig {
        demo: !cli.empty,
        mock_latency: Duration::from_millis(cli.mock_latency_ms),
        step_up_timeout: Duration::from_millis(cli.step_up_timeout_ms),
    };

    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, demo = !cli.empty, "gateway listening");
    axum::serve(listener, app).await.expect("Server failed");
}
