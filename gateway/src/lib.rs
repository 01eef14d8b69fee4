//! KETNEY API gateway.
//!
//! One HTTP daemon in front of the wallet core: workflow commands, ledger
//! queries, fee quotes, notifications, the agent/merchant directory, and
//! the mock external services (step-up verification, KYC, exchange rates,
//! virtual cards). The wallet service sits behind a single `Mutex`, which
//! is the mutual-exclusion boundary that keeps each settlement's debit and
//! ledger append one atomic unit across requests.

pub mod cards;
pub mod handlers;
pub mod mocks;

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use ketney_common::demo;
use ketney_common::directory::Directory;
use ketney_common::wallet::WalletService;

use crate::mocks::{MockIdentityVerifier, MockStepUpVerifier, StaticRateFeed};

/// Gateway tuning knobs, fed from the CLI (or the test harness).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Seed the demo balance and history instead of an empty ledger.
    pub demo: bool,
    /// Simulated latency of the mock external services.
    pub mock_latency: Duration,
    /// Upper bound on one step-up verification call.
    pub step_up_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            demo: true,
            mock_latency: Duration::from_millis(500),
            step_up_timeout: Duration::from_secs(5),
        }
    }
}

pub struct AppState {
    pub wallet: Mutex<WalletService>,
    pub directory: Directory,
    pub verifier: MockStepUpVerifier,
    pub identity: MockIdentityVerifier,
    pub rates: StaticRateFeed,
    pub step_up_timeout: Duration,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        let wallet = if config.demo {
            demo::demo_wallet()
        } else {
            WalletService::new(0)
        };
        Self {
            wallet: Mutex::new(wallet),
            directory: Directory::kinshasa(),
            verifier: MockStepUpVerifier::new(config.mock_latency),
            identity: MockIdentityVerifier::new(config.mock_latency),
            rates: StaticRateFeed::default(),
            step_up_timeout: config.step_up_timeout,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/wallet", get(handlers::wallet_view))
        .route("/wallet/visibility", post(handlers::toggle_visibility))
        .route("/transactions", get(handlers::list_transactions))
        .route("/transactions/{tx_ref}", get(handlers::transaction_by_ref))
        .route("/fees/quote", post(handlers::quote_fee))
        .route("/workflows", post(handlers::initiate_workflow))
        .route("/workflows/{id}", get(handlers::workflow_state))
        .route(
            "/workflows/{id}/counterparty",
            post(handlers::select_counterparty),
        )
        .route("/workflows/{id}/amount", post(handlers::confirm_amount))
        .route("/workflows/{id}/confirm", post(handlers::confirm))
        .route("/workflows/{id}/step-up", post(handlers::step_up))
        .route("/workflows/{id}/pin", post(handlers::submit_pin))
        .route("/workflows/{id}/cancel", post(handlers::cancel_workflow))
        .route(
            "/notifications",
            get(handlers::list_notifications).delete(handlers::clear_notifications),
        )
        .route(
            "/notifications/{id}/read",
            post(handlers::mark_notification_read),
        )
        .route("/directory/agents", get(handlers::list_agents))
        .route("/directory/merchants", get(handlers::list_merchants))
        .route("/rates", get(handlers::exchange_rate))
        .route("/cards", post(handlers::generate_card))
        .route("/kyc/verify", post(handlers::verify_identity))
        .route("/admin/stats", get(handlers::admin_stats))
        .layer(cors)
        .with_state(state)
}
