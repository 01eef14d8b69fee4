//! HTTP handlers.
//!
//! Every mutating endpoint takes the wallet lock, drives the service, and
//! releases it before responding. The one exception is step-up: the lock
//! is dropped across the external verification call and re-acquired to
//! report the verdict, so a slow verifier never blocks unrelated requests.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use ketney_common::currency;
use ketney_common::directory::{AgentRecord, MerchantRecord};
use ketney_common::fees::{FeeCategory, FeeQuote};
use ketney_common::ledger::TransactionFilter;
use ketney_common::location::{GeoPoint, KINSHASA};
use ketney_common::network::Network;
use ketney_common::notification::Notification;
use ketney_common::transaction::Transaction;
use ketney_common::verify::{
    ExchangeRate, IdentityVerifier, RateFeed, StepUpVerifier, VerificationStatus,
};
use ketney_common::wallet::WalletError;
use ketney_common::workflow::{Counterparty, WorkflowError, WorkflowId, WorkflowKind,
    WorkflowSnapshot};

use crate::cards::{self, VirtualCard};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// One error mapping for the whole wallet surface. Validation failures are
/// the client's to fix (400), missing resources are 404, and a duplicate
/// step-up submission while one is outstanding is a conflict (409).
fn wallet_error(err: WalletError) -> ApiError {
    let status = match &err {
        WalletError::UnknownWorkflow(_) | WalletError::UnknownTransaction(_) => {
            StatusCode::NOT_FOUND
        }
        WalletError::Workflow(WorkflowError::VerificationInFlight) => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    api_error(status, err.to_string())
}

// ── Health ──

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "ketney-gateway",
    })
}

// ── Wallet ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletView {
    pub balance: u64,
    pub balance_visible: bool,
    pub formatted_balance: String,
    pub currency: &'static str,
    pub unread_notifications: usize,
}

pub async fn wallet_view(State(state): State<Arc<AppState>>) -> Json<WalletView> {
    let wallet = state.wallet.lock().await;
    Json(WalletView {
        balance: wallet.balance(),
        balance_visible: wallet.balance_visible(),
        formatted_balance: currency::format_fc(wallet.balance()),
        currency: "FC",
        unread_notifications: wallet.unread_notifications(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityResponse {
    pub balance_visible: bool,
}

pub async fn toggle_visibility(State(state): State<Arc<AppState>>) -> Json<VisibilityResponse> {
    let mut wallet = state.wallet.lock().await;
    Json(VisibilityResponse {
        balance_visible: wallet.toggle_balance_visibility(),
    })
}

// ── Ledger reads ──

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TransactionFilter>,
) -> Json<Vec<Transaction>> {
    let wallet = state.wallet.lock().await;
    Json(wallet.transactions(&filter).cloned().collect())
}

pub async fn transaction_by_ref(
    State(state): State<Arc<AppState>>,
    Path(tx_ref): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    let wallet = state.wallet.lock().await;
    wallet
        .find_by_ref(&tx_ref)
        .cloned()
        .map(Json)
        .ok_or_else(|| wallet_error(WalletError::UnknownTransaction(tx_ref)))
}

// ── Fees ──

#[derive(Debug, Deserialize)]
pub struct FeeQuoteRequest {
    pub amount: u64,
    pub network: Network,
    #[serde(flatten)]
    pub category: FeeCategory,
}

pub async fn quote_fee(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeeQuoteRequest>,
) -> Json<FeeQuote> {
    let wallet = state.wallet.lock().await;
    Json(wallet.quote_fee(req.amount, req.network, req.category))
}

// ── Workflows ──

pub async fn initiate_workflow(
    State(state): State<Arc<AppState>>,
    Json(kind): Json<WorkflowKind>,
) -> Json<WorkflowSnapshot> {
    let mut wallet = state.wallet.lock().await;
    Json(wallet.initiate(kind))
}

pub async fn workflow_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    let wallet = state.wallet.lock().await;
    wallet.workflow(WorkflowId(id)).map(Json).map_err(wallet_error)
}

/// Counterparty as submitted by the client. Agent and merchant selections
/// arrive as directory ids and are resolved server-side, so a client can
/// never attach a name or rail the directory does not vouch for.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum CounterpartyRequest {
    Phone { number: String, network: Network },
    Agent { id: String },
    Merchant { id: String },
    Card { label: Option<String> },
}

impl CounterpartyRequest {
    fn resolve(self, state: &AppState) -> Result<Counterparty, ApiError> {
        match self {
            Self::Phone { number, network } => Ok(Counterparty::Phone { number, network }),
            Self::Agent { id } => state
                .directory
                .agent(&id)
                .map(AgentRecord::counterparty)
                .ok_or_else(|| {
                    api_error(StatusCode::NOT_FOUND, format!("unknown agent {id}"))
                }),
            Self::Merchant { id } => state
                .directory
                .merchant(&id)
                .map(MerchantRecord::counterparty)
                .ok_or_else(|| {
                    api_error(StatusCode::NOT_FOUND, format!("unknown merchant {id}"))
                }),
            Self::Card { label } => Ok(Counterparty::Card {
                label: label.unwrap_or_else(|| "Carte bancaire".to_string()),
            }),
        }
    }
}

pub async fn select_counterparty(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<CounterpartyRequest>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    let counterparty = req.resolve(&state)?;
    let mut wallet = state.wallet.lock().await;
    wallet
        .select_counterparty(WorkflowId(id), counterparty)
        .map(Json)
        .map_err(wallet_error)
}

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    /// Raw user input; non-digit characters are stripped before parsing.
    pub amount: String,
}

pub async fn confirm_amount(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<AmountRequest>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    let mut wallet = state.wallet.lock().await;
    wallet
        .confirm_amount(WorkflowId(id), &req.amount)
        .map(Json)
        .map_err(wallet_error)
}

pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    let mut wallet = state.wallet.lock().await;
    wallet.confirm(WorkflowId(id)).map(Json).map_err(wallet_error)
}

#[derive(Debug, Deserialize)]
pub struct StepUpRequest {
    pub pin: String,
    #[serde(default)]
    pub biometric: bool,
}

pub async fn step_up(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<StepUpRequest>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    let id = WorkflowId(id);
    {
        let mut wallet = state.wallet.lock().await;
        wallet.begin_step_up(id).map_err(wallet_error)?;
    }

    // Lock released while the external call is in flight; the workflow's
    // in-flight flag rejects duplicate submissions in the meantime. The
    // call runs in a spawned task so the verdict is delivered even when
    // the requesting client disconnects mid-verification; otherwise the
    // workflow would be stranded in-flight with no way back but cancel.
    let task_state = Arc::clone(&state);
    let outcome = tokio::spawn(async move {
        let verdict = tokio::time::timeout(
            task_state.step_up_timeout,
            task_state.verifier.verify(&req.pin, req.biometric),
        )
        .await;
        let verified = match verdict {
            Ok(Ok(verified)) => verified,
            Ok(Err(err)) => {
                tracing::warn!(workflow = %id, error = %err, "step-up verification failed");
                false
            }
            Err(_) => {
                tracing::warn!(workflow = %id, "step-up verification timed out");
                false
            }
        };
        let mut wallet = task_state.wallet.lock().await;
        wallet.complete_step_up(id, verified)
    })
    .await
    .map_err(|err| api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;

    outcome.map(Json).map_err(wallet_error)
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub pin: String,
}

pub async fn submit_pin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<PinRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let mut wallet = state.wallet.lock().await;
    wallet
        .submit_pin(WorkflowId(id), &req.pin)
        .map(Json)
        .map_err(wallet_error)
}

pub async fn cancel_workflow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<WorkflowSnapshot>, ApiError> {
    let mut wallet = state.wallet.lock().await;
    wallet.cancel(WorkflowId(id)).map(Json).map_err(wallet_error)
}

// ── Notifications ──

pub async fn list_notifications(State(state): State<Arc<AppState>>) -> Json<Vec<Notification>> {
    let wallet = state.wallet.lock().await;
    Json(wallet.notifications().to_vec())
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub read: bool,
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let mut wallet = state.wallet.lock().await;
    if wallet.mark_notification_read(&id) {
        Ok(Json(MarkReadResponse { read: true }))
    } else {
        Err(api_error(
            StatusCode::NOT_FOUND,
            format!("unknown notification {id}"),
        ))
    }
}

pub async fn clear_notifications(State(state): State<Arc<AppState>>) -> StatusCode {
    let mut wallet = state.wallet.lock().await;
    wallet.clear_notifications();
    StatusCode::NO_CONTENT
}

// ── Directory ──

#[derive(Debug, Default, Deserialize)]
pub struct NearQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl NearQuery {
    /// Reference point for distance sorting; city center by default.
    fn origin(&self) -> GeoPoint {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng),
            _ => KINSHASA,
        }
    }
}

pub async fn list_agents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearQuery>,
) -> Json<Vec<AgentRecord>> {
    Json(
        state
            .directory
            .agents_near(query.origin())
            .into_iter()
            .cloned()
            .collect(),
    )
}

pub async fn list_merchants(State(state): State<Arc<AppState>>) -> Json<Vec<MerchantRecord>> {
    Json(state.directory.merchants().to_vec())
}

// ── External services ──

pub async fn exchange_rate(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExchangeRate>, ApiError> {
    state
        .rates
        .current()
        .await
        .map(Json)
        .map_err(|err| api_error(StatusCode::SERVICE_UNAVAILABLE, err.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    pub card_holder: String,
}

pub async fn generate_card(Json(req): Json<CardRequest>) -> Json<VirtualCard> {
    Json(cards::generate(&req.card_holder))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycRequest {
    pub document_type: String,
}

#[derive(Debug, Serialize)]
pub struct KycResponse {
    pub status: VerificationStatus,
}

pub async fn verify_identity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KycRequest>,
) -> Result<Json<KycResponse>, ApiError> {
    state
        .identity
        .verify_document(&req.document_type)
        .await
        .map(|status| Json(KycResponse { status }))
        .map_err(|err| api_error(StatusCode::SERVICE_UNAVAILABLE, err.to_string()))
}

// ── Admin ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_transactions: usize,
    pub total_volume: u64,
    pub active_users: u64,
    pub system_health: f64,
}

pub async fn admin_stats(State(state): State<Arc<AppState>>) -> Json<AdminStats> {
    let wallet = state.wallet.lock().await;
    Json(AdminStats {
        total_transactions: wallet.transaction_count(),
        total_volume: wallet.completed_volume(),
        active_users: 12_543,
        system_health: 99.7,
    })
}
