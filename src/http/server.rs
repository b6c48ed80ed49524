//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with one handler per portal operation
//! - Wire up middleware (request ID, tracing, body limit, timeout)
//! - Record per-operation metrics
//! - Serve until the shutdown signal fires, draining in-flight requests

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use alloy::primitives::Address;

use crate::config::ServerConfig;
use crate::http::request::{json_body, Amount, LoginRequest, RegisterRequest, TransferRequest};
use crate::http::response::{ApiError, ApiResult, Envelope, Success};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::portal::types::{
    AccountBalance, BlockInfo, LoginInfo, NetworkStats, NewAccount, Overview, Registration,
    TransactionInfo, TransferReceipt,
};
use crate::portal::{ErrorKind, Portal, PortalResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub portal: Arc<Portal>,
}

/// Body of a healthy `/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub funding_address: Address,
}

/// HTTP server for the portal API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(portal: Arc<Portal>, config: &ServerConfig) -> Self {
        Self {
            router: build_router(AppState { portal }, config),
        }
    }

    /// Run the server on `listener` until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(overview))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/transfer", post(transfer))
        .route("/blocks/{selector}", get(block))
        .route("/transactions/{hash}", get(transaction))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Record metrics for a finished operation and convert its error.
fn finish<T>(operation: &'static str, start: Instant, result: PortalResult<T>) -> Result<T, ApiError> {
    match result {
        Ok(value) => {
            metrics::record_operation(operation, "ok", start);
            Ok(value)
        }
        Err(e) => {
            let kind = e.kind();
            metrics::record_operation(operation, kind.as_str(), start);
            if kind == ErrorKind::Validation {
                tracing::debug!(operation, error = %e, "Rejected request");
            } else {
                tracing::warn!(operation, kind = kind.as_str(), error = %e, "Operation failed");
            }
            Err(ApiError(e))
        }
    }
}

async fn overview(State(state): State<AppState>) -> ApiResult<Overview> {
    let start = Instant::now();
    let result = state.portal.overview().await;
    finish("overview", start, result).map(Success::ok)
}

async fn health(State(state): State<AppState>) -> Response {
    let healthy = state.portal.is_healthy().await;
    metrics::record_chain_health(healthy);

    if healthy {
        Success::ok(HealthStatus {
            healthy,
            funding_address: state.portal.funding_address(),
        })
        .into_response()
    } else {
        let body: Envelope<()> =
            Envelope::err(ErrorKind::Unavailable, "chain endpoint is not responding");
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    }
}

async fn stats(State(state): State<AppState>) -> ApiResult<NetworkStats> {
    let start = Instant::now();
    let result = state.portal.network_stats().await;
    finish("stats", start, result).map(Success::ok)
}

async fn list_accounts(State(state): State<AppState>) -> ApiResult<Vec<AccountBalance>> {
    let start = Instant::now();
    let result = state.portal.accounts_with_balances().await;
    finish("accounts", start, result).map(Success::ok)
}

async fn create_account(State(state): State<AppState>) -> ApiResult<NewAccount> {
    let start = Instant::now();
    let result = state.portal.create_account().await;
    finish("create_account", start, result).map(Success::created)
}

async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Registration> {
    let start = Instant::now();
    let result = match json_body(payload) {
        Ok(body) => {
            let amount = body.amount_ether.as_ref().map(Amount::as_decimal);
            state.portal.register(&body.address, amount.as_deref()).await
        }
        Err(e) => Err(e),
    };
    finish("register", start, result).map(Success::ok)
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginInfo> {
    let start = Instant::now();
    let result = match json_body(payload) {
        Ok(body) => state.portal.login(&body.address).await,
        Err(e) => Err(e),
    };
    finish("login", start, result).map(Success::ok)
}

async fn transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<TransferReceipt> {
    let start = Instant::now();
    let result = match json_body(payload) {
        Ok(body) => {
            state
                .portal
                .transfer(&body.private_key, &body.to, &body.amount_ether.as_decimal())
                .await
        }
        Err(e) => Err(e),
    };
    finish("transfer", start, result).map(Success::ok)
}

async fn block(State(state): State<AppState>, Path(selector): Path<String>) -> ApiResult<BlockInfo> {
    let start = Instant::now();
    let result = state.portal.block(&selector).await;
    finish("block", start, result).map(Success::ok)
}

async fn transaction(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> ApiResult<TransactionInfo> {
    let start = Instant::now();
    let result = state.portal.transaction(&hash).await;
    finish("transaction", start, result).map(Success::ok)
}
