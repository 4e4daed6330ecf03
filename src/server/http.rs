/// HTTP server implementation with graceful shutdown
/// Clean separation of transport layer from business logic
use crate::server::response::ApiError;
use crate::services::{
    InterestRateService, InterestRateServiceTrait, ProductAccountService,
    ProductAccountServiceTrait,
};
use crate::error::PRODUCT_ACCOUNT;
use crate::types::{InterestRate, InterestRatePatch, ProductAccount, ProductAccountPatch};
use crate::validation::Validator;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        DefaultBodyLimit, Path, State,
    },
    http::{Method, StatusCode},
    response::Json,
    routing::{get, patch},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

type ApiResult<T> = Result<T, ApiError>;

/// Interest rate ids are generated from 1 upwards, so 0 never resolves
const HEALTH_PROBE_RATE_ID: i32 = 0;
const HEALTH_PROBE_ACCOUNT_ID: &str = "";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    interest_rate_service: Arc<InterestRateService>,
    product_account_service: Arc<ProductAccountService>,
}

impl AppState {
    pub fn new(
        interest_rate_service: Arc<InterestRateService>,
        product_account_service: Arc<ProductAccountService>,
    ) -> Self {
        Self {
            interest_rate_service,
            product_account_service,
        }
    }
}

/// Catalog routes without the transport middleware stack
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/interest-rates",
            get(list_interest_rates).post(create_interest_rate),
        )
        .route(
            "/api/v1/interest-rates/:id",
            get(get_interest_rate).put(update_interest_rate),
        )
        .route(
            "/api/v1/interest-rates/:id/inactivate",
            patch(inactivate_interest_rate),
        )
        .route(
            "/api/v1/product-accounts",
            get(list_product_accounts).post(create_product_account),
        )
        .route(
            "/api/v1/product-accounts/:id",
            get(get_product_account).put(update_product_account),
        )
        .route(
            "/api/v1/product-accounts/:id/inactivate",
            patch(inactivate_product_account),
        )
        .route("/health", get(health_check))
        .with_state(state)
}

/// HTTP server with graceful shutdown
pub struct HttpServer {
    router: Router,
    host: String,
    port: u16,
}

impl HttpServer {
    /// Create new HTTP server with rate limiting and CORS
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        state: AppState,
        http_timeout_seconds: u64,
        http_max_concurrency: usize,
        rate_limit_rps: u32,
        rate_limit_burst: u32,
        cors_allow_origins: String,
    ) -> anyhow::Result<Self> {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .period(replenish_period(rate_limit_rps)?)
                .burst_size(rate_limit_burst)
                .finish()
                .ok_or_else(|| anyhow::anyhow!("Failed to build rate limiter config"))?,
        );

        // Configure CORS from provided origins (comma-separated or "*")
        let methods = [Method::GET, Method::POST, Method::PUT, Method::PATCH];
        let cors = if cors_allow_origins.trim() == "*" {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(methods)
                .allow_headers(Any)
        } else {
            let origins_vec: Vec<_> = cors_allow_origins
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.parse())
                .collect::<Result<Vec<axum::http::HeaderValue>, _>>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin value: {}", e))?;
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins_vec))
                .allow_methods(methods)
                .allow_headers(Any)
        };

        let router = api_routes(state)
            .layer(DefaultBodyLimit::max(1024 * 1024))
            .layer(GovernorLayer {
                config: governor_conf,
            })
            .layer(cors)
            .layer(ConcurrencyLimitLayer::new(http_max_concurrency))
            .layer(TimeoutLayer::new(Duration::from_secs(http_timeout_seconds)))
            .layer(SetResponseHeaderLayer::overriding(
                axum::http::header::X_CONTENT_TYPE_OPTIONS,
                axum::http::HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                axum::http::header::X_FRAME_OPTIONS,
                axum::http::HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                axum::http::header::REFERRER_POLICY,
                axum::http::HeaderValue::from_static("no-referrer"),
            ))
            .layer(TraceLayer::new_for_http());

        Ok(Self { router, host, port })
    }

    /// Start the server with graceful shutdown
    pub async fn start(&self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        info!("Starting HTTP server on {}", addr);

        let listener = tokio::time::timeout(Duration::from_secs(5), TcpListener::bind(&addr))
            .await
            .map_err(|_| anyhow::anyhow!("Timeout waiting to bind to {}", addr))?
            .map_err(|e| anyhow::anyhow!("Failed to bind to address {}: {}", addr, e))?;

        info!("Server listening on {}", addr);

        // The rate limiter keys on peer address, so connect info must be attached
        axum::serve(
            listener,
            self.router
                .clone()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        info!("Server shutdown completed");
        Ok(())
    }
}

/// Interval after which one request is added back to a client's quota
fn replenish_period(rate_limit_rps: u32) -> anyhow::Result<Duration> {
    if rate_limit_rps == 0 {
        return Err(anyhow::anyhow!("Rate limit must allow at least one request per second"));
    }
    Ok(Duration::from_secs(1) / rate_limit_rps)
}

// Interest rate handlers

#[instrument(skip_all)]
async fn list_interest_rates(State(state): State<AppState>) -> ApiResult<Json<Vec<InterestRate>>> {
    Ok(Json(state.interest_rate_service.list_all_actives().await?))
}

#[instrument(skip_all)]
async fn get_interest_rate(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<InterestRate>> {
    let Path(id) = id?;
    Ok(Json(state.interest_rate_service.obtain_by_id(id).await?))
}

#[instrument(skip_all)]
async fn create_interest_rate(
    State(state): State<AppState>,
    payload: Result<Json<InterestRate>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<InterestRate>)> {
    let Json(mut interest_rate) = payload?;
    // Ids are generated by the store
    interest_rate.id = None;
    let interest_rate = Validator::validate_interest_rate(interest_rate)?;

    let created = state.interest_rate_service.create(interest_rate).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip_all)]
async fn update_interest_rate(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<InterestRatePatch>, JsonRejection>,
) -> ApiResult<Json<InterestRate>> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    let changes = Validator::validate_interest_rate_patch(changes)?;

    Ok(Json(state.interest_rate_service.update(id, changes).await?))
}

#[instrument(skip_all)]
async fn inactivate_interest_rate(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<InterestRate>> {
    let Path(id) = id?;
    Ok(Json(state.interest_rate_service.inactivate(id).await?))
}

// Product account handlers

#[instrument(skip_all)]
async fn list_product_accounts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ProductAccount>>> {
    Ok(Json(state.product_account_service.list_all_actives().await?))
}

#[instrument(skip_all)]
async fn get_product_account(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ProductAccount>> {
    let Path(id) = id?;
    let id = Validator::validate_product_account_id(&id)?;
    Ok(Json(state.product_account_service.obtain_by_id(&id).await?))
}

#[instrument(skip_all)]
async fn create_product_account(
    State(state): State<AppState>,
    payload: Result<Json<ProductAccount>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProductAccount>)> {
    let Json(product_account) = payload?;
    let product_account = Validator::validate_product_account(product_account)?;

    // Creation must not overwrite an existing record, inactive ones included
    match state
        .product_account_service
        .obtain_by_id(&product_account.id)
        .await
    {
        Ok(_) => {
            return Err(ApiError::Conflict(format!(
                "{} with id: {{{}}} already exists",
                PRODUCT_ACCOUNT, product_account.id
            )))
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let created = state.product_account_service.create(product_account).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip_all)]
async fn update_product_account(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ProductAccountPatch>, JsonRejection>,
) -> ApiResult<Json<ProductAccount>> {
    let Path(id) = id?;
    let id = Validator::validate_product_account_id(&id)?;
    let Json(changes) = payload?;
    let changes = Validator::validate_product_account_patch(changes)?;

    Ok(Json(
        state.product_account_service.update(&id, changes).await?,
    ))
}

#[instrument(skip_all)]
async fn inactivate_product_account(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ProductAccount>> {
    let Path(id) = id?;
    let id = Validator::validate_product_account_id(&id)?;
    Ok(Json(state.product_account_service.inactivate(&id).await?))
}

/// Health check endpoint that verifies both stores answer
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let health_result =
        tokio::time::timeout(Duration::from_secs(5), check_system_health(&state)).await;

    match health_result {
        Ok(Ok(details)) => Json(json!({
            "status": "healthy",
            "timestamp": timestamp,
            "details": details
        })),
        Ok(Err(e)) => Json(json!({
            "status": "degraded",
            "timestamp": timestamp,
            "error": e.to_string(),
            "details": {
                "store_status": "unhealthy"
            }
        })),
        Err(_) => Json(json!({
            "status": "degraded",
            "timestamp": timestamp,
            "error": "Health check timed out",
            "details": {
                "store_status": "timeout"
            }
        })),
    }
}

/// Point lookups on ids that never exist; only a store failure counts as unhealthy
async fn check_system_health(state: &AppState) -> anyhow::Result<Value> {
    match state
        .interest_rate_service
        .obtain_by_id(HEALTH_PROBE_RATE_ID)
        .await
    {
        Ok(_) => {}
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }
    match state
        .product_account_service
        .obtain_by_id(HEALTH_PROBE_ACCOUNT_ID)
        .await
    {
        Ok(_) => {}
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }

    Ok(json!({
        "store_status": "healthy",
        "services": {
            "interest_rate_service": "operational",
            "product_account_service": "operational"
        }
    }))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install signal handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
