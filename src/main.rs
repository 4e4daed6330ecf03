/// Main application entry point
/// Dependency injection, optional demo seeding and graceful shutdown
use chrono::NaiveDate;
use products_accounts::{
    repository::RepositoryFactory,
    server::http::{AppState, HttpServer},
    services::{
        InterestRateService, InterestRateServiceTrait, ProductAccountService,
        ProductAccountServiceTrait,
    },
    Config, Flag, InterestRate, ProductAccount, DEFAULT_LOG_LEVEL,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging subsystem at the configured level
pub fn initialize_logging(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(log_level))
        .json()
        .init();
}

fn log_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Load and validate configuration
pub async fn load_config() -> anyhow::Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

/// Initialize stores and services
pub async fn initialize_services(config: &Config) -> anyhow::Result<AppState> {
    let interest_rate_repository = RepositoryFactory::create_interest_rate_repository();
    let product_account_repository = RepositoryFactory::create_product_account_repository();
    info!("In-memory stores initialized");

    let interest_rate_service = Arc::new(InterestRateService::new(interest_rate_repository));
    let product_account_service = Arc::new(ProductAccountService::new(product_account_repository));

    if config.seed_demo_data {
        seed_demo_catalog(&interest_rate_service, &product_account_service).await?;
    }

    info!("Services initialized");

    Ok(AppState::new(interest_rate_service, product_account_service))
}

/// Load a handful of catalog entries so a fresh instance has something to serve
pub async fn seed_demo_catalog(
    interest_rates: &InterestRateService,
    product_accounts: &ProductAccountService,
) -> anyhow::Result<()> {
    let start = date(2024, 1, 1)?;
    let end = date(2024, 12, 31)?;

    for (name, rate) in [
        ("Savings base rate", Decimal::new(25, 3)),
        ("Term deposit 90 days", Decimal::new(55, 3)),
        ("Term deposit 180 days", Decimal::new(65, 3)),
    ] {
        interest_rates
            .create(InterestRate::new(name, rate, start, end))
            .await?;
    }

    let opened = date(2023, 6, 1)?;
    for (id, name, description, minimum_balance, pay_interest, accepts_checks) in [
        ("SAV", "Savings", "Interest bearing savings account", Decimal::new(10, 0), true, false),
        ("CHK", "Checking", "Checking account with checkbook", Decimal::new(200, 0), false, true),
    ] {
        product_accounts
            .create(ProductAccount {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                minimum_balance,
                pay_interest: Flag::from(pay_interest),
                accepts_checks: Flag::from(accepts_checks),
                state: Default::default(),
                creation_date: opened,
            })
            .await?;
    }

    info!("Demo catalog seeded");
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow::anyhow!("Invalid date {}-{}-{}", year, month, day))
}

/// Start HTTP server with graceful shutdown
pub async fn start_server(config: &Config, app_state: AppState) -> anyhow::Result<()> {
    let server = HttpServer::new(
        config.server_host.clone(),
        config.server_port,
        app_state,
        config.http_timeout_seconds,
        config.http_max_concurrency,
        config.rate_limit_rps,
        config.rate_limit_burst,
        config.cors_allow_origins.clone(),
    )?;

    info!("Starting HTTP server...");
    server.start().await
}

/// Main application logic (extracted for testing)
pub async fn run_application() -> anyhow::Result<()> {
    // Logging needs the configured level, so config loads first
    let config = load_config().await?;
    initialize_logging(&config.log_level);
    info!("Starting Products & Accounts service");
    info!(
        host = %config.server_host,
        port = %config.server_port,
        log_level = %config.log_level,
        seed_demo_data = config.seed_demo_data,
        "Configuration loaded"
    );

    let app_state = initialize_services(&config).await?;

    match start_server(&config, app_state).await {
        Ok(()) => {
            info!("Server shutdown completed");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(e)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_application().await
}
