/// Products & Accounts catalog service library
/// Interest rates and product accounts with a soft-deactivation lifecycle
pub mod error;
pub mod repository;
pub mod server;
pub mod services;
pub mod types;
pub mod validation;

// Re-export key types for public API
pub use error::{CrudError, CrudResult};
pub use repository::{InterestRateRepository, ProductAccountRepository, RepositoryFactory};
pub use types::{
    EntityState, Flag, InterestRate, InterestRatePatch, ProductAccount, ProductAccountPatch,
};

/// Log filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Library configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub log_level: String,
    // HTTP and rate limiting config
    pub http_timeout_seconds: u64,
    pub http_max_concurrency: usize,
    pub rate_limit_rps: u32,
    pub rate_limit_burst: u32,
    pub cors_allow_origins: String,
    /// Load a small demo catalog into the in-memory stores at startup
    pub seed_demo_data: bool,
}

impl Config {
    /// Create a new Config instance (for testing)
    pub fn new(server_host: String, server_port: u16, log_level: String) -> Self {
        Self {
            server_host,
            server_port,
            log_level,
            http_timeout_seconds: 15,
            http_max_concurrency: 100,
            rate_limit_rps: 2,
            rate_limit_burst: 10,
            cors_allow_origins: "*".to_string(),
            seed_demo_data: false,
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid SERVER_PORT value"))?;

        let log_level =
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        let http_timeout_seconds = std::env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(15);

        let http_max_concurrency = std::env::var("HTTP_MAX_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(100);

        let rate_limit_rps = std::env::var("RATE_LIMIT_RPS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(2);

        let rate_limit_burst = std::env::var("RATE_LIMIT_BURST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let cors_allow_origins =
            std::env::var("CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".to_string());

        let seed_demo_data = match std::env::var("SEED_DEMO_DATA") {
            Ok(v) => parse_bool(&v)
                .ok_or_else(|| anyhow::anyhow!("Invalid SEED_DEMO_DATA value: {}", v))?,
            Err(_) => false,
        };

        Ok(Self {
            server_host,
            server_port,
            log_level,
            http_timeout_seconds,
            http_max_concurrency,
            rate_limit_rps,
            rate_limit_burst,
            cors_allow_origins,
            seed_demo_data,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server_host.trim().is_empty() {
            return Err(anyhow::anyhow!("Server host cannot be empty"));
        }

        if self.server_port == 0 {
            return Err(anyhow::anyhow!("Server port must be greater than 0"));
        }

        // HTTP configs
        if self.http_timeout_seconds == 0 || self.http_timeout_seconds > 300 {
            return Err(anyhow::anyhow!(
                "HTTP timeout must be between 1 and 300 seconds"
            ));
        }
        if self.http_max_concurrency == 0 || self.http_max_concurrency > 10_000 {
            return Err(anyhow::anyhow!(
                "HTTP max concurrency must be between 1 and 10000"
            ));
        }
        if self.rate_limit_rps == 0 || self.rate_limit_rps > 10_000 {
            return Err(anyhow::anyhow!(
                "RATE_LIMIT_RPS must be between 1 and 10000"
            ));
        }
        if self.rate_limit_burst == 0 || self.rate_limit_burst > 10_000 {
            return Err(anyhow::anyhow!(
                "RATE_LIMIT_BURST must be between 1 and 10000"
            ));
        }

        if self.cors_allow_origins.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "CORS_ALLOW_ORIGINS cannot be empty (use * or CSV list)"
            ));
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
