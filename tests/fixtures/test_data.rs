/// Test fixtures and sample data for integration tests
use chrono::NaiveDate;
use products_accounts::{
    repository::{InMemoryInterestRateRepository, InMemoryProductAccountRepository},
    server::http::AppState,
    services::{InterestRateService, ProductAccountService},
    EntityState, Flag, InterestRate, ProductAccount,
};
use rust_decimal::Decimal;
use std::sync::Arc;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn interest_rate(name: &str, rate: &str) -> InterestRate {
    InterestRate::new(
        name,
        rate.parse::<Decimal>().unwrap(),
        date(2024, 1, 1),
        date(2024, 12, 31),
    )
}

pub fn product_account(id: &str) -> ProductAccount {
    ProductAccount {
        id: id.to_string(),
        name: format!("Product Account {}", id),
        description: format!("Product Account {} Description", id),
        minimum_balance: Decimal::new(100, 0),
        pay_interest: Flag::Yes,
        accepts_checks: Flag::Yes,
        state: EntityState::Active,
        creation_date: date(2024, 3, 1),
    }
}

/// Services wired to fresh in-memory stores
pub struct Catalog {
    pub interest_rates: Arc<InterestRateService>,
    pub product_accounts: Arc<ProductAccountService>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            interest_rates: Arc::new(InterestRateService::new(Arc::new(
                InMemoryInterestRateRepository::new(),
            ))),
            product_accounts: Arc::new(ProductAccountService::new(Arc::new(
                InMemoryProductAccountRepository::new(),
            ))),
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.interest_rates.clone(), self.product_accounts.clone())
    }
}

/// Sample JSON request bodies
pub mod payloads {
    use serde_json::{json, Value};

    pub fn interest_rate(name: &str, rate: &str) -> Value {
        json!({
            "name": name,
            "interestRate": rate,
            "start": "2024-01-01",
            "end": "2024-12-31"
        })
    }

    pub fn product_account(id: &str) -> Value {
        json!({
            "id": id,
            "name": "Savings",
            "description": "Everyday savings",
            "minimumBalance": "25.50",
            "payInterest": "Y",
            "acceptsChecks": "N",
            "creationDate": "2024-03-01"
        })
    }
}
