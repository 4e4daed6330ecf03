/// Repository module - abstracts catalog persistence
/// Services depend on these traits only; mocks are generated for tests
mod memory;

pub use memory::{InMemoryInterestRateRepository, InMemoryProductAccountRepository};

use crate::types::{EntityState, InterestRate, ProductAccount};
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;

/// Interest rate store
#[automock]
#[async_trait]
pub trait InterestRateRepository: Send + Sync {
    /// All rates in the given state, in store order
    async fn find_by_state(&self, state: EntityState) -> anyhow::Result<Vec<InterestRate>>;

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<InterestRate>>;

    /// Insert or replace; returns the record as persisted (id assigned)
    async fn save(&self, interest_rate: InterestRate) -> anyhow::Result<InterestRate>;
}

/// Product account store
#[automock]
#[async_trait]
pub trait ProductAccountRepository: Send + Sync {
    /// All accounts in the given state, in store order
    async fn find_by_state(&self, state: EntityState) -> anyhow::Result<Vec<ProductAccount>>;

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<ProductAccount>>;

    /// Insert or replace by id
    async fn save(&self, product_account: ProductAccount) -> anyhow::Result<ProductAccount>;
}

/// Repository factory for dependency injection
pub struct RepositoryFactory;

impl RepositoryFactory {
    pub fn create_interest_rate_repository() -> Arc<dyn InterestRateRepository> {
        Arc::new(InMemoryInterestRateRepository::new())
    }

    pub fn create_product_account_repository() -> Arc<dyn ProductAccountRepository> {
        Arc::new(InMemoryProductAccountRepository::new())
    }

    #[cfg(test)]
    pub fn create_mock_interest_rate_repository() -> MockInterestRateRepository {
        MockInterestRateRepository::new()
    }

    #[cfg(test)]
    pub fn create_mock_product_account_repository() -> MockProductAccountRepository {
        MockProductAccountRepository::new()
    }
}
