/// In-memory catalog stores
/// Ordered maps give a stable ascending-id listing order
use super::{InterestRateRepository, ProductAccountRepository};
use crate::types::{EntityState, InterestRate, ProductAccount};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct RateTable {
    rows: BTreeMap<i32, InterestRate>,
    last_id: i32,
}

/// Interest rates keyed by a generated integer id
#[derive(Debug, Default)]
pub struct InMemoryInterestRateRepository {
    table: RwLock<RateTable>,
}

impl InMemoryInterestRateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl InterestRateRepository for InMemoryInterestRateRepository {
    async fn find_by_state(&self, state: EntityState) -> anyhow::Result<Vec<InterestRate>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|rate| rate.state == state)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<InterestRate>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, mut interest_rate: InterestRate) -> anyhow::Result<InterestRate> {
        let mut table = self.table.write().await;

        let id = match interest_rate.id {
            Some(id) => id,
            None => table
                .last_id
                .checked_add(1)
                .ok_or_else(|| anyhow::anyhow!("Interest rate id sequence exhausted"))?,
        };
        // Explicit ids push the sequence forward so generated ids never collide
        table.last_id = table.last_id.max(id);
        interest_rate.id = Some(id);

        table.rows.insert(id, interest_rate.clone());
        debug!(id, state = %interest_rate.state, "Interest rate saved");
        Ok(interest_rate)
    }
}

/// Product accounts keyed by their external id
#[derive(Debug, Default)]
pub struct InMemoryProductAccountRepository {
    rows: RwLock<BTreeMap<String, ProductAccount>>,
}

impl InMemoryProductAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProductAccountRepository for InMemoryProductAccountRepository {
    async fn find_by_state(&self, state: EntityState) -> anyhow::Result<Vec<ProductAccount>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|account| account.state == state)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<ProductAccount>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn save(&self, product_account: ProductAccount) -> anyhow::Result<ProductAccount> {
        if product_account.id.is_empty() {
            return Err(anyhow::anyhow!("Product account id cannot be empty"));
        }

        let mut rows = self.rows.write().await;
        rows.insert(product_account.id.clone(), product_account.clone());
        debug!(id = %product_account.id, state = %product_account.state, "Product account saved");
        Ok(product_account)
    }
}
