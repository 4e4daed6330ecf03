/// Interest rate service implementation
/// Single Responsibility: lifecycle of interest rate catalog entries
use crate::error::{CrudError, CrudResult, INTEREST_RATE};
use crate::repository::InterestRateRepository;
use crate::types::{EntityState, InterestRate, InterestRatePatch};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[async_trait]
pub trait InterestRateServiceTrait: Send + Sync {
    async fn list_all_actives(&self) -> CrudResult<Vec<InterestRate>>;

    async fn obtain_by_id(&self, id: i32) -> CrudResult<InterestRate>;

    async fn create(&self, interest_rate: InterestRate) -> CrudResult<InterestRate>;

    async fn update(&self, id: i32, patch: InterestRatePatch) -> CrudResult<InterestRate>;

    async fn inactivate(&self, id: i32) -> CrudResult<InterestRate>;
}

pub struct InterestRateService {
    pub repository: Arc<dyn InterestRateRepository>,
}

impl InterestRateService {
    pub fn new(repository: Arc<dyn InterestRateRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl InterestRateServiceTrait for InterestRateService {
    #[instrument(skip(self))]
    async fn list_all_actives(&self) -> CrudResult<Vec<InterestRate>> {
        let rates = self.repository.find_by_state(EntityState::Active).await?;
        debug!(count = rates.len(), "Listed active interest rates");
        Ok(rates)
    }

    #[instrument(skip(self))]
    async fn obtain_by_id(&self, id: i32) -> CrudResult<InterestRate> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CrudError::not_found(INTEREST_RATE, id))
    }

    #[instrument(skip(self, interest_rate), fields(name = %interest_rate.name))]
    async fn create(&self, interest_rate: InterestRate) -> CrudResult<InterestRate> {
        let saved = self.repository.save(interest_rate).await?;
        info!(id = ?saved.id, "Interest rate created");
        Ok(saved)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: i32, patch: InterestRatePatch) -> CrudResult<InterestRate> {
        let mut interest_rate = self.obtain_by_id(id).await?;
        interest_rate.apply(patch);

        let saved = self.repository.save(interest_rate).await?;
        info!("Interest rate updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn inactivate(&self, id: i32) -> CrudResult<InterestRate> {
        let mut interest_rate = self.obtain_by_id(id).await?;
        interest_rate.state = EntityState::Inactive;

        let saved = self.repository.save(interest_rate).await?;
        info!("Interest rate inactivated");
        Ok(saved)
    }
}
