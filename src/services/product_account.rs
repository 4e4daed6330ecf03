/// Product account service implementation
/// Single Responsibility: lifecycle of product account catalog entries
use crate::error::{CrudError, CrudResult, PRODUCT_ACCOUNT};
use crate::repository::ProductAccountRepository;
use crate::types::{EntityState, ProductAccount, ProductAccountPatch};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[async_trait]
pub trait ProductAccountServiceTrait: Send + Sync {
    async fn list_all_actives(&self) -> CrudResult<Vec<ProductAccount>>;

    async fn obtain_by_id(&self, id: &str) -> CrudResult<ProductAccount>;

    async fn create(&self, product_account: ProductAccount) -> CrudResult<ProductAccount>;

    async fn update(&self, id: &str, patch: ProductAccountPatch) -> CrudResult<ProductAccount>;

    async fn inactivate(&self, id: &str) -> CrudResult<ProductAccount>;
}

pub struct ProductAccountService {
    pub repository: Arc<dyn ProductAccountRepository>,
}

impl ProductAccountService {
    pub fn new(repository: Arc<dyn ProductAccountRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProductAccountServiceTrait for ProductAccountService {
    #[instrument(skip(self))]
    async fn list_all_actives(&self) -> CrudResult<Vec<ProductAccount>> {
        let accounts = self.repository.find_by_state(EntityState::Active).await?;
        debug!(count = accounts.len(), "Listed active product accounts");
        Ok(accounts)
    }

    #[instrument(skip(self))]
    async fn obtain_by_id(&self, id: &str) -> CrudResult<ProductAccount> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CrudError::not_found(PRODUCT_ACCOUNT, id))
    }

    #[instrument(skip(self, product_account), fields(id = %product_account.id))]
    async fn create(&self, product_account: ProductAccount) -> CrudResult<ProductAccount> {
        let saved = self.repository.save(product_account).await?;
        info!("Product account created");
        Ok(saved)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: ProductAccountPatch) -> CrudResult<ProductAccount> {
        let mut product_account = self.obtain_by_id(id).await?;
        product_account.apply(patch);

        let saved = self.repository.save(product_account).await?;
        info!("Product account updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn inactivate(&self, id: &str) -> CrudResult<ProductAccount> {
        let mut product_account = self.obtain_by_id(id).await?;
        product_account.state = EntityState::Inactive;

        let saved = self.repository.save(product_account).await?;
        info!("Product account inactivated");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductAccountRepository;
    use crate::types::Flag;
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn product_account(id: &str) -> ProductAccount {
        ProductAccount {
            id: id.to_string(),
            name: "Product Account 1".to_string(),
            description: "Product Account 1 Description".to_string(),
            minimum_balance: Decimal::new(100, 0),
            pay_interest: Flag::Yes,
            accepts_checks: Flag::Yes,
            state: EntityState::Active,
            creation_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_list_all_actives() {
        let mut mock_repository = MockProductAccountRepository::new();
        mock_repository
            .expect_find_by_state()
            .with(eq(EntityState::Active))
            .times(1)
            .returning(|_| Ok(vec![product_account("1"), product_account("2")]));

        let service = ProductAccountService::new(Arc::new(mock_repository));
        let accounts = service.list_all_actives().await.unwrap();

        assert_eq!(accounts.len(), 2);
    }

    #[tokio::test]
    async fn test_obtain_by_id() {
        let mut mock_repository = MockProductAccountRepository::new();
        mock_repository
            .expect_find_by_id()
            .withf(|id: &str| id == "Id1")
            .times(1)
            .returning(|id| Ok(Some(product_account(id))));

        let service = ProductAccountService::new(Arc::new(mock_repository));
        let result = service.obtain_by_id("Id1").await.unwrap();

        assert_eq!(result.id, "Id1");
    }

    #[tokio::test]
    async fn test_obtain_by_id_not_found() {
        let mut mock_repository = MockProductAccountRepository::new();
        mock_repository
            .expect_find_by_id()
            .withf(|id: &str| id == "Id1")
            .times(1)
            .returning(|_| Ok(None));

        let service = ProductAccountService::new(Arc::new(mock_repository));
        let err = service.obtain_by_id("Id1").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Product Account with id: {Id1} does not exist");
    }

    #[tokio::test]
    async fn test_create_saves_entity_unchanged() {
        let expected = product_account("1");
        let matcher = expected.clone();

        let mut mock_repository = MockProductAccountRepository::new();
        mock_repository
            .expect_save()
            .withf(move |account| account == &matcher)
            .times(1)
            .returning(Ok);

        let service = ProductAccountService::new(Arc::new(mock_repository));
        let saved = service.create(expected.clone()).await.unwrap();

        assert_eq!(saved, expected);
    }

    #[tokio::test]
    async fn test_update_merges_descriptive_fields() {
        let mut mock_repository = MockProductAccountRepository::new();
        mock_repository
            .expect_find_by_id()
            .withf(|id: &str| id == "SAV01")
            .times(1)
            .returning(|id| Ok(Some(product_account(id))));
        mock_repository
            .expect_save()
            .withf(|account| {
                account.name == "Premium Savings"
                    && account.minimum_balance == Decimal::new(500, 0)
                    && account.description == "Product Account 1 Description"
                    && account.pay_interest == Flag::Yes
                    && account.accepts_checks == Flag::No
            })
            .times(1)
            .returning(Ok);

        let service = ProductAccountService::new(Arc::new(mock_repository));
        let updated = service
            .update(
                "SAV01",
                ProductAccountPatch {
                    name: Some("Premium Savings".to_string()),
                    minimum_balance: Some(Decimal::new(500, 0)),
                    accepts_checks: Some(Flag::No),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, "SAV01");
        assert_eq!(updated.state, EntityState::Active);
        assert_eq!(
            updated.creation_date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let mut mock_repository = MockProductAccountRepository::new();
        mock_repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        mock_repository.expect_save().never();

        let service = ProductAccountService::new(Arc::new(mock_repository));
        let err = service
            .update("missing", ProductAccountPatch::default())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Product Account with id: {missing} does not exist"
        );
    }

    #[tokio::test]
    async fn test_inactivate() {
        let mut mock_repository = MockProductAccountRepository::new();
        mock_repository
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(product_account(id))));
        mock_repository
            .expect_save()
            .withf(|account| account.state == EntityState::Inactive && account.id == "CHK01")
            .times(1)
            .returning(Ok);

        let service = ProductAccountService::new(Arc::new(mock_repository));
        let result = service.inactivate("CHK01").await.unwrap();

        assert_eq!(result.state, EntityState::Inactive);
    }

    #[tokio::test]
    async fn test_inactivate_not_found() {
        let mut mock_repository = MockProductAccountRepository::new();
        mock_repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        mock_repository.expect_save().never();

        let service = ProductAccountService::new(Arc::new(mock_repository));
        let err = service.inactivate("CHK01").await.unwrap_err();

        assert_eq!(err.to_string(), "Product Account with id: {CHK01} does not exist");
    }
}
