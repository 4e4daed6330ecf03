/// Error types for catalog operations
use thiserror::Error;

pub const INTEREST_RATE: &str = "Interest Rate";
pub const PRODUCT_ACCOUNT: &str = "Product Account";

#[derive(Debug, Error)]
pub enum CrudError {
    #[error("{entity} with id: {{{id}}} does not exist")]
    NotFound { entity: &'static str, id: String },

    /// Store failures pass through untouched
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

impl CrudError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CrudError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CrudError::NotFound { .. })
    }
}

pub type CrudResult<T> = Result<T, CrudError>;
