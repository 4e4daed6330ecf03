/// Input validation for catalog payloads arriving over HTTP
/// The services trust their inputs; everything external is checked here first
use crate::types::{InterestRate, InterestRatePatch, ProductAccount, ProductAccountPatch};
use rust_decimal::Decimal;
use tracing::warn;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_ACCOUNT_ID_LENGTH: usize = 32;

/// Validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field format: {field} - {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field value out of range: {field} - {reason}")]
    OutOfRange { field: String, reason: String },

    #[error("Security validation failed: {reason}")]
    SecurityViolation { reason: String },
}

/// Input validation utilities
pub struct Validator;

impl Validator {
    /// Validate an externally assigned product account id
    pub fn validate_product_account_id(input: &str) -> Result<String, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::MissingField {
                field: "id".to_string(),
            });
        }

        if input.chars().any(|c| c.is_control()) {
            return Err(ValidationError::SecurityViolation {
                reason: "Product account id contains null bytes or control characters"
                    .to_string(),
            });
        }

        if input.len() > MAX_ACCOUNT_ID_LENGTH {
            return Err(ValidationError::OutOfRange {
                field: "id".to_string(),
                reason: format!("Length {} exceeds maximum {}", input.len(), MAX_ACCOUNT_ID_LENGTH),
            });
        }

        if !input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidFormat {
                field: "id".to_string(),
                reason: "Only letters, digits, '-' and '_' are allowed".to_string(),
            });
        }

        Ok(input.to_string())
    }

    /// Validate a required free-text field, stripping control characters
    pub fn validate_text(field: &str, input: &str, max_length: usize) -> Result<String, ValidationError> {
        let sanitized = Self::sanitize_string(input, max_length)?;
        if sanitized.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: field.to_string(),
            });
        }
        Ok(sanitized)
    }

    /// Rates and balances are never negative
    pub fn validate_non_negative(field: &str, value: Decimal) -> Result<Decimal, ValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                reason: format!("{} cannot be negative", value),
            });
        }
        Ok(value)
    }

    pub fn validate_interest_rate(rate: InterestRate) -> Result<InterestRate, ValidationError> {
        let name = Self::validate_text("name", &rate.name, MAX_NAME_LENGTH)?;
        let interest_rate = Self::validate_non_negative("interestRate", rate.interest_rate)?;

        if rate.start > rate.end {
            return Err(ValidationError::OutOfRange {
                field: "end".to_string(),
                reason: format!("End date {} is before start date {}", rate.end, rate.start),
            });
        }

        Ok(InterestRate {
            name,
            interest_rate,
            ..rate
        })
    }

    pub fn validate_interest_rate_patch(
        patch: InterestRatePatch,
    ) -> Result<InterestRatePatch, ValidationError> {
        Ok(InterestRatePatch {
            name: patch
                .name
                .map(|name| Self::validate_text("name", &name, MAX_NAME_LENGTH))
                .transpose()?,
            interest_rate: patch
                .interest_rate
                .map(|rate| Self::validate_non_negative("interestRate", rate))
                .transpose()?,
        })
    }

    pub fn validate_product_account(
        account: ProductAccount,
    ) -> Result<ProductAccount, ValidationError> {
        let id = Self::validate_product_account_id(&account.id)?;
        let name = Self::validate_text("name", &account.name, MAX_NAME_LENGTH)?;
        let description = Self::sanitize_string(&account.description, MAX_DESCRIPTION_LENGTH)?;
        let minimum_balance =
            Self::validate_non_negative("minimumBalance", account.minimum_balance)?;

        Ok(ProductAccount {
            id,
            name,
            description,
            minimum_balance,
            ..account
        })
    }

    pub fn validate_product_account_patch(
        patch: ProductAccountPatch,
    ) -> Result<ProductAccountPatch, ValidationError> {
        Ok(ProductAccountPatch {
            name: patch
                .name
                .map(|name| Self::validate_text("name", &name, MAX_NAME_LENGTH))
                .transpose()?,
            description: patch
                .description
                .map(|text| Self::sanitize_string(&text, MAX_DESCRIPTION_LENGTH))
                .transpose()?,
            minimum_balance: patch
                .minimum_balance
                .map(|balance| Self::validate_non_negative("minimumBalance", balance))
                .transpose()?,
            ..patch
        })
    }

    /// Sanitize string input
    pub fn sanitize_string(input: &str, max_length: usize) -> Result<String, ValidationError> {
        if input.len() > max_length {
            return Err(ValidationError::OutOfRange {
                field: "string_input".to_string(),
                reason: format!("Length {} exceeds maximum {}", input.len(), max_length),
            });
        }

        // Remove control characters and null bytes
        let sanitized: String = input.chars().filter(|c| !c.is_control()).collect();

        if sanitized != input {
            warn!("Input sanitized: removed control characters");
        }

        Ok(sanitized)
    }
}
