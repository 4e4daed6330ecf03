/// Business logic services
/// One service per catalog entity
pub mod interest_rate;
pub mod product_account;

// Re-export for convenience
pub use interest_rate::{InterestRateService, InterestRateServiceTrait};
pub use product_account::{ProductAccountService, ProductAccountServiceTrait};
