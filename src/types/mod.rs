/// Domain types for the products & accounts catalog
/// Entities, lifecycle state codes and partial-update payloads
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state shared by every catalog entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityState {
    #[default]
    #[serde(rename = "ACT")]
    Active,
    #[serde(rename = "INA")]
    Inactive,
}

impl EntityState {
    /// Two-letter code as stored by the catalog
    pub fn code(&self) -> &'static str {
        match self {
            EntityState::Active => "ACT",
            EntityState::Inactive => "INA",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EntityState::Active)
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for EntityState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACT" => Ok(EntityState::Active),
            "INA" => Ok(EntityState::Inactive),
            other => Err(anyhow::anyhow!("Invalid state code: {}", other)),
        }
    }
}

/// Y/N switch used on product accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl Flag {
    pub fn as_bool(&self) -> bool {
        matches!(self, Flag::Yes)
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value {
            Flag::Yes
        } else {
            Flag::No
        }
    }
}

/// Interest rate catalog entry
///
/// `id` is generated by the store on first save, so a record that has not been
/// persisted yet carries `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRate {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub interest_rate: Decimal,
    #[serde(default)]
    pub state: EntityState,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl InterestRate {
    /// New, not yet persisted rate in the active state
    pub fn new(name: impl Into<String>, interest_rate: Decimal, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            interest_rate,
            state: EntityState::Active,
            start,
            end,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Overlay the non-empty fields of `patch`; everything else is kept
    pub fn apply(&mut self, patch: InterestRatePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(rate) = patch.interest_rate {
            self.interest_rate = rate;
        }
    }
}

/// Partial interest rate used by update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub interest_rate: Option<Decimal>,
}

/// Product account catalog entry, keyed by an externally assigned id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAccount {
    pub id: String,
    pub name: String,
    pub description: String,
    pub minimum_balance: Decimal,
    pub pay_interest: Flag,
    pub accepts_checks: Flag,
    #[serde(default)]
    pub state: EntityState,
    pub creation_date: NaiveDate,
}

impl ProductAccount {
    pub fn apply(&mut self, patch: ProductAccountPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(minimum_balance) = patch.minimum_balance {
            self.minimum_balance = minimum_balance;
        }
        if let Some(pay_interest) = patch.pay_interest {
            self.pay_interest = pay_interest;
        }
        if let Some(accepts_checks) = patch.accepts_checks {
            self.accepts_checks = accepts_checks;
        }
    }
}

/// Partial product account used by update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAccountPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub minimum_balance: Option<Decimal>,
    #[serde(default)]
    pub pay_interest: Option<Flag>,
    #[serde(default)]
    pub accepts_checks: Option<Flag>,
}
