//! Unified error type for expense tracking.
//!
//! Errors fall into four groups: configuration problems (including asking for a
//! default split of an empty household), inconsistent stored state (a transactor or
//! weight pointing at a non-member), validation failures at the storage boundary,
//! and database errors bubbling up from `SeaORM`.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Default split requested for a household with no members.
    #[error("Household has no members to split the cost between")]
    EmptyHousehold,

    /// A transactor or weight references a person outside the household's member set.
    #[error("Inconsistent state: {reference} references person {person_id} outside the household")]
    InconsistentState {
        person_id: i64,
        reference: &'static str,
    },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("Invalid tax rate: {tax} (must be at least -1.0)")]
    InvalidTax { tax: Decimal },

    /// Amounts on a stored transaction are too large to add up.
    #[error("Amounts on transaction {transaction_id} overflow")]
    Overflow { transaction_id: i64 },

    #[error("Person {person_id} is not a member of household {household_id}")]
    NotAMember { household_id: i64, person_id: i64 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Person not found: {id}")]
    PersonNotFound { id: i64 },

    #[error("Household not found: {id}")]
    HouseholdNotFound { id: i64 },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl Error {
    /// Configuration-class errors: bad config files and empty-household splits.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::EmptyHousehold)
    }

    #[must_use]
    pub const fn is_inconsistent_state(&self) -> bool {
        matches!(self, Self::InconsistentState { .. })
    }

    /// Errors raised while checking input at the storage boundary.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::InvalidTax { .. }
                | Self::Overflow { .. }
                | Self::NotAMember { .. }
                | Self::Validation { .. }
        )
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
