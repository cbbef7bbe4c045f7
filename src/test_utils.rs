//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{household, person, transaction},
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;

/// Parses a decimal literal such as `"0.08"`.
#[allow(clippy::unwrap_used)]
pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test person whose account reference is `account`.
///
/// # Defaults
/// * `name`: `"Person <account>"`
pub async fn create_test_person(
    db: &DatabaseConnection,
    account: &str,
) -> Result<entities::person::Model> {
    person::create_person(db, format!("Person {account}"), account.to_string()).await
}

/// Creates an empty test household with the given name.
pub async fn create_test_household(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::household::Model> {
    household::create_household(db, Some(name.to_string())).await
}

/// Creates a test transaction with a whole-unit cost, no tax and default weights.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    household_id: i64,
    transactor_id: i64,
    cost: i64,
) -> Result<transaction::CreatedTransaction> {
    transaction::create_transaction(
        db,
        household_id,
        transactor_id,
        Decimal::from(cost),
        Decimal::ZERO,
    )
    .await
}

/// Sets up a complete test environment with one household and its members.
///
/// The household is named `"Test <a>-<b>-..."` and members are created in the
/// order given, so `people[i]` has ascending ids.
/// Returns (db, household, people) for common test scenarios.
pub async fn setup_household(
    accounts: &[&str],
) -> Result<(
    DatabaseConnection,
    entities::household::Model,
    Vec<entities::person::Model>,
)> {
    let db = setup_test_db().await?;
    let household = create_test_household(&db, &format!("Test {}", accounts.join("-"))).await?;

    let mut people = Vec::with_capacity(accounts.len());
    for account in accounts {
        let person = create_test_person(&db, account).await?;
        household::add_member(&db, household.id, person.id).await?;
        people.push(person);
    }

    Ok((db, household, people))
}
