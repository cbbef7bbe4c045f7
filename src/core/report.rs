//! Report generation business logic.
//!
//! This module gathers a consistent snapshot from the database (members,
//! transactions and weights read inside one database transaction), hands it to the
//! pure calculators, and joins the results back with person records. The
//! formatting helpers return plain strings for whatever presentation layer renders
//! them.

use crate::{
    core::{
        balance::compute_household_balances,
        household::get_household_members,
        split::{TransactionSnapshot, WeightSnapshot, compute_transaction_table},
        transaction::{get_transaction_by_id, get_transactions_for_household},
        weight::{get_weights_for_transaction, get_weights_for_transactions},
    },
    entities::{household, person, transaction},
    errors::{Error, Result},
};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// One member's line in a transaction breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    /// The member
    pub person: person::Model,
    /// Share of the total cost the member benefited from
    pub up: Decimal,
    /// Amount the member paid
    pub down: Decimal,
}

/// How a single transaction divides between the household's members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionBreakdown {
    /// The transaction being reported on
    pub transaction: transaction::Model,
    /// `cost * (1 + tax)`
    pub total_cost: Decimal,
    /// One row per current member, ordered by person id
    pub rows: Vec<BreakdownRow>,
}

/// One member's net position in a household.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberBalanceRow {
    /// The member
    pub person: person::Model,
    /// Positive when the member is owed money, negative when they owe
    pub balance: Decimal,
}

/// Balances of every current member of a household.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdBalanceReport {
    /// The household being reported on
    pub household: household::Model,
    /// One row per current member, ordered by person id
    pub members: Vec<MemberBalanceRow>,
}

/// Builds the up/down breakdown of one transaction.
pub async fn transaction_breakdown(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<TransactionBreakdown> {
    let txn = db.begin().await?;
    let transaction = get_transaction_by_id(&txn, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;
    let members = get_household_members(&txn, transaction.household_id).await?;
    let weights = get_weights_for_transaction(&txn, transaction_id).await?;
    txn.commit().await?;

    let snapshot = TransactionSnapshot::from(&transaction);
    let weights: Vec<WeightSnapshot> = weights.iter().map(WeightSnapshot::from).collect();
    let member_ids: Vec<i64> = members.iter().map(|p| p.id).collect();

    let table = compute_transaction_table(&snapshot, &member_ids, &weights)?;
    let rows = members
        .into_iter()
        .map(|person| {
            let entry = table.get(&person.id).copied().unwrap_or_default();
            BreakdownRow {
                person,
                up: entry.up,
                down: entry.down,
            }
        })
        .collect();

    Ok(TransactionBreakdown {
        transaction,
        total_cost: snapshot.total_cost()?,
        rows,
    })
}

/// Computes every current member's balance over all of a household's transactions.
pub async fn household_balances(
    db: &DatabaseConnection,
    household_id: i64,
) -> Result<HouseholdBalanceReport> {
    let txn = db.begin().await?;
    let household = crate::core::household::get_household_by_id(&txn, household_id)
        .await?
        .ok_or(Error::HouseholdNotFound { id: household_id })?;
    let members = get_household_members(&txn, household_id).await?;
    let transactions = get_transactions_for_household(&txn, household_id).await?;
    let transaction_ids: Vec<i64> = transactions.iter().map(|t| t.id).collect();
    let weights = get_weights_for_transactions(&txn, &transaction_ids).await?;
    txn.commit().await?;

    debug!(
        household_id,
        member_count = members.len(),
        transaction_count = transactions.len(),
        "Computing household balances"
    );

    let snapshots: Vec<TransactionSnapshot> =
        transactions.iter().map(TransactionSnapshot::from).collect();
    let weights_by_transaction: HashMap<i64, Vec<WeightSnapshot>> = weights
        .iter()
        .map(|(&transaction_id, models)| {
            (
                transaction_id,
                models.iter().map(WeightSnapshot::from).collect(),
            )
        })
        .collect();
    let member_ids: Vec<i64> = members.iter().map(|p| p.id).collect();

    let balances = compute_household_balances(&member_ids, &snapshots, &weights_by_transaction)?;
    let balance_by_person: HashMap<i64, Decimal> = balances
        .into_iter()
        .map(|b| (b.person_id, b.balance))
        .collect();

    let members = members
        .into_iter()
        .map(|person| {
            let balance = balance_by_person
                .get(&person.id)
                .copied()
                .unwrap_or_default();
            MemberBalanceRow { person, balance }
        })
        .collect();

    Ok(HouseholdBalanceReport { household, members })
}

// Percentages go through two places before one, ties to even at each step.
fn format_percent(fraction: Decimal) -> String {
    let percent = fraction
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven);
    format!("{percent:.1} %")
}

/// Formats a tax rate like `"8.0 %"`.
#[must_use]
pub fn format_tax_percent(tax: Decimal) -> String {
    format_percent(tax)
}

/// Formats a weight's multiplier like `"25.0 %"`.
#[must_use]
pub fn format_multiplier_percent(multiplier: Decimal) -> String {
    format_percent(multiplier)
}

/// Formats a cost like `"$12.50"`.
///
/// The cost is rounded to three places first and then to cents, ties to even at
/// each step, so `2.125` shows as `"$2.12"`.
#[must_use]
pub fn format_cost_dollar(cost: Decimal) -> String {
    let rounded = cost
        .round_dp_with_strategy(3, RoundingStrategy::MidpointNearestEven)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("${rounded:.2}")
}

/// Formats a balance with its sign: `"+$25.00"` or `"-$25.00"`.
#[must_use]
pub fn format_balance(balance: Decimal) -> String {
    let rounded = balance
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if balance.is_sign_negative() && !rounded.is_zero() {
        format!("-${rounded:.2}")
    } else {
        format!("+${rounded:.2}")
    }
}

/// Labels a household with its members: `"Flat 3B: Alice, Bob"`.
#[must_use]
pub fn format_household_label(household: &household::Model, members: &[person::Model]) -> String {
    let names = members
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    household.name.as_ref().map_or_else(
        || format!("Household {}: {names}", household.id),
        |name| format!("{name}: {names}"),
    )
}

/// Labels a transaction: `"trans: Alice, household: 3"`.
#[must_use]
pub fn format_transaction_label(
    transaction: &transaction::Model,
    transactor: &person::Model,
) -> String {
    format!(
        "trans: {}, household: {}",
        transactor.name, transaction.household_id
    )
}

/// Multi-line summary of a household report, one member per line.
#[must_use]
pub fn format_household_summary(report: &HouseholdBalanceReport) -> String {
    let people: Vec<person::Model> = report.members.iter().map(|m| m.person.clone()).collect();
    let mut lines = vec![format_household_label(&report.household, &people)];
    lines.extend(
        report
            .members
            .iter()
            .map(|m| format!("  {}: {}", m.person.name, format_balance(m.balance))),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{
        household::add_member,
        transaction::create_transaction,
        weight::set_weight,
    };
    use crate::entities::{transaction as transaction_entity, weight as weight_entity};
    use crate::test_utils::*;
    use sea_orm::{ActiveModelTrait, Set};

    #[test]
    fn test_format_tax_percent() {
        assert_eq!(format_tax_percent(Decimal::new(8, 2)), "8.0 %");
        assert_eq!(format_tax_percent(Decimal::new(125, 3)), "12.5 %");
        assert_eq!(format_tax_percent(Decimal::ZERO), "0.0 %");
    }

    #[test]
    fn test_format_multiplier_percent() {
        assert_eq!(format_multiplier_percent(Decimal::new(25, 2)), "25.0 %");
        let third = Decimal::ONE / Decimal::from(3);
        assert_eq!(format_multiplier_percent(third), "33.3 %");
    }

    #[test]
    fn test_format_cost_dollar() {
        assert_eq!(format_cost_dollar(Decimal::new(125, 1)), "$12.50");
        assert_eq!(format_cost_dollar(Decimal::new(314_159, 5)), "$3.14");
        assert_eq!(format_cost_dollar(Decimal::from(100)), "$100.00");
        // Ties go to the even cent
        assert_eq!(format_cost_dollar(dec("2.125")), "$2.12");
        assert_eq!(format_cost_dollar(dec("0.375")), "$0.38");
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance(Decimal::from(25)), "+$25.00");
        assert_eq!(format_balance(Decimal::new(-2550, 2)), "-$25.50");
        assert_eq!(format_balance(Decimal::ZERO), "+$0.00");
    }

    #[tokio::test]
    async fn test_labels() -> Result<()> {
        let (db, household, people) = setup_household(&["alice", "bob"]).await?;
        let created = create_test_transaction(&db, household.id, people[0].id, 10).await?;

        assert_eq!(
            format_household_label(&household, &people),
            "Test alice-bob: Person alice, Person bob"
        );
        assert_eq!(
            format_transaction_label(&created.transaction, &people[0]),
            format!("trans: Person alice, household: {}", household.id)
        );

        let unnamed = household::Model {
            name: None,
            ..household
        };
        assert_eq!(
            format_household_label(&unnamed, &[]),
            format!("Household {}: ", unnamed.id)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_transaction_breakdown() -> Result<()> {
        let (db, household, people) = setup_household(&["alice", "bob"]).await?;
        let created = create_test_transaction(&db, household.id, people[0].id, 100).await?;

        let breakdown = transaction_breakdown(&db, created.transaction.id).await?;

        assert_eq!(breakdown.total_cost, Decimal::from(100));
        assert_eq!(breakdown.rows.len(), 2);
        assert_eq!(breakdown.rows[0].person, people[0]);
        assert_eq!(breakdown.rows[0].up, Decimal::from(50));
        assert_eq!(breakdown.rows[0].down, Decimal::from(100));
        assert_eq!(breakdown.rows[1].person, people[1]);
        assert_eq!(breakdown.rows[1].up, Decimal::from(50));
        assert_eq!(breakdown.rows[1].down, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_transaction_breakdown_with_tax() -> Result<()> {
        let (db, household, people) = setup_household(&["a", "b", "c", "d"]).await?;
        let created = create_transaction(&db, household.id, people[3].id, dec("100"), dec("0.25")).await?;

        let breakdown = transaction_breakdown(&db, created.transaction.id).await?;

        assert_eq!(breakdown.total_cost, Decimal::from(125));
        let total_up: Decimal = breakdown.rows.iter().map(|r| r.up).sum();
        assert_eq!(total_up, Decimal::from(125));
        assert_eq!(breakdown.rows[3].down, Decimal::from(125));

        Ok(())
    }

    #[tokio::test]
    async fn test_transaction_breakdown_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = transaction_breakdown(&db, 404).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TransactionNotFound { id: 404 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_household_balances_single_transaction() -> Result<()> {
        let (db, household, people) = setup_household(&["alice", "bob"]).await?;
        create_test_transaction(&db, household.id, people[0].id, 100).await?;

        let report = household_balances(&db, household.id).await?;

        assert_eq!(report.household, household);
        assert_eq!(report.members.len(), 2);
        assert_eq!(report.members[0].person, people[0]);
        assert_eq!(report.members[0].balance, Decimal::from(50));
        assert_eq!(report.members[1].person, people[1]);
        assert_eq!(report.members[1].balance, Decimal::from(-50));

        Ok(())
    }

    #[tokio::test]
    async fn test_household_balances_two_transactions() -> Result<()> {
        let (db, household, people) = setup_household(&["alice", "bob"]).await?;
        create_test_transaction(&db, household.id, people[0].id, 100).await?;
        create_test_transaction(&db, household.id, people[1].id, 50).await?;

        let report = household_balances(&db, household.id).await?;

        assert_eq!(report.members[0].balance, Decimal::from(25));
        assert_eq!(report.members[1].balance, Decimal::from(-25));

        let summary = format_household_summary(&report);
        assert_eq!(
            summary,
            "Test alice-bob: Person alice, Person bob\n  Person alice: +$25.00\n  Person bob: -$25.00"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_household_balances_edited_weights_and_late_member() -> Result<()> {
        let (db, household, people) = setup_household(&["alice", "bob"]).await?;
        let created = create_test_transaction(&db, household.id, people[0].id, 100).await?;
        set_weight(&db, created.transaction.id, people[0].id, Decimal::ZERO).await?;
        set_weight(&db, created.transaction.id, people[1].id, Decimal::ONE).await?;

        // Carol joins later and has no weight on the existing transaction.
        let carol = create_test_person(&db, "carol").await?;
        add_member(&db, household.id, carol.id).await?;

        let report = household_balances(&db, household.id).await?;

        let balances: Vec<Decimal> = report.members.iter().map(|m| m.balance).collect();
        assert_eq!(
            balances,
            vec![Decimal::from(100), Decimal::from(-100), Decimal::ZERO]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_household_balances_empty_household() -> Result<()> {
        let db = setup_test_db().await?;
        let household = create_test_household(&db, "Nobody home").await?;

        let report = household_balances(&db, household.id).await?;
        assert!(report.members.is_empty());

        let missing = household_balances(&db, 404).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::HouseholdNotFound { id: 404 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_household_balances_idempotent() -> Result<()> {
        let (db, household, people) = setup_household(&["alice", "bob", "carol"]).await?;
        create_test_transaction(&db, household.id, people[2].id, 42).await?;
        create_transaction(&db, household.id, people[1].id, dec("100"), dec("0.08")).await?;
        create_transaction(&db, household.id, people[0].id, dec("19.99"), dec("0.0725")).await?;

        let first = household_balances(&db, household.id).await?;
        let second = household_balances(&db, household.id).await?;
        assert_eq!(first, second);

        let total: Decimal = first.members.iter().map(|m| m.balance).sum();
        assert_eq!(total, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_reports_fail_cleanly_on_overflowing_rows() -> Result<()> {
        let (db, household, people) = setup_household(&["alice", "bob"]).await?;

        // Written directly, past the checks in create_transaction and set_weight
        let huge_total = transaction_entity::ActiveModel {
            household_id: Set(household.id),
            transactor_id: Set(people[0].id),
            created_at: Set(chrono::Utc::now()),
            cost: Set(dec("50000000000000000000000000000").into()),
            tax: Set(Decimal::ONE.into()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let err = household_balances(&db, household.id).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Overflow { transaction_id } if transaction_id == huge_total.id
        ));
        let err = transaction_breakdown(&db, huge_total.id).await.unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }));

        let created =
            create_test_transaction(&db, household.id, people[0].id, 10_000_000_000).await?;
        weight_entity::ActiveModel {
            transaction_id: Set(created.transaction.id),
            person_id: Set(people[1].id),
            multiplier: Set(dec("100000000000000000000").into()),
        }
        .update(&db)
        .await?;

        let err = transaction_breakdown(&db, created.transaction.id).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Overflow { transaction_id } if transaction_id == created.transaction.id
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_three_way_split_balances_to_zero() -> Result<()> {
        let (db, household, people) = setup_household(&["alice", "bob", "carol"]).await?;
        let created =
            create_transaction(&db, household.id, people[0].id, dec("100"), dec("0.08")).await?;

        let breakdown = transaction_breakdown(&db, created.transaction.id).await?;
        let total_up: Decimal = breakdown.rows.iter().map(|r| r.up).sum();
        assert_eq!(breakdown.total_cost, dec("108"));
        assert_eq!(total_up, dec("108"));

        let report = household_balances(&db, household.id).await?;
        let total: Decimal = report.members.iter().map(|m| m.balance).sum();
        assert_eq!(total, Decimal::ZERO);
        assert_eq!(format_balance(report.members[0].balance), "+$72.00");
        assert_eq!(format_balance(report.members[1].balance), "-$36.00");

        Ok(())
    }
}
