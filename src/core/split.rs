//! Split calculator - how one transaction divides between household members.
//!
//! Everything here is pure: callers pass in a snapshot of the transaction, the
//! current member ids and the transaction's weights, and get back a table of how
//! much each member is "up" (benefited, owes) and "down" (paid, is owed). Storage
//! rows are turned into snapshots with the `From` impls below.
//!
//! All arithmetic is checked. An amount too large for a `Decimal` is reported as
//! [`Error::Overflow`] instead of aborting the caller.

use crate::{
    entities::{transaction, weight},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of a person, as stored in the `people` table.
pub type PersonId = i64;

/// Decimal places of a default share. Shares at this scale multiply with ordinary
/// costs without rounding, so an equal split covers the total cost exactly.
pub const SHARE_SCALE: u32 = 12;

/// One member's position on a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UpDown {
    /// Share of the total cost this member benefited from
    pub up: Decimal,
    /// Amount this member paid
    pub down: Decimal,
}

impl UpDown {
    /// Net position: positive when the member is owed money.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.down - self.up
    }
}

/// Per-member up/down values for one transaction, ordered by person id.
pub type TransactionTable = BTreeMap<PersonId, UpDown>;

/// `cost * (1 + tax)`, or `None` when the result does not fit in a `Decimal`.
#[must_use]
pub fn checked_total_cost(cost: Decimal, tax: Decimal) -> Option<Decimal> {
    Decimal::ONE
        .checked_add(tax)
        .and_then(|factor| cost.checked_mul(factor))
}

/// The parts of a transaction the calculator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSnapshot {
    /// Transaction id
    pub id: i64,
    /// Person who paid
    pub transactor_id: PersonId,
    /// Base cost before tax
    pub cost: Decimal,
    /// Fractional tax surcharge
    pub tax: Decimal,
}

impl TransactionSnapshot {
    /// `cost * (1 + tax)`
    pub fn total_cost(&self) -> Result<Decimal> {
        checked_total_cost(self.cost, self.tax).ok_or(Error::Overflow {
            transaction_id: self.id,
        })
    }
}

impl From<&transaction::Model> for TransactionSnapshot {
    fn from(model: &transaction::Model) -> Self {
        Self {
            id: model.id,
            transactor_id: model.transactor_id,
            cost: model.cost.into(),
            tax: model.tax.into(),
        }
    }
}

/// A person's weight on a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightSnapshot {
    /// Person the weight belongs to
    pub person_id: PersonId,
    /// Fraction of the total cost attributed to the person
    pub multiplier: Decimal,
}

impl From<&weight::Model> for WeightSnapshot {
    fn from(model: &weight::Model) -> Self {
        Self {
            person_id: model.person_id,
            multiplier: model.multiplier.into(),
        }
    }
}

/// Builds the up/down table for a single transaction.
///
/// Every member gets an entry, even if it stays at zero. Members without a weight
/// simply contribute nothing to `up`. A transactor or weight that points at someone
/// outside `members` is reported as [`Error::InconsistentState`].
pub fn compute_transaction_table(
    transaction: &TransactionSnapshot,
    members: &[PersonId],
    weights: &[WeightSnapshot],
) -> Result<TransactionTable> {
    let overflow = || Error::Overflow {
        transaction_id: transaction.id,
    };
    let total_cost = transaction.total_cost()?;
    let mut table: TransactionTable = members
        .iter()
        .map(|&person_id| (person_id, UpDown::default()))
        .collect();

    let payer = table
        .get_mut(&transaction.transactor_id)
        .ok_or(Error::InconsistentState {
            person_id: transaction.transactor_id,
            reference: "transactor",
        })?;
    payer.down = payer.down.checked_add(total_cost).ok_or_else(overflow)?;

    for weight in weights {
        let entry = table
            .get_mut(&weight.person_id)
            .ok_or(Error::InconsistentState {
                person_id: weight.person_id,
                reference: "weight",
            })?;
        let share = weight
            .multiplier
            .checked_mul(total_cost)
            .ok_or_else(overflow)?;
        entry.up = entry.up.checked_add(share).ok_or_else(overflow)?;
    }

    Ok(table)
}

/// Equal-share default weights for each distinct member.
///
/// Each share is `1 / member count` cut to [`SHARE_SCALE`] places, with the
/// leftover units handed one each to the lowest person ids, so the shares always
/// sum to exactly one. Fails with [`Error::EmptyHousehold`] when there is nobody to
/// split between.
pub fn default_split_weights(members: &[PersonId]) -> Result<Vec<WeightSnapshot>> {
    let distinct: BTreeSet<PersonId> = members.iter().copied().collect();
    if distinct.is_empty() {
        return Err(Error::EmptyHousehold);
    }

    let units = 10_i64.pow(SHARE_SCALE);
    let count = i64::try_from(distinct.len()).map_err(|_| Error::Validation {
        message: "Too many members to split between".to_string(),
    })?;
    let base = units / count;
    let leftover = units % count;

    Ok(distinct
        .into_iter()
        .zip(0_i64..)
        .map(|(person_id, position)| WeightSnapshot {
            person_id,
            multiplier: Decimal::new(base + i64::from(position < leftover), SHARE_SCALE)
                .normalize(),
        })
        .collect())
}
