//! Balance aggregator - household-wide net positions.
//!
//! Sums the per-transaction tables from [`crate::core::split`] over every
//! transaction of a household. Like the split calculator this is a pure function of
//! the snapshot it is given; nothing is cached between calls.

use crate::{
    core::split::{
        PersonId, TransactionSnapshot, UpDown, WeightSnapshot, compute_transaction_table,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Net position of one member across all of a household's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemberBalance {
    /// Member the balance belongs to
    pub person_id: PersonId,
    /// Total benefit received
    pub up: Decimal,
    /// Total paid
    pub down: Decimal,
    /// `down - up`; positive means the member is owed money
    pub balance: Decimal,
}

/// Computes one balance per current member, ordered by person id.
///
/// Transactions missing from `weights_by_transaction` count as having no weights.
/// Any reference to a person outside `members` fails with
/// [`Error::InconsistentState`] rather than being dropped, and totals that no
/// longer fit in a `Decimal` fail with [`Error::Overflow`].
pub fn compute_household_balances(
    members: &[PersonId],
    transactions: &[TransactionSnapshot],
    weights_by_transaction: &HashMap<i64, Vec<WeightSnapshot>>,
) -> Result<Vec<MemberBalance>> {
    let mut totals: BTreeMap<PersonId, UpDown> = members
        .iter()
        .map(|&person_id| (person_id, UpDown::default()))
        .collect();

    for transaction in transactions {
        let weights = weights_by_transaction
            .get(&transaction.id)
            .map_or(&[][..], Vec::as_slice);
        let table = compute_transaction_table(transaction, members, weights)?;

        for (person_id, entry) in table {
            let total = totals
                .get_mut(&person_id)
                .ok_or(Error::InconsistentState {
                    person_id,
                    reference: "transaction table",
                })?;
            let overflow = || Error::Overflow {
                transaction_id: transaction.id,
            };
            total.up = total.up.checked_add(entry.up).ok_or_else(overflow)?;
            total.down = total.down.checked_add(entry.down).ok_or_else(overflow)?;
        }
    }

    Ok(totals
        .into_iter()
        .map(|(person_id, total)| MemberBalance {
            person_id,
            up: total.up,
            down: total.down,
            balance: total.balance(),
        })
        .collect())
}
