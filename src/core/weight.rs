//! Weight business logic - reading and editing per-person shares.
//!
//! Default weights are written by [`crate::core::transaction::create_transaction`].
//! After that, weights change only through [`set_weight`]; they are never
//! renormalised, so a household's weights on a transaction need not sum to one.

use crate::{
    core::{household, split::TransactionSnapshot, transaction::get_transaction_by_id},
    entities::{Weight, weight},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Retrieves the weights of one transaction, ordered by person id.
pub async fn get_weights_for_transaction<C>(
    db: &C,
    transaction_id: i64,
) -> Result<Vec<weight::Model>>
where
    C: ConnectionTrait,
{
    Weight::find()
        .filter(weight::Column::TransactionId.eq(transaction_id))
        .order_by_asc(weight::Column::PersonId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the weights of many transactions in one query, keyed by transaction id.
///
/// Transactions without any weight have no entry in the map.
pub async fn get_weights_for_transactions<C>(
    db: &C,
    transaction_ids: &[i64],
) -> Result<HashMap<i64, Vec<weight::Model>>>
where
    C: ConnectionTrait,
{
    if transaction_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let weights = Weight::find()
        .filter(weight::Column::TransactionId.is_in(transaction_ids.iter().copied()))
        .order_by_asc(weight::Column::TransactionId)
        .order_by_asc(weight::Column::PersonId)
        .all(db)
        .await?;

    let mut by_transaction: HashMap<i64, Vec<weight::Model>> = HashMap::new();
    for weight in weights {
        by_transaction
            .entry(weight.transaction_id)
            .or_default()
            .push(weight);
    }
    Ok(by_transaction)
}

/// Sets one person's weight on a transaction, creating it if the person has none.
///
/// The person must currently belong to the transaction's household, and the
/// multiplier must be non-negative and small enough that its share of the total
/// cost is still computable.
#[instrument(skip(db))]
pub async fn set_weight(
    db: &DatabaseConnection,
    transaction_id: i64,
    person_id: i64,
    multiplier: Decimal,
) -> Result<weight::Model> {
    if multiplier < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: multiplier });
    }

    let transaction = get_transaction_by_id(db, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    let total_cost = TransactionSnapshot::from(&transaction).total_cost()?;
    multiplier
        .checked_mul(total_cost)
        .ok_or(Error::InvalidAmount { amount: multiplier })?;

    if !household::is_member(db, transaction.household_id, person_id).await? {
        return Err(Error::NotAMember {
            household_id: transaction.household_id,
            person_id,
        });
    }

    let existing = Weight::find_by_id((transaction_id, person_id))
        .one(db)
        .await?;

    if let Some(existing) = existing {
        let mut active_model: weight::ActiveModel = existing.into();
        active_model.multiplier = Set(multiplier.into());
        return active_model.update(db).await.map_err(Into::into);
    }

    let model = weight::Model {
        transaction_id,
        person_id,
        multiplier: multiplier.into(),
    };
    Weight::insert(weight::ActiveModel::from(model.clone()))
        .exec_without_returning(db)
        .await?;
    debug!("Added weight for a member without one");
    Ok(model)
}
