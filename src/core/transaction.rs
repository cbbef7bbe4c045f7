//! Transaction business logic - recording who paid for what.
//!
//! Creating a transaction also writes one default weight per current household
//! member, inside the same database transaction, so no reader ever observes a
//! transaction without weights. Updating a transaction never touches its weights;
//! individual weights are edited through [`crate::core::weight::set_weight`].

use crate::{
    core::{household, split, weight::get_weights_for_transaction},
    entities::{Weight, transaction, weight},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// A freshly created transaction together with its default weights.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTransaction {
    /// The stored transaction
    pub transaction: transaction::Model,
    /// One equal-share weight per member at creation time, ordered by person id
    pub weights: Vec<weight::Model>,
}

/// Fields that may change on an existing transaction. `None` leaves a field as is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionUpdate {
    /// New base cost
    pub cost: Option<Decimal>,
    /// New tax rate
    pub tax: Option<Decimal>,
    /// New transactor, who must be a household member
    pub transactor_id: Option<i64>,
}

/// Rejects negative costs.
pub fn validate_cost(cost: Decimal) -> Result<()> {
    if cost < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: cost });
    }
    Ok(())
}

/// Rejects tax rates below -100%.
pub fn validate_tax(tax: Decimal) -> Result<()> {
    if tax < Decimal::NEGATIVE_ONE {
        return Err(Error::InvalidTax { tax });
    }
    Ok(())
}

/// Validates cost and tax together, including that the total cost is computable.
fn validate_amounts(cost: Decimal, tax: Decimal) -> Result<()> {
    validate_cost(cost)?;
    validate_tax(tax)?;
    split::checked_total_cost(cost, tax).ok_or(Error::InvalidAmount { amount: cost })?;
    Ok(())
}

/// Records a new expense and generates its default equal-split weights.
///
/// Validation happens before anything is written: amounts are checked first (the
/// total cost must fit in a `Decimal`), then the household must exist and have
/// members (an empty household fails with [`Error::EmptyHousehold`]), and the
/// transactor must be one of them.
///
/// # Arguments
/// * `household_id` - The household the expense belongs to
/// * `transactor_id` - The member who paid
/// * `cost` - Base cost, non-negative
/// * `tax` - Fractional tax surcharge (0.08 for 8%)
#[instrument(skip(db))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    household_id: i64,
    transactor_id: i64,
    cost: Decimal,
    tax: Decimal,
) -> Result<CreatedTransaction> {
    validate_amounts(cost, tax)?;

    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    household::get_household_by_id(&txn, household_id)
        .await?
        .ok_or(Error::HouseholdNotFound { id: household_id })?;
    let members = household::get_member_ids(&txn, household_id).await?;

    let shares = split::default_split_weights(&members)?;

    if !members.contains(&transactor_id) {
        return Err(Error::NotAMember {
            household_id,
            person_id: transactor_id,
        });
    }

    let transaction_model = transaction::ActiveModel {
        household_id: Set(household_id),
        transactor_id: Set(transactor_id),
        created_at: Set(chrono::Utc::now()),
        cost: Set(cost.into()),
        tax: Set(tax.into()),
        ..Default::default()
    };
    let created = transaction_model.insert(&txn).await?;

    let weights: Vec<weight::Model> = shares
        .into_iter()
        .map(|share| weight::Model {
            transaction_id: created.id,
            person_id: share.person_id,
            multiplier: share.multiplier.into(),
        })
        .collect();

    Weight::insert_many(
        weights
            .iter()
            .cloned()
            .map(weight::ActiveModel::from),
    )
    .exec_without_returning(&txn)
    .await?;

    // Commit the transaction
    txn.commit().await?;

    info!(
        transaction_id = created.id,
        weight_count = weights.len(),
        "Created transaction with default weights"
    );
    Ok(CreatedTransaction {
        transaction: created,
        weights,
    })
}

/// Edits cost, tax or transactor of an existing transaction.
///
/// Weights are left exactly as they are, even if the household's membership
/// changed since the transaction was created. The new amounts are rejected if the
/// existing weights could no longer be applied to them.
#[instrument(skip(db))]
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    update: TransactionUpdate,
) -> Result<transaction::Model> {
    if let Some(cost) = update.cost {
        validate_cost(cost)?;
    }
    if let Some(tax) = update.tax {
        validate_tax(tax)?;
    }

    let existing = get_transaction_by_id(db, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    let cost = update.cost.unwrap_or_else(|| existing.cost.into());
    let tax = update.tax.unwrap_or_else(|| existing.tax.into());
    validate_amounts(cost, tax)?;
    let total_cost =
        split::checked_total_cost(cost, tax).ok_or(Error::InvalidAmount { amount: cost })?;
    for weight in get_weights_for_transaction(db, transaction_id).await? {
        let multiplier = Decimal::from(weight.multiplier);
        multiplier
            .checked_mul(total_cost)
            .ok_or(Error::InvalidAmount { amount: cost })?;
    }

    if let Some(transactor_id) = update.transactor_id {
        if !household::is_member(db, existing.household_id, transactor_id).await? {
            return Err(Error::NotAMember {
                household_id: existing.household_id,
                person_id: transactor_id,
            });
        }
    }

    let mut active_model: transaction::ActiveModel = existing.into();
    if let Some(cost) = update.cost {
        active_model.cost = Set(cost.into());
    }
    if let Some(tax) = update.tax {
        active_model.tax = Set(tax.into());
    }
    if let Some(transactor_id) = update.transactor_id {
        active_model.transactor_id = Set(transactor_id);
    }

    let updated = active_model.update(db).await?;
    debug!("Updated transaction, weights untouched");
    Ok(updated)
}

/// Retrieves a specific transaction by its unique ID.
pub async fn get_transaction_by_id<C>(
    db: &C,
    transaction_id: i64,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    crate::entities::Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all transactions of a household, oldest first.
pub async fn get_transactions_for_household<C>(
    db: &C,
    household_id: i64,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    crate::entities::Transaction::find()
        .filter(transaction::Column::HouseholdId.eq(household_id))
        .order_by_asc(transaction::Column::CreatedAt)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a transaction together with its weights.
#[instrument(skip(db))]
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let transaction = get_transaction_by_id(&txn, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    Weight::delete_many()
        .filter(weight::Column::TransactionId.eq(transaction_id))
        .exec(&txn)
        .await?;
    transaction.delete(&txn).await?;

    txn.commit().await?;
    info!("Deleted transaction and its weights");
    Ok(())
}
