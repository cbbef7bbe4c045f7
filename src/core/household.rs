//! Household business logic - households and their member sets.
//!
//! Membership is many-to-many: a person may belong to several households. Removing
//! a member is refused while the person is still referenced by one of the
//! household's transactions (as transactor or through a weight), so balance
//! computation never meets an orphaned reference.

use crate::{
    entities::{
        Household, HouseholdMember, Person, Transaction, Weight, household, household_member,
        person, transaction, weight,
    },
    errors::{Error, Result},
};
use sea_orm::{
    Condition, ModelTrait, PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait,
    prelude::*,
};
use tracing::{debug, info, instrument};

/// Creates a household with an optional name.
///
/// A blank name is stored as no name.
#[instrument(skip(db))]
pub async fn create_household(
    db: &DatabaseConnection,
    name: Option<String>,
) -> Result<household::Model> {
    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let household = household::ActiveModel {
        name: Set(name),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = household.insert(db).await?;
    info!(household_id = result.id, "Created household");
    Ok(result)
}

/// Finds a household by id.
pub async fn get_household_by_id<C>(db: &C, household_id: i64) -> Result<Option<household::Model>>
where
    C: ConnectionTrait,
{
    Household::find_by_id(household_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the oldest household with the given name.
pub async fn get_household_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<household::Model>> {
    Household::find()
        .filter(household::Column::Name.eq(name.trim()))
        .order_by_asc(household::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a person to a household. Adding an existing member is a no-op.
///
/// New members get no weight on transactions created before they joined.
#[instrument(skip(db))]
pub async fn add_member(db: &DatabaseConnection, household_id: i64, person_id: i64) -> Result<()> {
    get_household_by_id(db, household_id)
        .await?
        .ok_or(Error::HouseholdNotFound { id: household_id })?;
    Person::find_by_id(person_id)
        .one(db)
        .await?
        .ok_or(Error::PersonNotFound { id: person_id })?;

    if is_member(db, household_id, person_id).await? {
        debug!("Person is already a member, nothing to do");
        return Ok(());
    }

    let membership = household_member::ActiveModel {
        household_id: Set(household_id),
        person_id: Set(person_id),
    };
    HouseholdMember::insert(membership)
        .exec_without_returning(db)
        .await?;

    info!("Added member to household");
    Ok(())
}

/// Removes a person from a household.
///
/// Fails with [`Error::NotAMember`] if the person is not a member, and with
/// [`Error::Validation`] while any of the household's transactions still names the
/// person as transactor or holds a weight for them. The membership row is deleted
/// first and the references are checked inside the same database transaction, so a
/// transaction created concurrently either sees the person gone or blocks the
/// removal.
#[instrument(skip(db))]
pub async fn remove_member(
    db: &DatabaseConnection,
    household_id: i64,
    person_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;

    let deleted = HouseholdMember::delete_by_id((household_id, person_id))
        .exec(&txn)
        .await?;
    if deleted.rows_affected == 0 {
        return Err(Error::NotAMember {
            household_id,
            person_id,
        });
    }

    let transaction_ids: Vec<i64> = Transaction::find()
        .select_only()
        .column(transaction::Column::Id)
        .filter(transaction::Column::HouseholdId.eq(household_id))
        .into_tuple()
        .all(&txn)
        .await?;

    let paid = Transaction::find()
        .filter(transaction::Column::HouseholdId.eq(household_id))
        .filter(transaction::Column::TransactorId.eq(person_id))
        .count(&txn)
        .await?;
    let weighted = Weight::find()
        .filter(
            Condition::all()
                .add(weight::Column::PersonId.eq(person_id))
                .add(weight::Column::TransactionId.is_in(transaction_ids)),
        )
        .count(&txn)
        .await?;

    if paid > 0 || weighted > 0 {
        // Dropping `txn` rolls the delete back
        return Err(Error::Validation {
            message: format!(
                "Person {person_id} is still referenced by {paid} paid transaction(s) and {weighted} weight(s) in household {household_id}"
            ),
        });
    }

    txn.commit().await?;
    info!("Removed member from household");
    Ok(())
}

/// Checks whether a person belongs to a household.
pub async fn is_member<C>(db: &C, household_id: i64, person_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(HouseholdMember::find_by_id((household_id, person_id))
        .one(db)
        .await?
        .is_some())
}

/// Lists the current members of a household, ordered by person id.
pub async fn get_household_members<C>(db: &C, household_id: i64) -> Result<Vec<person::Model>>
where
    C: ConnectionTrait,
{
    let household = get_household_by_id(db, household_id)
        .await?
        .ok_or(Error::HouseholdNotFound { id: household_id })?;

    household
        .find_related(Person)
        .order_by_asc(person::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Current member ids of a household, ordered ascending.
pub async fn get_member_ids<C>(db: &C, household_id: i64) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    Ok(get_household_members(db, household_id)
        .await?
        .into_iter()
        .map(|person| person.id)
        .collect())
}
