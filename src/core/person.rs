//! Person business logic - creating, finding and renaming household members.

use crate::{
    entities::{Person, household, person},
    errors::{Error, Result},
};
use sea_orm::{ModelTrait, QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Creates a new person linked to an external account reference.
///
/// The name is trimmed and must not be empty; the account reference must be
/// non-empty and unique (the unique index rejects duplicates).
#[instrument(skip(db))]
pub async fn create_person(
    db: &DatabaseConnection,
    name: String,
    account_ref: String,
) -> Result<person::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Person name cannot be empty".to_string(),
        });
    }

    if account_ref.trim().is_empty() {
        return Err(Error::Validation {
            message: "Account reference cannot be empty".to_string(),
        });
    }

    let person = person::ActiveModel {
        name: Set(name.trim().to_string()),
        account_ref: Set(account_ref.trim().to_string()),
        ..Default::default()
    };

    let result = person.insert(db).await?;
    debug!(person_id = result.id, "Created person");
    Ok(result)
}

/// Finds a person by id.
pub async fn get_person_by_id<C>(db: &C, person_id: i64) -> Result<Option<person::Model>>
where
    C: ConnectionTrait,
{
    Person::find_by_id(person_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a person by their external account reference.
pub async fn get_person_by_account(
    db: &DatabaseConnection,
    account_ref: &str,
) -> Result<Option<person::Model>> {
    Person::find()
        .filter(person::Column::AccountRef.eq(account_ref))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Changes a person's display name. Nothing else about a person is editable.
#[instrument(skip(db))]
pub async fn rename_person(
    db: &DatabaseConnection,
    person_id: i64,
    new_name: String,
) -> Result<person::Model> {
    if new_name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Person name cannot be empty".to_string(),
        });
    }

    let person = get_person_by_id(db, person_id)
        .await?
        .ok_or(Error::PersonNotFound { id: person_id })?;

    let mut active_model: person::ActiveModel = person.into();
    active_model.name = Set(new_name.trim().to_string());
    active_model.update(db).await.map_err(Into::into)
}

/// Lists the households a person belongs to, ordered by household id.
pub async fn get_households_for_person(
    db: &DatabaseConnection,
    person_id: i64,
) -> Result<Vec<household::Model>> {
    let person = get_person_by_id(db, person_id)
        .await?
        .ok_or(Error::PersonNotFound { id: person_id })?;

    person
        .find_related(crate::entities::Household)
        .order_by_asc(household::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
