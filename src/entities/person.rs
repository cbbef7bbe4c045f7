//! Person entity - A household member.
//!
//! People are identified by id and linked to an external account reference.
//! A person can belong to any number of households.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Person database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "people")]
pub struct Model {
    /// Unique identifier for the person
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, the only field editable after creation
    pub name: String,
    /// Reference to the external user account this person belongs to
    #[sea_orm(unique)]
    pub account_ref: String,
}

/// Defines relationships between Person and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One person has many household memberships
    #[sea_orm(has_many = "super::household_member::Entity")]
    Memberships,
    /// One person pays for many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One person holds many weights
    #[sea_orm(has_many = "super::weight::Entity")]
    Weights,
}

impl Related<super::household_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl Related<super::household::Entity> for Entity {
    fn to() -> RelationDef {
        super::household_member::Relation::Household.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::household_member::Relation::Person.def().rev())
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::weight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Weights.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
