//! Household entity - A group of people sharing expenses.
//!
//! Members are linked through the `household_members` join table; transactions
//! belong to exactly one household.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Household database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "households")]
pub struct Model {
    /// Unique identifier for the household
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Optional human-readable name (e.g., "Flat 3B")
    pub name: Option<String>,
    /// When the household was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Household and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One household has many member links
    #[sea_orm(has_many = "super::household_member::Entity")]
    Memberships,
    /// One household owns many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::household_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        super::household_member::Relation::Person.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::household_member::Relation::Household.def().rev())
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
