//! Household membership join table.
//!
//! The composite primary key makes each (household, person) pair unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "household_members")]
pub struct Model {
    /// Household the person belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub household_id: i64,
    /// Member of the household
    #[sea_orm(primary_key, auto_increment = false)]
    pub person_id: i64,
}

/// Defines relationships between memberships and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each membership belongs to one household
    #[sea_orm(
        belongs_to = "super::household::Entity",
        from = "Column::HouseholdId",
        to = "super::household::Column::Id",
        on_delete = "Cascade"
    )]
    Household,
    /// Each membership belongs to one person
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
}

impl Related<super::household::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Household.def()
    }
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
