//! Transaction entity - One expense paid by a household member.
//!
//! Each transaction has a `household_id`, the `transactor_id` of the person who paid,
//! a base `cost` and a fractional `tax` surcharge. The amount split between members
//! is `cost * (1 + tax)`; who benefits is recorded in the `weights` table.
use super::decimal_text::DecimalText;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the household this transaction belongs to
    pub household_id: i64,
    /// ID of the person who paid
    pub transactor_id: i64,
    /// When the transaction was created
    pub created_at: DateTimeUtc,
    /// Base cost before tax, never negative
    pub cost: DecimalText,
    /// Tax as a fraction of the cost (0.08 for 8%)
    pub tax: DecimalText,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one household
    #[sea_orm(
        belongs_to = "super::household::Entity",
        from = "Column::HouseholdId",
        to = "super::household::Column::Id"
    )]
    Household,
    /// Each transaction is paid by one person
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::TransactorId",
        to = "super::person::Column::Id"
    )]
    Transactor,
    /// One transaction has many weights
    #[sea_orm(has_many = "super::weight::Entity")]
    Weights,
}

impl Related<super::household::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Household.def()
    }
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactor.def()
    }
}

impl Related<super::weight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Weights.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
