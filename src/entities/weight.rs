//! Weight entity - The share of a transaction attributed to one person.
//!
//! Keyed by (`transaction_id`, `person_id`) so a person holds at most one weight per
//! transaction. Weights are created with an equal split when the transaction is
//! created and may be edited afterwards; they are never renormalised.

use super::decimal_text::DecimalText;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Weight database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weights")]
pub struct Model {
    /// Transaction this weight belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: i64,
    /// Person who benefits from the transaction
    #[sea_orm(primary_key, auto_increment = false)]
    pub person_id: i64,
    /// Fraction of the total cost attributed to the person
    pub multiplier: DecimalText,
}

/// Defines relationships between Weight and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each weight belongs to one transaction
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransactionId",
        to = "super::transaction::Column::Id",
        on_delete = "Cascade"
    )]
    Transaction,
    /// Each weight references one person
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
