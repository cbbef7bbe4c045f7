//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod decimal_text;
pub mod household;
pub mod household_member;
pub mod person;
pub mod transaction;
pub mod weight;

// Re-export specific types to avoid conflicts
pub use decimal_text::DecimalText;
pub use household::{Column as HouseholdColumn, Entity as Household, Model as HouseholdModel};
pub use household_member::{
    Column as HouseholdMemberColumn, Entity as HouseholdMember, Model as HouseholdMemberModel,
};
pub use person::{Column as PersonColumn, Entity as Person, Model as PersonModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use weight::{Column as WeightColumn, Entity as Weight, Model as WeightModel};
