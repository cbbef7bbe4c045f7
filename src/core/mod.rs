//! Core business logic.
//!
//! `split` and `balance` are the pure calculators; the other modules are the
//! storage side that reads and writes entities through `SeaORM` and feeds the
//! calculators consistent snapshots.

/// Household-wide balance aggregation
pub mod balance;
/// Household and membership operations
pub mod household;
/// Person operations
pub mod person;
/// Snapshot assembly, reports and formatting helpers
pub mod report;
/// Seeding from config.toml
pub mod seed;
/// Per-transaction split calculation
pub mod split;
/// Transaction creation, editing and lookup
pub mod transaction;
/// Weight lookup and editing
pub mod weight;
