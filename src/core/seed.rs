//! Seeds people and households from config.toml.
//!
//! Seeding is idempotent: people are matched by account reference and households
//! by name, so re-running with the same config creates nothing new. Memberships
//! listed in the config are added; memberships missing from it are left alone.

use crate::{
    config::households::Config,
    core::{household, person},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

/// Counts of what a seeding run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// People created in this run
    pub people_created: usize,
    /// Households created in this run
    pub households_created: usize,
}

/// Creates missing people and households from `config` and ensures memberships.
#[instrument(skip_all)]
pub async fn seed_from_config(db: &DatabaseConnection, config: &Config) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for entry in &config.people {
        if person::get_person_by_account(db, &entry.account)
            .await?
            .is_none()
        {
            person::create_person(db, entry.name.clone(), entry.account.clone()).await?;
            summary.people_created += 1;
        }
    }

    for entry in &config.households {
        let existing = household::get_household_by_name(db, &entry.name).await?;
        let target = match existing {
            Some(found) => found,
            None => {
                summary.households_created += 1;
                household::create_household(db, Some(entry.name.clone())).await?
            }
        };

        for account in &entry.members {
            if let Some(member) = person::get_person_by_account(db, account).await? {
                household::add_member(db, target.id, member.id).await?;
            }
        }
    }

    info!(
        people_created = summary.people_created,
        households_created = summary.households_created,
        "Seeding complete"
    );
    Ok(summary)
}
