use expense_buddy::{
    config::{database, households},
    core::{report, seed},
    entities::Household,
    errors::Result,
};
use dotenvy::dotenv;
use sea_orm::{EntityTrait, QueryOrder};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load seed configuration
    let config = households::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed people and households
    seed::seed_from_config(&db, &config)
        .await
        .inspect_err(|e| error!("Failed to seed from config: {}", e))?;

    // 6. Log every household's balances
    let all_households = Household::find()
        .order_by_asc(expense_buddy::entities::HouseholdColumn::Id)
        .all(&db)
        .await?;
    for household in all_households {
        let balances = report::household_balances(&db, household.id).await?;
        info!("\n{}", report::format_household_summary(&balances));
    }

    Ok(())
}
