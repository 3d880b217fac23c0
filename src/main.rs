use mess_ledger::{
    config::{database, household},
    core::report,
    errors::Result,
    service::MealManager,
    store::SeaOrmStore,
};
use dotenvy::dotenv;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the household configuration, an absent file means an empty roster
    let config_path = household::config_path();
    let config = if Path::new(&config_path).exists() {
        household::load_config(&config_path)
            .inspect_err(|e| error!("Failed to load {}: {}", config_path, e))?
    } else {
        warn!("No configuration at {}, starting without a seed roster", config_path);
        household::Config::default()
    };

    // 4. Open the database and make sure the state table exists
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Connected to {}", database::get_database_url()))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Load persisted state and seed members from config
    let mut manager = MealManager::load(SeaOrmStore::new(db)).await;
    manager
        .seed_members(&config)
        .await
        .inspect_err(|e| error!("Failed to seed members: {}", e))?;

    info!(
        "\n{}",
        report::format_summary(&config.household.name, manager.household())
    );

    Ok(())
}
