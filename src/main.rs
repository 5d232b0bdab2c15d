//! Maintenance entrypoint: boots the database and runs a full-catalog
//! consistency sweep so every persisted score matches current ingredient and
//! weight state. The REST surface lives elsewhere; this binary is what a
//! deploy or cron invokes.

use ocean_score::{
    config,
    core::{recalc, weights},
    errors::Result,
};
use dotenvy::dotenv;
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

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the seed weight configuration (config.toml or built-in defaults)
    let seed_weights = config::weights::load_seed_weights()
        .inspect_err(|e| error!("Failed to load seed weights: {}", e))?;

    // 4. Initialize database (DATABASE_URL or the default SQLite file)
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ensured."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the weight singleton on first boot (no-op afterwards)
    weights::ensure_default_weights(&db, seed_weights)
        .await
        .inspect(|w| {
            info!(
                biodegradability = w.biodegradability_weight,
                coral_safety = w.coral_safety_weight,
                fish_safety = w.fish_safety_weight,
                coverage = w.coverage_weight,
                "Weight configuration ready."
            );
        })
        .inspect_err(|e| error!("Failed to seed weight configuration: {}", e))?;

    // 6. Run the consistency sweep over the whole catalog
    let report = recalc::recalculate_all(&db)
        .await
        .inspect_err(|e| error!("Catalog recalculation failed: {}", e))?;
    info!(
        recalculated = report.recalculated,
        skipped = report.skipped,
        failed = report.failed,
        "Catalog recalculation sweep complete."
    );

    Ok(())
}
