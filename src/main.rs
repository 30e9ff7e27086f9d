//! Bootstrap entry point: prepares the database and seeds the product catalog.
//!
//! The interface layer (HTTP, auth) lives outside this crate; this binary only
//! brings the bookkeeping store up so that layer has something to talk to.

use clubbooks::config::{self, actor::ActorPolicy};
use clubbooks::core::{budget, stock};
use clubbooks::errors::Result;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Resolve the actor policy so misconfiguration surfaces at startup
    let actor_policy = ActorPolicy::from_env();
    info!(
        default_actor_id = actor_policy.default_actor_id,
        "Actor policy resolved."
    );

    // 4. Initialize database
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!(url = %config::database::get_database_url(), "Database initialized successfully.");

    // 5. Seed the product catalog (if a config.toml is present)
    match config::catalog::load_default_config() {
        Ok(catalog) => {
            let existing = stock::get_all_active_products(&db).await?;
            let mut seeded = 0usize;
            for product in catalog.products {
                if existing.iter().any(|p| p.name == product.name) {
                    continue;
                }
                stock::create_product(
                    &db,
                    product.name,
                    product.description,
                    product.price,
                    product.stock,
                )
                .await?;
                seeded += 1;
            }
            info!(seeded, "Product catalog seeded.");
        }
        Err(e) => {
            warn!("No product catalog seeded: {e}");
        }
    }

    // 6. Report where the books stand
    let balance = budget::current_balance(&db).await?;
    info!(balance, "Clubbooks ready.");

    Ok(())
}
