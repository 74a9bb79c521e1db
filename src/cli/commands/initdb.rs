use anyhow::Result;
use serde_json::json;
use tracing::{debug, error, info, trace};

use super::print_json;
use crate::config::{AppConfig, AppState};

pub async fn init_database(state: &AppState, config: &AppConfig) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", config.database_url);

    match state.store.create_schema().await {
        Ok(()) => debug!("All pending migrations have been applied"),
        Err(e) => {
            error!("Failed to create schema: {}", e);
            return Err(e.into());
        }
    }

    info!("Database initialization completed successfully!");
    print_json(&json!({ "database_url": config.database_url, "schema": "ready" }))
}
