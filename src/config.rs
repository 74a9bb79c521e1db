use anyhow::{Context, Result};
use compute::default_grades;
use config::{Config, Environment, File};
use serde::Deserialize;
use store::Store;
use tracing::{debug, info};

use crate::services::{
    AuthService, CatalogService, EnrollmentService, GradeService, StudentService,
};
use crate::session::SessionContext;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://gradebook.db?mode=rwc";

/// Runtime settings.
///
/// Sources in increasing precedence: built-in defaults, an optional
/// `gradebook.toml` in the working directory, `GRADEBOOK_*` environment
/// variables. `.env` is read into the environment first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Table changes a live query may fall behind before it is resynchronised
    pub change_buffer: usize,
    pub log_filter: String,
    /// How often `watch` checks the database file for writes from other processes
    pub watch_interval_ms: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("change_buffer", 64_i64)?
            .set_default("log_filter", "info")?
            .set_default("watch_interval_ms", 500_i64)?
            .add_source(File::with_name("gradebook").required(false))
            .add_source(Environment::with_prefix("GRADEBOOK").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Invalid configuration")?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Replaces the database URL when one was given on the command line.
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            change_buffer: 64,
            log_filter: "info".to_string(),
            watch_interval_ms: 500,
        }
    }
}

/// Everything a front end needs, wired once.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub auth: AuthService,
    pub students: StudentService,
    pub catalog: CatalogService,
    pub enrollments: EnrollmentService,
    pub grades: GradeService,
    pub session: SessionContext,
}

impl AppState {
    /// Opens the store (creating the schema if needed) and builds the services.
    pub async fn build(config: &AppConfig) -> Result<Self> {
        info!("Opening store");
        let store = Store::connect(&config.database_url, config.change_buffer)
            .await
            .with_context(|| format!("Failed to open database '{}'", config.database_url))?;
        Ok(Self::from_store(store))
    }

    pub fn from_store(store: Store) -> Self {
        let hub = store.hub().clone();
        let auth = AuthService::new(store.students(), store.teachers());

        Self {
            students: StudentService::new(store.students()),
            catalog: CatalogService::new(store.courses()),
            enrollments: EnrollmentService::new(
                hub.clone(),
                store.students(),
                store.courses(),
                store.enrollments(),
            ),
            grades: GradeService::new(hub, store.enrollments(), default_grades()),
            session: SessionContext::new(auth.clone()),
            auth,
            store,
        }
    }
}
