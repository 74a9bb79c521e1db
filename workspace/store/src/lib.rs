//! Persistent store for the student-records core.
//!
//! [`Store`] owns the SeaORM connection and the [`ChangeHub`]; the per-entity
//! DAOs it hands out share both, so every write made through any DAO reaches
//! every live query.

pub mod dao;
pub mod error;
pub mod live;

pub use dao::{CourseDao, EnrollmentDao, StudentDao, TeacherDao};
pub use error::{Result, StoreError};
pub use live::{ChangeHub, ChangeKind, LiveQuery, Table, TableChange};

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, instrument, trace, warn};

/// Connection plus change hub. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    db: DatabaseConnection,
    hub: ChangeHub,
}

impl Store {
    /// Connects to `database_url` and creates the schema if it is missing.
    ///
    /// `change_buffer` bounds how many table changes a live query may fall
    /// behind before it is resynchronised with a fresh read.
    #[instrument]
    pub async fn connect(database_url: &str, change_buffer: usize) -> Result<Self> {
        trace!("Attempting to connect to database");
        let db = match Database::connect(database_url).await {
            Ok(connection) => {
                debug!("Database connection established");
                connection
            }
            Err(e) => {
                error!("Failed to connect to database '{}': {}", database_url, e);
                return Err(e.into());
            }
        };

        let store = Self::from_connection(db, ChangeHub::new(change_buffer));
        store.create_schema().await?;
        Ok(store)
    }

    /// Wraps an existing connection. The schema is not touched.
    pub fn from_connection(db: DatabaseConnection, hub: ChangeHub) -> Self {
        Self { db, hub }
    }

    /// Applies the schema migration. Idempotent.
    pub async fn create_schema(&self) -> Result<()> {
        trace!("Executing migration up command");
        match Migrator::up(&self.db, None).await {
            Ok(_) => {
                info!("Database schema is up to date");
                Ok(())
            }
            Err(e) => {
                error!("Failed to run database migrations: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn hub(&self) -> &ChangeHub {
        &self.hub
    }

    /// Spawns a task that polls SQLite's `data_version` every `period` and
    /// publishes a change on every table when another connection (usually
    /// another process) has written to the database file.
    ///
    /// Writes made through this store's own connection do not move the
    /// counter; they already notify through the DAOs. Abort the returned
    /// handle to stop polling.
    pub fn follow_external_writes(&self, period: Duration) -> JoinHandle<()> {
        let db = self.db.clone();
        let hub = self.hub.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last_seen: Option<i64> = None;
            loop {
                ticker.tick().await;
                let version = match data_version(&db).await {
                    Ok(version) => version,
                    Err(e) => {
                        warn!("Failed to read data_version: {}", e);
                        continue;
                    }
                };
                if last_seen.is_some_and(|seen| seen != version) {
                    debug!(version, "Database changed outside this store");
                    for table in Table::ALL {
                        hub.notify(table, ChangeKind::Upserted);
                    }
                }
                last_seen = Some(version);
            }
        })
    }

    pub fn students(&self) -> StudentDao {
        StudentDao::new(self.db.clone(), self.hub.clone())
    }

    pub fn teachers(&self) -> TeacherDao {
        TeacherDao::new(self.db.clone(), self.hub.clone())
    }

    pub fn courses(&self) -> CourseDao {
        CourseDao::new(self.db.clone(), self.hub.clone())
    }

    pub fn enrollments(&self) -> EnrollmentDao {
        EnrollmentDao::new(self.db.clone(), self.hub.clone())
    }
}

async fn data_version(db: &DatabaseConnection) -> Result<i64> {
    let row = db
        .query_one(Statement::from_string(DbBackend::Sqlite, "PRAGMA data_version"))
        .await?;
    match row {
        Some(row) => Ok(row.try_get_by_index::<i64>(0)?),
        None => Ok(0),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Fresh in-memory store with the schema applied.
    pub async fn memory_store() -> Store {
        Store::connect("sqlite::memory:", 16)
            .await
            .expect("Failed to open in-memory store")
    }
}
