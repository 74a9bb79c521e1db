use model::entities::student::{self, Column};
use model::entities::prelude::Student;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};
use tracing::{debug, info, instrument, trace};

use super::explicit_value;
use crate::error::{Result, StoreError};
use crate::live::{ChangeHub, ChangeKind, LiveQuery, Table};

/// Query layer for the `students` table.
#[derive(Debug, Clone)]
pub struct StudentDao {
    db: DatabaseConnection,
    hub: ChangeHub,
}

impl StudentDao {
    pub fn new(db: DatabaseConnection, hub: ChangeHub) -> Self {
        Self { db, hub }
    }

    /// All students ordered by last name, first name, then id.
    pub fn list_all(&self) -> LiveQuery<Vec<student::Model>> {
        let db = self.db.clone();
        self.hub.live(&[Table::Students], move || {
            let db = db.clone();
            async move { fetch_all(&db).await }
        })
    }

    pub async fn fetch_all(&self) -> Result<Vec<student::Model>> {
        fetch_all(&self.db).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<Option<student::Model>> {
        trace!("Looking up student by id");
        Ok(Student::find_by_id(id).one(&self.db).await?)
    }

    /// Exact match on both fields. The lowest id wins if several rows match.
    #[instrument(skip(self, password))]
    pub async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<student::Model>> {
        Ok(Student::find()
            .filter(Column::Username.eq(username))
            .filter(Column::Password.eq(password))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await?)
    }

    /// Inserts the student, or overwrites every column of the row with the
    /// same id. Without an explicit id a new one is generated.
    pub async fn insert_or_replace<A>(&self, student: A) -> Result<student::Model>
    where
        A: IntoActiveModel<student::ActiveModel>,
    {
        let active = student.into_active_model();
        // last_insert_id is stale when the upsert took the update path
        let explicit_id = explicit_value(&active.id);
        let on_conflict = OnConflict::column(Column::Id)
            .update_columns([
                Column::Username,
                Column::Password,
                Column::LastName,
                Column::FirstName,
                Column::DateOfBirth,
                Column::Gender,
                Column::LevelOfStudy,
                Column::PhotoUri,
            ])
            .to_owned();

        let inserted = Student::insert(active)
            .on_conflict(on_conflict)
            .exec(&self.db)
            .await?;
        let id = explicit_id.unwrap_or(inserted.last_insert_id);

        let stored = Student::find_by_id(id).one(&self.db).await?.ok_or_else(|| {
            StoreError::Database(DbErr::RecordNotFound(format!("student {} after upsert", id)))
        })?;
        self.hub.notify(Table::Students, ChangeKind::Upserted);
        info!(student_id = id, "Student saved");
        Ok(stored)
    }

    /// Removes the row with the student's id. Returns `false` if there was none.
    pub async fn delete(&self, student: &student::Model) -> Result<bool> {
        self.delete_by_id(student.id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i32) -> Result<bool> {
        let result = Student::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            debug!("No student to delete");
            return Ok(false);
        }
        self.hub.notify(Table::Students, ChangeKind::Deleted);
        info!(student_id = id, "Student deleted");
        Ok(true)
    }
}

async fn fetch_all(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Ok(Student::find()
        .order_by_asc(Column::LastName)
        .order_by_asc(Column::FirstName)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}
