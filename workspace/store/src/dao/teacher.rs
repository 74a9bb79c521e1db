use model::entities::prelude::Teacher;
use model::entities::teacher::{self, Column};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};
use tracing::{debug, info, instrument};

use super::explicit_value;
use crate::error::{Result, StoreError};
use crate::live::{ChangeHub, ChangeKind, LiveQuery, Table};

/// Query layer for the `teachers` table.
#[derive(Debug, Clone)]
pub struct TeacherDao {
    db: DatabaseConnection,
    hub: ChangeHub,
}

impl TeacherDao {
    pub fn new(db: DatabaseConnection, hub: ChangeHub) -> Self {
        Self { db, hub }
    }

    /// All teachers ordered by last name, first name, then id.
    pub fn list_all(&self) -> LiveQuery<Vec<teacher::Model>> {
        let db = self.db.clone();
        self.hub.live(&[Table::Teachers], move || {
            let db = db.clone();
            async move { fetch_all(&db).await }
        })
    }

    pub async fn fetch_all(&self) -> Result<Vec<teacher::Model>> {
        fetch_all(&self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<teacher::Model>> {
        Ok(Teacher::find_by_id(id).one(&self.db).await?)
    }

    #[instrument(skip(self, password))]
    pub async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<teacher::Model>> {
        Ok(Teacher::find()
            .filter(Column::Username.eq(username))
            .filter(Column::Password.eq(password))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await?)
    }

    pub async fn insert_or_replace<A>(&self, teacher: A) -> Result<teacher::Model>
    where
        A: IntoActiveModel<teacher::ActiveModel>,
    {
        let active = teacher.into_active_model();
        let explicit_id = explicit_value(&active.id);
        let on_conflict = OnConflict::column(Column::Id)
            .update_columns([
                Column::Username,
                Column::Password,
                Column::LastName,
                Column::FirstName,
                Column::DateOfBirth,
                Column::Gender,
                Column::PhotoUri,
            ])
            .to_owned();

        let inserted = Teacher::insert(active)
            .on_conflict(on_conflict)
            .exec(&self.db)
            .await?;
        let id = explicit_id.unwrap_or(inserted.last_insert_id);

        let stored = Teacher::find_by_id(id).one(&self.db).await?.ok_or_else(|| {
            StoreError::Database(DbErr::RecordNotFound(format!("teacher {} after upsert", id)))
        })?;
        self.hub.notify(Table::Teachers, ChangeKind::Upserted);
        info!(teacher_id = id, "Teacher saved");
        Ok(stored)
    }

    pub async fn delete(&self, teacher: &teacher::Model) -> Result<bool> {
        self.delete_by_id(teacher.id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i32) -> Result<bool> {
        let result = Teacher::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            debug!("No teacher to delete");
            return Ok(false);
        }
        self.hub.notify(Table::Teachers, ChangeKind::Deleted);
        info!(teacher_id = id, "Teacher deleted");
        Ok(true)
    }
}

async fn fetch_all(db: &DatabaseConnection) -> Result<Vec<teacher::Model>> {
    Ok(Teacher::find()
        .order_by_asc(Column::LastName)
        .order_by_asc(Column::FirstName)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_store;
    use chrono::NaiveDate;
    use futures::StreamExt;
    use model::entities::course;
    use model::{Gender, Level};
    use sea_orm::ActiveValue::NotSet;
    use std::time::Duration;

    fn teacher(username: &str, password: &str) -> teacher::ActiveModel {
        let mut active = teacher::Model {
            id: 0,
            username: username.to_string(),
            password: password.to_string(),
            last_name: "Turing".to_string(),
            first_name: "Alan".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1912, 6, 23).unwrap(),
            gender: Gender::Male,
            photo_uri: None,
        }
        .into_active_model();
        active.id = NotSet;
        active
    }

    #[tokio::test]
    async fn test_generated_ids_and_lookup() {
        let dao = memory_store().await.teachers();

        let first = dao.insert_or_replace(teacher("aturing", "enigma")).await.unwrap();
        let second = dao.insert_or_replace(teacher("ghopper", "cobol")).await.unwrap();
        assert_ne!(first.id, second.id);

        assert_eq!(dao.get_by_id(first.id).await.unwrap(), Some(first.clone()));
        assert_eq!(
            dao.find_by_credentials("ghopper", "cobol").await.unwrap(),
            Some(second)
        );
        assert_eq!(dao.find_by_credentials("ghopper", "enigma").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_keeps_single_row() {
        let dao = memory_store().await.teachers();
        let saved = dao.insert_or_replace(teacher("aturing", "enigma")).await.unwrap();

        let updated = teacher::Model {
            photo_uri: Some("content://photos/1".to_string()),
            ..saved.clone()
        };
        dao.insert_or_replace(updated.clone()).await.unwrap();

        assert_eq!(dao.fetch_all().await.unwrap(), vec![updated]);
        assert!(dao.delete(&saved).await.unwrap());
        assert!(!dao.delete(&saved).await.unwrap());
        assert!(dao.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_follows_teacher_writes_only() {
        let store = memory_store().await;
        let dao = store.teachers();
        let mut live = dao.list_all();
        assert!(live.next().await.unwrap().unwrap().is_empty());

        let saved = dao.insert_or_replace(teacher("aturing", "enigma")).await.unwrap();
        assert_eq!(live.next().await.unwrap().unwrap(), vec![saved.clone()]);

        store
            .courses()
            .insert_or_replace(course::Model {
                id: 1,
                name: "Logic".to_string(),
                ects: 4.0,
                level: Level::B2,
                teacher_id: Some(saved.id),
            })
            .await
            .unwrap();
        let extra = tokio::time::timeout(Duration::from_millis(50), live.next()).await;
        assert!(extra.is_err(), "course writes must not refresh the teacher list");

        assert!(dao.delete_by_id(saved.id).await.unwrap());
        assert!(live.next().await.unwrap().unwrap().is_empty());
    }
}
