use model::Level;
use model::entities::course::{self, Column};
use model::entities::prelude::Course;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    Select,
};
use tracing::{debug, info, instrument};

use super::explicit_value;
use crate::error::{Result, StoreError};
use crate::live::{ChangeHub, ChangeKind, LiveQuery, Table};

/// Query layer for the `courses` table.
///
/// No ECTS validation happens here; the catalog service checks course forms
/// before they reach this DAO.
#[derive(Debug, Clone)]
pub struct CourseDao {
    db: DatabaseConnection,
    hub: ChangeHub,
}

impl CourseDao {
    pub fn new(db: DatabaseConnection, hub: ChangeHub) -> Self {
        Self { db, hub }
    }

    /// All courses ordered by name, then id.
    pub fn list_all(&self) -> LiveQuery<Vec<course::Model>> {
        let db = self.db.clone();
        self.hub.live(&[Table::Courses], move || {
            let db = db.clone();
            async move { fetch(&db, ordered(Course::find())).await }
        })
    }

    pub async fn fetch_all(&self) -> Result<Vec<course::Model>> {
        fetch(&self.db, ordered(Course::find())).await
    }

    /// Courses assigned to `teacher_id`.
    pub fn list_by_teacher(&self, teacher_id: i32) -> LiveQuery<Vec<course::Model>> {
        let db = self.db.clone();
        self.hub.live(&[Table::Courses], move || {
            let db = db.clone();
            async move { fetch(&db, by_teacher(teacher_id)).await }
        })
    }

    pub async fn fetch_by_teacher(&self, teacher_id: i32) -> Result<Vec<course::Model>> {
        fetch(&self.db, by_teacher(teacher_id)).await
    }

    pub fn list_by_level(&self, level: Level) -> LiveQuery<Vec<course::Model>> {
        let db = self.db.clone();
        self.hub.live(&[Table::Courses], move || {
            let db = db.clone();
            async move { fetch(&db, by_level(level)).await }
        })
    }

    pub async fn fetch_by_level(&self, level: Level) -> Result<Vec<course::Model>> {
        fetch(&self.db, by_level(level)).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<course::Model>> {
        Ok(Course::find_by_id(id).one(&self.db).await?)
    }

    pub async fn insert_or_replace<A>(&self, course: A) -> Result<course::Model>
    where
        A: IntoActiveModel<course::ActiveModel>,
    {
        let active = course.into_active_model();
        let explicit_id = explicit_value(&active.id);
        let on_conflict = OnConflict::column(Column::Id)
            .update_columns([Column::Name, Column::Ects, Column::Level, Column::TeacherId])
            .to_owned();

        let inserted = Course::insert(active)
            .on_conflict(on_conflict)
            .exec(&self.db)
            .await?;
        let id = explicit_id.unwrap_or(inserted.last_insert_id);

        let stored = Course::find_by_id(id).one(&self.db).await?.ok_or_else(|| {
            StoreError::Database(DbErr::RecordNotFound(format!("course {} after upsert", id)))
        })?;
        self.hub.notify(Table::Courses, ChangeKind::Upserted);
        info!(course_id = id, name = %stored.name, "Course saved");
        Ok(stored)
    }

    /// Enrollments pointing at the course are left in place.
    pub async fn delete(&self, course: &course::Model) -> Result<bool> {
        self.delete_by_id(course.id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i32) -> Result<bool> {
        let result = Course::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            debug!("No course to delete");
            return Ok(false);
        }
        self.hub.notify(Table::Courses, ChangeKind::Deleted);
        info!(course_id = id, "Course deleted");
        Ok(true)
    }
}

fn ordered(select: Select<Course>) -> Select<Course> {
    select
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id)
}

fn by_teacher(teacher_id: i32) -> Select<Course> {
    ordered(Course::find().filter(Column::TeacherId.eq(teacher_id)))
}

fn by_level(level: Level) -> Select<Course> {
    ordered(Course::find().filter(Column::Level.eq(level)))
}

async fn fetch(db: &DatabaseConnection, select: Select<Course>) -> Result<Vec<course::Model>> {
    Ok(select.all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_store;
    use futures::StreamExt;
    use sea_orm::{ActiveValue::NotSet, Set};
    use std::time::Duration;

    fn course(name: &str, ects: f64, level: Level, teacher_id: Option<i32>) -> course::ActiveModel {
        course::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            ects: Set(ects),
            level: Set(level),
            teacher_id: Set(teacher_id),
        }
    }

    async fn no_more<T>(live: &mut LiveQuery<T>) -> bool {
        tokio::time::timeout(Duration::from_millis(50), live.next())
            .await
            .is_err()
    }

    #[tokio::test]
    async fn test_insert_then_get_by_id() {
        let dao = memory_store().await.courses();
        let saved = dao
            .insert_or_replace(course("Algebra", 6.0, Level::B1, None))
            .await
            .unwrap();

        assert_eq!(saved.name, "Algebra");
        assert_eq!(saved.teacher_id, None);
        assert_eq!(dao.get_by_id(saved.id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_filters_by_teacher_and_level() {
        let dao = memory_store().await.courses();
        dao.insert_or_replace(course("Optics", 4.0, Level::B2, Some(1))).await.unwrap();
        dao.insert_or_replace(course("Algebra", 6.0, Level::B1, Some(1))).await.unwrap();
        dao.insert_or_replace(course("Botany", 3.0, Level::B2, Some(2))).await.unwrap();
        dao.insert_or_replace(course("Ethics", 2.0, Level::B2, None)).await.unwrap();

        let names = |courses: Vec<course::Model>| -> Vec<String> {
            courses.into_iter().map(|c| c.name).collect()
        };

        assert_eq!(names(dao.fetch_by_teacher(1).await.unwrap()), vec!["Algebra", "Optics"]);
        assert_eq!(
            names(dao.fetch_by_level(Level::B2).await.unwrap()),
            vec!["Botany", "Ethics", "Optics"]
        );
        assert!(dao.fetch_by_level(Level::PhD).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_emits_once_per_write_with_full_snapshot() {
        let store = memory_store().await;
        let dao = store.courses();
        let mut live = dao.list_all();
        assert!(live.next().await.unwrap().unwrap().is_empty());

        let zoology = dao
            .insert_or_replace(course("Zoology", 5.0, Level::A1, None))
            .await
            .unwrap();
        let snapshot = live.next().await.unwrap().unwrap();
        assert_eq!(snapshot, vec![zoology.clone()]);
        assert!(no_more(&mut live).await);

        let anatomy = dao
            .insert_or_replace(course("Anatomy", 5.0, Level::A1, None))
            .await
            .unwrap();
        let snapshot = live.next().await.unwrap().unwrap();
        assert_eq!(snapshot, vec![anatomy.clone(), zoology.clone()]);
        assert!(no_more(&mut live).await);

        // Writes to other tables do not touch the course stream
        store.hub().notify(Table::Enrollments, ChangeKind::Upserted);
        assert!(no_more(&mut live).await);

        assert!(dao.delete(&zoology).await.unwrap());
        let snapshot = live.next().await.unwrap().unwrap();
        assert_eq!(snapshot, vec![anatomy]);
        assert!(no_more(&mut live).await);
    }

    #[tokio::test]
    async fn test_live_by_teacher_follows_reassignment() {
        let dao = memory_store().await.courses();
        let mut mine = dao.list_by_teacher(7);
        assert!(mine.next().await.unwrap().unwrap().is_empty());

        let saved = dao
            .insert_or_replace(course("Rhetoric", 2.5, Level::P3, None))
            .await
            .unwrap();
        assert!(mine.next().await.unwrap().unwrap().is_empty());

        let assigned = course::Model {
            teacher_id: Some(7),
            ..saved
        };
        dao.insert_or_replace(assigned.clone()).await.unwrap();
        assert_eq!(mine.next().await.unwrap().unwrap(), vec![assigned]);
    }
}
