use model::entities::enrollment::{self, Column};
use model::entities::prelude::{Course, Enrollment, Student};
use model::entities::{course, student};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Select,
};
use tracing::{debug, info, instrument};

use super::explicit_value;
use crate::error::{Result, StoreError};
use crate::live::{ChangeHub, ChangeKind, LiveQuery, Table};

/// Query layer for the `enrollments` table.
///
/// An enrollment is identified by its `(student_id, course_id)` pair: writes
/// go through the pair's unique index and the surrogate id is only used for
/// ordering and point lookups.
#[derive(Debug, Clone)]
pub struct EnrollmentDao {
    db: DatabaseConnection,
    hub: ChangeHub,
}

impl EnrollmentDao {
    pub fn new(db: DatabaseConnection, hub: ChangeHub) -> Self {
        Self { db, hub }
    }

    pub fn list_all(&self) -> LiveQuery<Vec<enrollment::Model>> {
        let db = self.db.clone();
        self.hub.live(&[Table::Enrollments], move || {
            let db = db.clone();
            async move { fetch(&db, Enrollment::find()).await }
        })
    }

    pub async fn fetch_all(&self) -> Result<Vec<enrollment::Model>> {
        fetch(&self.db, Enrollment::find()).await
    }

    pub fn list_by_student(&self, student_id: i32) -> LiveQuery<Vec<enrollment::Model>> {
        let db = self.db.clone();
        self.hub.live(&[Table::Enrollments], move || {
            let db = db.clone();
            async move { fetch(&db, by_student(student_id)).await }
        })
    }

    pub async fn fetch_by_student(&self, student_id: i32) -> Result<Vec<enrollment::Model>> {
        fetch(&self.db, by_student(student_id)).await
    }

    pub fn list_by_course(&self, course_id: i32) -> LiveQuery<Vec<enrollment::Model>> {
        let db = self.db.clone();
        self.hub.live(&[Table::Enrollments], move || {
            let db = db.clone();
            async move { fetch(&db, by_course(course_id)).await }
        })
    }

    pub async fn fetch_by_course(&self, course_id: i32) -> Result<Vec<enrollment::Model>> {
        fetch(&self.db, by_course(course_id)).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<enrollment::Model>> {
        Ok(Enrollment::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find(&self, student_id: i32, course_id: i32) -> Result<Option<enrollment::Model>> {
        Ok(Enrollment::find()
            .filter(pair(student_id, course_id))
            .one(&self.db)
            .await?)
    }

    /// Creates the enrollment, or overwrites the score of the row holding
    /// the same student and course. Any id on the input is ignored.
    pub async fn insert_or_replace<A>(&self, enrollment: A) -> Result<enrollment::Model>
    where
        A: IntoActiveModel<enrollment::ActiveModel>,
    {
        let mut active = enrollment.into_active_model();
        let (Some(student_id), Some(course_id)) = (
            explicit_value(&active.student_id),
            explicit_value(&active.course_id),
        ) else {
            return Err(StoreError::ConstraintViolation(
                "enrollment requires both student_id and course_id".to_string(),
            ));
        };
        active.id = NotSet;

        let on_conflict = OnConflict::columns([Column::StudentId, Column::CourseId])
            .update_column(Column::Score)
            .to_owned();
        Enrollment::insert(active)
            .on_conflict(on_conflict)
            .exec(&self.db)
            .await?;

        let stored = self.find(student_id, course_id).await?.ok_or_else(|| {
            StoreError::Database(DbErr::RecordNotFound(format!(
                "enrollment ({}, {}) after upsert",
                student_id, course_id
            )))
        })?;
        self.hub.notify(Table::Enrollments, ChangeKind::Upserted);
        info!(student_id, course_id, score = ?stored.score, "Enrollment saved");
        Ok(stored)
    }

    pub async fn delete(&self, enrollment: &enrollment::Model) -> Result<bool> {
        self.delete_pair(enrollment.student_id, enrollment.course_id)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_pair(&self, student_id: i32, course_id: i32) -> Result<bool> {
        let result = Enrollment::delete_many()
            .filter(pair(student_id, course_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            debug!("No enrollment to delete");
            return Ok(false);
        }
        self.hub.notify(Table::Enrollments, ChangeKind::Deleted);
        info!(student_id, course_id, "Enrollment deleted");
        Ok(true)
    }

    /// The student's enrollments joined to their course, by course name.
    /// Rows whose course no longer exists are skipped.
    pub async fn list_with_courses(
        &self,
        student_id: i32,
    ) -> Result<Vec<(enrollment::Model, course::Model)>> {
        let rows = Enrollment::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(Course)
            .order_by_asc(course::Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, course)| course.map(|course| (enrollment, course)))
            .collect())
    }

    /// The course's enrollments with their student, which is `None` once the
    /// student row has been deleted. Ordered by student name, then id.
    pub async fn list_with_students(
        &self,
        course_id: i32,
    ) -> Result<Vec<(enrollment::Model, Option<student::Model>)>> {
        Ok(Enrollment::find()
            .filter(Column::CourseId.eq(course_id))
            .find_also_related(Student)
            .order_by_asc(student::Column::LastName)
            .order_by_asc(student::Column::FirstName)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }
}

fn pair(student_id: i32, course_id: i32) -> Condition {
    Condition::all()
        .add(Column::StudentId.eq(student_id))
        .add(Column::CourseId.eq(course_id))
}

fn by_student(student_id: i32) -> Select<Enrollment> {
    Enrollment::find().filter(Column::StudentId.eq(student_id))
}

fn by_course(course_id: i32) -> Select<Enrollment> {
    Enrollment::find().filter(Column::CourseId.eq(course_id))
}

async fn fetch(
    db: &DatabaseConnection,
    select: Select<Enrollment>,
) -> Result<Vec<enrollment::Model>> {
    Ok(select.order_by_asc(Column::Id).all(db).await?)
}
