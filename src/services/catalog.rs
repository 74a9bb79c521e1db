use model::Level;
use model::entities::course;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};
use store::{CourseDao, LiveQuery};
use tracing::{debug, instrument};
use validator::{Validate, ValidationError};

use super::error::ServiceResult;

/// A course as declared by a teacher. Without an `id` a new course is
/// created, otherwise the course with that id is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "finite_ects"))]
pub struct CourseForm {
    pub id: Option<i32>,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0))]
    pub ects: f64,
    pub level: Level,
    pub teacher_id: Option<i32>,
}

// `range` lets NaN and infinities through.
fn finite_ects(form: &CourseForm) -> Result<(), ValidationError> {
    if form.ects.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite_ects"))
    }
}

impl CourseForm {
    fn into_active_model(self) -> course::ActiveModel {
        course::ActiveModel {
            id: self.id.map_or(NotSet, Set),
            name: Set(self.name),
            ects: Set(self.ects),
            level: Set(self.level),
            teacher_id: Set(self.teacher_id),
        }
    }
}

/// Course declaration and browsing.
#[derive(Debug, Clone)]
pub struct CatalogService {
    courses: CourseDao,
}

impl CatalogService {
    pub fn new(courses: CourseDao) -> Self {
        Self { courses }
    }

    /// Validates the form and saves it. Nothing is written when validation fails.
    #[instrument(skip(self), fields(name = %form.name))]
    pub async fn save_course(&self, form: CourseForm) -> ServiceResult<course::Model> {
        if let Err(errors) = form.validate() {
            debug!(%errors, "Course form rejected");
            return Err(errors.into());
        }
        Ok(self.courses.insert_or_replace(form.into_active_model()).await?)
    }

    pub fn courses(&self) -> LiveQuery<Vec<course::Model>> {
        self.courses.list_all()
    }

    pub fn courses_for_teacher(&self, teacher_id: i32) -> LiveQuery<Vec<course::Model>> {
        self.courses.list_by_teacher(teacher_id)
    }

    pub fn courses_by_level(&self, level: Level) -> LiveQuery<Vec<course::Model>> {
        self.courses.list_by_level(level)
    }

    pub async fn course(&self, id: i32) -> ServiceResult<Option<course::Model>> {
        Ok(self.courses.get_by_id(id).await?)
    }

    /// Enrollments in the course are kept and simply stop joining.
    #[instrument(skip(self, course), fields(course_id = course.id))]
    pub async fn delete_course(&self, course: &course::Model) -> ServiceResult<bool> {
        Ok(self.courses.delete(course).await?)
    }
}
