use anyhow::{Result, anyhow};
use model::Level;
use tracing::{debug, info};

use super::{print_json, snapshot};
use crate::config::AppState;
use crate::services::CourseForm;

pub async fn add_course(
    state: &AppState,
    id: Option<i32>,
    name: String,
    ects: f64,
    level: Level,
    teacher_id: Option<i32>,
) -> Result<()> {
    let form = CourseForm {
        id,
        name,
        ects,
        level,
        teacher_id,
    };
    let course = state.catalog.save_course(form).await?;
    info!(course_id = course.id, "Course declared");
    print_json(&course)
}

pub async fn delete_course(state: &AppState, course_id: i32) -> Result<()> {
    let course = state
        .catalog
        .course(course_id)
        .await?
        .ok_or_else(|| anyhow!("No course with id {}", course_id))?;
    let deleted = state.catalog.delete_course(&course).await?;
    print_json(&serde_json::json!({ "course_id": course_id, "deleted": deleted }))
}

/// Enrolled courses, or with `available` the courses of the student's level
/// not enrolled in yet.
pub async fn list_courses(state: &AppState, student_id: i32, available: bool) -> Result<()> {
    let courses = if available {
        let student = state
            .students
            .student(student_id)
            .await?
            .ok_or_else(|| anyhow!("No student with id {}", student_id))?;
        debug!(level = %student.level_of_study, "Listing available courses");
        snapshot(
            state
                .enrollments
                .available_courses(student_id, student.level_of_study),
        )
        .await?
    } else {
        snapshot(state.enrollments.enrolled_courses(student_id)).await?
    };
    print_json(&courses)
}

pub async fn teacher_courses(state: &AppState, teacher_id: i32) -> Result<()> {
    print_json(&snapshot(state.catalog.courses_for_teacher(teacher_id)).await?)
}

pub async fn level_courses(state: &AppState, level: Level) -> Result<()> {
    print_json(&snapshot(state.catalog.courses_by_level(level)).await?)
}
