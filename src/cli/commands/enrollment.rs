use anyhow::Result;
use serde_json::json;

use super::{print_json, snapshot};
use crate::config::AppState;

pub async fn enroll(state: &AppState, student_id: i32, course_id: i32) -> Result<()> {
    let enrollment = state.enrollments.enroll(student_id, course_id).await?;
    print_json(&enrollment)
}

pub async fn unenroll(state: &AppState, student_id: i32, course_id: i32) -> Result<()> {
    let removed = state.enrollments.unenroll(student_id, course_id).await?;
    print_json(&json!({
        "student_id": student_id,
        "course_id": course_id,
        "removed": removed,
    }))
}

pub async fn grade(state: &AppState, student_id: i32, course_id: i32, score: f64) -> Result<()> {
    let enrollment = state
        .enrollments
        .update_score(student_id, course_id, score)
        .await?;
    print_json(&enrollment)
}

pub async fn grades(state: &AppState, student_id: i32) -> Result<()> {
    print_json(&snapshot(state.enrollments.student_grades(student_id)).await?)
}

pub async fn roster(state: &AppState, course_id: i32) -> Result<()> {
    print_json(&snapshot(state.enrollments.course_roster(course_id)).await?)
}
