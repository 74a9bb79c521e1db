use anyhow::Result;
use tracing::warn;

use super::{print_json, snapshot};
use crate::config::AppState;

pub async fn list_students(state: &AppState) -> Result<()> {
    print_json(&snapshot(state.students.students()).await?)
}

/// Enrollments of the student are left in place.
pub async fn delete_student(state: &AppState, student_id: i32) -> Result<()> {
    let deleted = state.students.delete_student(student_id).await?;
    if !deleted {
        warn!(student_id, "No student with that id");
    }
    print_json(&serde_json::json!({ "student_id": student_id, "deleted": deleted }))
}
