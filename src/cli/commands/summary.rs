use anyhow::Result;

use super::{print_json, snapshot};
use crate::config::AppState;

pub async fn summary(state: &AppState, student_id: i32, by_level: bool) -> Result<()> {
    if by_level {
        print_json(&snapshot(state.grades.grades_by_level(student_id)).await?)
    } else {
        print_json(&snapshot(state.grades.final_grade(student_id)).await?)
    }
}
