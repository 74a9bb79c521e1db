use anyhow::Result;
use model::Level;
use model::entities::{student, teacher};
use sea_orm::ActiveValue::{NotSet, Set};
use tracing::info;

use super::print_json;
use crate::cli::PersonArgs;
use crate::config::AppState;

pub async fn register_student(state: &AppState, person: PersonArgs, level: Level) -> Result<()> {
    let active = student::ActiveModel {
        id: person.id.map_or(NotSet, Set),
        username: Set(person.username),
        password: Set(person.password),
        last_name: Set(person.last_name),
        first_name: Set(person.first_name),
        date_of_birth: Set(person.date_of_birth),
        gender: Set(person.gender),
        level_of_study: Set(level),
        photo_uri: Set(person.photo_uri),
    };

    let saved = state.auth.register_student(active).await?;
    info!(student_id = saved.id, "Registered student {}", saved.display_name());
    print_json(&saved)
}

pub async fn register_teacher(state: &AppState, person: PersonArgs) -> Result<()> {
    let active = teacher::ActiveModel {
        id: person.id.map_or(NotSet, Set),
        username: Set(person.username),
        password: Set(person.password),
        last_name: Set(person.last_name),
        first_name: Set(person.first_name),
        date_of_birth: Set(person.date_of_birth),
        gender: Set(person.gender),
        photo_uri: Set(person.photo_uri),
    };

    let saved = state.auth.register_teacher(active).await?;
    info!(teacher_id = saved.id, "Registered teacher {}", saved.username);
    print_json(&saved)
}
