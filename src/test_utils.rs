use chrono::NaiveDate;
use model::entities::{student, teacher};
use model::{Gender, Level};
use sea_orm::ActiveValue::{NotSet, Set};
use store::Store;
use tracing::Level as LogLevel;
use tracing_subscriber::FmtSubscriber;

use crate::config::AppState;
use crate::services::CourseForm;

/// In-memory store with the schema applied.
pub async fn setup_test_store() -> Store {
    Store::connect("sqlite::memory:", 32)
        .await
        .expect("Failed to open in-memory store")
}

/// Fully wired services over a fresh in-memory store.
pub async fn setup_test_app_state() -> AppState {
    AppState::from_store(setup_test_store().await)
}

pub fn new_student(username: &str, password: &str, last: &str, level: Level) -> student::ActiveModel {
    student::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        password: Set(password.to_string()),
        last_name: Set(last.to_string()),
        first_name: Set("Sam".to_string()),
        date_of_birth: Set(NaiveDate::from_ymd_opt(2003, 5, 17).unwrap()),
        gender: Set(Gender::NotConcerned),
        level_of_study: Set(level),
        photo_uri: Set(None),
    }
}

pub fn new_teacher(username: &str, password: &str, last: &str) -> teacher::ActiveModel {
    teacher::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        password: Set(password.to_string()),
        last_name: Set(last.to_string()),
        first_name: Set("Robin".to_string()),
        date_of_birth: Set(NaiveDate::from_ymd_opt(1975, 11, 2).unwrap()),
        gender: Set(Gender::Female),
        photo_uri: Set(None),
    }
}

pub fn course_form(name: &str, ects: f64, level: Level) -> CourseForm {
    CourseForm {
        id: None,
        name: name.to_string(),
        ects,
        level,
        teacher_id: None,
    }
}

/// Routes logs to stderr for the current test.
///
/// The level comes from `RUST_LOG` and defaults to WARN.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<LogLevel>().ok())
        .unwrap_or(LogLevel::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}
