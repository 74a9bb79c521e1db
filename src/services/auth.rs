use async_trait::async_trait;
use model::Level;
use model::entities::{student, teacher};
use sea_orm::IntoActiveModel;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use store::{StudentDao, TeacherDao};
use tracing::{debug, info, instrument, trace, warn};

use super::error::ServiceResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Teacher,
}

/// Who logged in. `level_of_study` is only set for students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
    pub level_of_study: Option<Level>,
}

/// Looks up one kind of user by exact username and password.
#[async_trait]
pub trait CredentialLookup: Debug + Send + Sync {
    fn role(&self) -> UserRole;

    async fn lookup(&self, username: &str, password: &str) -> store::Result<Option<AuthResult>>;
}

#[async_trait]
impl CredentialLookup for StudentDao {
    fn role(&self) -> UserRole {
        UserRole::Student
    }

    async fn lookup(&self, username: &str, password: &str) -> store::Result<Option<AuthResult>> {
        Ok(self
            .find_by_credentials(username, password)
            .await?
            .map(|student| AuthResult {
                user_id: student.id,
                username: student.username,
                role: UserRole::Student,
                level_of_study: Some(student.level_of_study),
            }))
    }
}

#[async_trait]
impl CredentialLookup for TeacherDao {
    fn role(&self) -> UserRole {
        UserRole::Teacher
    }

    async fn lookup(&self, username: &str, password: &str) -> store::Result<Option<AuthResult>> {
        Ok(self
            .find_by_credentials(username, password)
            .await?
            .map(|teacher| AuthResult {
                user_id: teacher.id,
                username: teacher.username,
                role: UserRole::Teacher,
                level_of_study: None,
            }))
    }
}

/// Authenticates against students first, then teachers.
///
/// Usernames are not unique across the two tables. When the same
/// credentials match in both, the student wins and a warning is logged.
#[derive(Debug, Clone)]
pub struct AuthService {
    lookups: Vec<Arc<dyn CredentialLookup>>,
    students: StudentDao,
    teachers: TeacherDao,
}

impl AuthService {
    pub fn new(students: StudentDao, teachers: TeacherDao) -> Self {
        let lookups: Vec<Arc<dyn CredentialLookup>> =
            vec![Arc::new(students.clone()), Arc::new(teachers.clone())];
        Self {
            lookups,
            students,
            teachers,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<Option<AuthResult>> {
        let mut winner: Option<AuthResult> = None;

        // Every lookup runs even after a match so that duplicated
        // credentials are reported.
        for lookup in &self.lookups {
            trace!(role = ?lookup.role(), "Checking credentials");
            let Some(found) = lookup.lookup(username, password).await? else {
                continue;
            };
            match &winner {
                None => winner = Some(found),
                Some(first) => warn!(
                    username,
                    kept = ?first.role,
                    ignored = ?found.role,
                    ignored_id = found.user_id,
                    "Credentials match more than one account"
                ),
            }
        }

        match &winner {
            Some(user) => info!(user_id = user.user_id, role = ?user.role, "Login succeeded"),
            None => debug!("No account matches the credentials"),
        }
        Ok(winner)
    }

    /// Saves the student as given. Usernames are not checked for uniqueness.
    #[instrument(skip(self, student))]
    pub async fn register_student<A>(&self, student: A) -> ServiceResult<student::Model>
    where
        A: IntoActiveModel<student::ActiveModel> + Send,
    {
        Ok(self.students.insert_or_replace(student).await?)
    }

    #[instrument(skip(self, teacher))]
    pub async fn register_teacher<A>(&self, teacher: A) -> ServiceResult<teacher::Model>
    where
        A: IntoActiveModel<teacher::ActiveModel> + Send,
    {
        Ok(self.teachers.insert_or_replace(teacher).await?)
    }
}
