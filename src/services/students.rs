use model::entities::student;
use store::{LiveQuery, StudentDao};
use tracing::instrument;

use super::error::ServiceResult;

/// Browsing and removing student accounts. Accounts are created through
/// [`AuthService`](super::AuthService) registration.
#[derive(Debug, Clone)]
pub struct StudentService {
    students: StudentDao,
}

impl StudentService {
    pub fn new(students: StudentDao) -> Self {
        Self { students }
    }

    /// Every student ordered by last name, first name, then id.
    pub fn students(&self) -> LiveQuery<Vec<student::Model>> {
        self.students.list_all()
    }

    pub async fn student(&self, id: i32) -> ServiceResult<Option<student::Model>> {
        Ok(self.students.get_by_id(id).await?)
    }

    /// Returns `false` when no student has that id. The student's enrollments
    /// are kept: they still list under the id and show an absent student in
    /// course rosters.
    #[instrument(skip(self))]
    pub async fn delete_student(&self, id: i32) -> ServiceResult<bool> {
        Ok(self.students.delete_by_id(id).await?)
    }
}
