use store::StoreError;
use thiserror::Error;
use validator::ValidationErrors;

/// Error types for the service layer
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Failure reported by the store, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Input rejected before anything was written
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// A referenced row does not exist
    #[error("Unknown {entity} with id {id}")]
    UnknownReference { entity: &'static str, id: i32 },

    /// The student is not enrolled in the course
    #[error("Student {student_id} is not enrolled in course {course_id}")]
    UnknownEnrollment { student_id: i32, course_id: i32 },
}

/// Type alias for Result with ServiceError
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
