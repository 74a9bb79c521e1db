//! Use-case layer between the front end and the store.
//!
//! Services are thin: they validate, check references and compose DAO
//! queries into derived live projections. All state lives in the store.

pub mod auth;
pub mod catalog;
pub mod enrollment;
pub mod error;
pub mod grades;
pub mod students;

pub use auth::{AuthResult, AuthService, CredentialLookup, UserRole};
pub use catalog::{CatalogService, CourseForm};
pub use enrollment::{CourseGrade, EnrollmentService, RosterEntry};
pub use error::{ServiceError, ServiceResult};
pub use grades::GradeService;
pub use students::StudentService;
