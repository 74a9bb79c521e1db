//! Pure reductions over student records.
//!
//! Nothing in here touches the database: callers load the rows and hand
//! them over, which keeps every computation trivially testable.

pub mod grades;

pub use grades::{GradeComputer, GradeSummary, LevelGrade};

/// Returns the grade computer used by the services.
pub fn default_grades() -> GradeComputer {
    GradeComputer::new()
}
