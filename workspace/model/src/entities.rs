//! SeaORM entity modules for the student-records store.
//! Four tables: students, teachers, courses and the enrollments joining
//! students to courses. The enumerations shared between them live beside
//! the entities.

pub mod course;
pub mod enrollment;
pub mod gender;
pub mod level;
pub mod student;
pub mod teacher;

pub use gender::Gender;
pub use level::Level;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::course::Entity as Course;
    pub use super::enrollment::Entity as Enrollment;
    pub use super::student::Entity as Student;
    pub use super::teacher::Entity as Teacher;
    pub use super::{Gender, Level};
}
