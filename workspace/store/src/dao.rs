//! One data-access object per entity.
//!
//! Writes go through `insert_or_replace`/`delete` and publish on the change
//! hub once they have committed. Each live list has a one-shot `fetch_*`
//! twin that derived projections use to re-read without subscribing.

mod course;
mod enrollment;
mod student;
mod teacher;

pub use course::CourseDao;
pub use enrollment::EnrollmentDao;
pub use student::StudentDao;
pub use teacher::TeacherDao;

use sea_orm::{ActiveValue, Value};

/// The value carried by an active field, if the caller supplied one.
pub(crate) fn explicit_value<V>(value: &ActiveValue<V>) -> Option<V>
where
    V: Into<Value> + Clone,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v.clone()),
        ActiveValue::NotSet => None,
    }
}
