use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Gender, Level};

/// A student account.
/// Usernames are not unique; login matches on username and password together.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    /// Stored and compared in plaintext.
    pub password: String,
    pub last_name: String,
    pub first_name: String,
    pub date_of_birth: Date,
    pub gender: Gender,
    /// Restricts which courses are offered to the student.
    pub level_of_study: Level,
    pub photo_uri: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A student can hold many enrollments.
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollment,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// "Last, First" as shown in rosters.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}
