use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk_auto(Students::Id))
                    .col(string(Students::Username))
                    .col(string(Students::Password))
                    .col(string(Students::LastName))
                    .col(string(Students::FirstName))
                    .col(date(Students::DateOfBirth))
                    .col(string_len(Students::Gender, 20))
                    .col(string_len(Students::LevelOfStudy, 3))
                    .col(string_null(Students::PhotoUri))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_username")
                    .table(Students::Table)
                    .col(Students::Username)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Create teachers table
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(pk_auto(Teachers::Id))
                    .col(string(Teachers::Username))
                    .col(string(Teachers::Password))
                    .col(string(Teachers::LastName))
                    .col(string(Teachers::FirstName))
                    .col(date(Teachers::DateOfBirth))
                    .col(string_len(Teachers::Gender, 20))
                    .col(string_null(Teachers::PhotoUri))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_teachers_username")
                    .table(Teachers::Table)
                    .col(Teachers::Username)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Create courses table. teacher_id is deliberately not a foreign key:
        // an unassigned course is valid and deletes never cascade.
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(pk_auto(Courses::Id))
                    .col(string(Courses::Name))
                    .col(double(Courses::Ects))
                    .col(string_len(Courses::Level, 3))
                    .col(integer_null(Courses::TeacherId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_teacher")
                    .table(Courses::Table)
                    .col(Courses::TeacherId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_level")
                    .table(Courses::Table)
                    .col(Courses::Level)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(pk_auto(Enrollments::Id))
                    .col(integer(Enrollments::StudentId))
                    .col(integer(Enrollments::CourseId))
                    .col(double_null(Enrollments::Score))
                    .to_owned(),
            )
            .await?;

        // Upserts target this index, one row per (student, course)
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::CourseId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Username,
    Password,
    LastName,
    FirstName,
    DateOfBirth,
    Gender,
    LevelOfStudy,
    PhotoUri,
}

#[derive(DeriveIden)]
enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
    Username,
    Password,
    LastName,
    FirstName,
    DateOfBirth,
    Gender,
    PhotoUri,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Name,
    Ects,
    Level,
    TeacherId,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    CourseId,
    Score,
}
