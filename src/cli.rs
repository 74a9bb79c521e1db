use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use model::{Gender, Level};

pub mod commands;

use crate::config::{AppConfig, AppState};
use commands::{courses, enrollment, initdb, login, register, students, summary, watch};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "Student records: courses, enrollments and ECTS-weighted grades")]
#[command(version)]
pub struct Cli {
    /// Database URL
    ///
    /// Overrides the configured URL. For SQLite use
    /// sqlite:///absolute/path/to/gradebook.db?mode=rwc
    #[arg(short, long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Fields shared by student and teacher registration.
#[derive(Args, Debug, Clone)]
pub struct PersonArgs {
    /// Replace the account with this id instead of creating one
    #[arg(long)]
    pub id: Option<i32>,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub first_name: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: NaiveDate,
    /// male, female or not-concerned
    #[arg(long, default_value = "not-concerned")]
    pub gender: Gender,
    #[arg(long)]
    pub photo_uri: Option<String>,
}

#[derive(Subcommand)]
pub enum WatchTarget {
    /// Courses the student is enrolled in
    Courses {
        #[arg(long)]
        student_id: i32,
    },
    /// The student's final grade
    Grades {
        #[arg(long)]
        student_id: i32,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database schema if it does not exist
    InitDb,
    /// Register a student account
    RegisterStudent {
        #[command(flatten)]
        person: PersonArgs,
        /// Level of study (P1..P3, B1..B3, A1..A3, MS, PhD)
        #[arg(long)]
        level: Level,
    },
    /// Register a teacher account
    RegisterTeacher {
        #[command(flatten)]
        person: PersonArgs,
    },
    /// List every student
    Students,
    /// Delete a student account. Its enrollments are kept.
    DeleteStudent {
        #[arg(long)]
        student_id: i32,
    },
    /// Check credentials and print the resulting login state
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Declare a course, or replace one when --id is given
    AddCourse {
        #[arg(long)]
        id: Option<i32>,
        #[arg(long)]
        name: String,
        /// Credit weight, must be positive
        #[arg(long)]
        ects: f64,
        #[arg(long)]
        level: Level,
        #[arg(long)]
        teacher_id: Option<i32>,
    },
    /// Delete a course. Its enrollments are kept.
    DeleteCourse {
        #[arg(long)]
        course_id: i32,
    },
    /// Enroll a student in a course
    Enroll {
        #[arg(long)]
        student_id: i32,
        #[arg(long)]
        course_id: i32,
    },
    /// Remove a student from a course
    Unenroll {
        #[arg(long)]
        student_id: i32,
        #[arg(long)]
        course_id: i32,
    },
    /// Set the score of an enrollment
    Grade {
        #[arg(long)]
        student_id: i32,
        #[arg(long)]
        course_id: i32,
        #[arg(long, allow_negative_numbers = true)]
        score: f64,
    },
    /// List the courses a student is enrolled in
    Courses {
        #[arg(long)]
        student_id: i32,
        /// List courses of the student's level not enrolled in yet instead
        #[arg(long)]
        available: bool,
    },
    /// List the courses taught by a teacher
    TeacherCourses {
        #[arg(long)]
        teacher_id: i32,
    },
    /// List the courses of a level
    LevelCourses {
        #[arg(long)]
        level: Level,
    },
    /// Print a student's grade sheet
    Grades {
        #[arg(long)]
        student_id: i32,
    },
    /// Print a student's ECTS-weighted final grade
    Summary {
        #[arg(long)]
        student_id: i32,
        /// Break the grade down per level
        #[arg(long)]
        by_level: bool,
    },
    /// Print the students of a course with their scores
    Roster {
        #[arg(long)]
        course_id: i32,
    },
    /// Follow a live view until Ctrl-C
    Watch {
        #[command(subcommand)]
        target: WatchTarget,
    },
}

impl Cli {
    pub async fn run(self, config: AppConfig) -> Result<()> {
        let config = config.with_database_url(self.database_url);
        let state = AppState::build(&config).await?;

        match self.command {
            Commands::InitDb => initdb::init_database(&state, &config).await?,
            Commands::RegisterStudent { person, level } => {
                register::register_student(&state, person, level).await?
            }
            Commands::RegisterTeacher { person } => {
                register::register_teacher(&state, person).await?
            }
            Commands::Students => students::list_students(&state).await?,
            Commands::DeleteStudent { student_id } => {
                students::delete_student(&state, student_id).await?
            }
            Commands::Login { username, password } => {
                login::login(&state, &username, &password).await?
            }
            Commands::AddCourse {
                id,
                name,
                ects,
                level,
                teacher_id,
            } => courses::add_course(&state, id, name, ects, level, teacher_id).await?,
            Commands::DeleteCourse { course_id } => {
                courses::delete_course(&state, course_id).await?
            }
            Commands::Enroll {
                student_id,
                course_id,
            } => enrollment::enroll(&state, student_id, course_id).await?,
            Commands::Unenroll {
                student_id,
                course_id,
            } => enrollment::unenroll(&state, student_id, course_id).await?,
            Commands::Grade {
                student_id,
                course_id,
                score,
            } => enrollment::grade(&state, student_id, course_id, score).await?,
            Commands::Courses {
                student_id,
                available,
            } => courses::list_courses(&state, student_id, available).await?,
            Commands::TeacherCourses { teacher_id } => {
                courses::teacher_courses(&state, teacher_id).await?
            }
            Commands::LevelCourses { level } => courses::level_courses(&state, level).await?,
            Commands::Grades { student_id } => enrollment::grades(&state, student_id).await?,
            Commands::Summary {
                student_id,
                by_level,
            } => summary::summary(&state, student_id, by_level).await?,
            Commands::Roster { course_id } => enrollment::roster(&state, course_id).await?,
            Commands::Watch { target } => watch::watch(&state, &config, target).await?,
        }
        Ok(())
    }
}
