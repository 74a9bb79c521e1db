use model::Level;
use model::entities::{course, enrollment, student};
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use store::{ChangeHub, CourseDao, EnrollmentDao, LiveQuery, StudentDao, Table};
use tracing::{info, instrument, trace};

use super::error::{ServiceError, ServiceResult};

/// One line of a student's grade sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGrade {
    pub course: course::Model,
    pub score: Option<f64>,
}

/// One student of a course roster. `student` is `None` when the enrollment
/// outlived its student row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub enrollment_id: i32,
    pub student_id: i32,
    pub student: Option<student::Model>,
    pub score: Option<f64>,
}

/// Enrolling students and grading them, plus the course lists derived from
/// enrollments.
#[derive(Debug, Clone)]
pub struct EnrollmentService {
    hub: ChangeHub,
    students: StudentDao,
    courses: CourseDao,
    enrollments: EnrollmentDao,
}

impl EnrollmentService {
    pub fn new(
        hub: ChangeHub,
        students: StudentDao,
        courses: CourseDao,
        enrollments: EnrollmentDao,
    ) -> Self {
        Self {
            hub,
            students,
            courses,
            enrollments,
        }
    }

    /// Courses the student is enrolled in, in course order.
    pub fn enrolled_courses(&self, student_id: i32) -> LiveQuery<Vec<course::Model>> {
        let courses = self.courses.clone();
        let enrollments = self.enrollments.clone();
        self.hub
            .live(&[Table::Enrollments, Table::Courses], move || {
                let courses = courses.clone();
                let enrollments = enrollments.clone();
                async move { enrolled(&courses, &enrollments, student_id).await }
            })
    }

    /// Courses of `level` the student is not enrolled in yet.
    pub fn available_courses(&self, student_id: i32, level: Level) -> LiveQuery<Vec<course::Model>> {
        let courses = self.courses.clone();
        let enrollments = self.enrollments.clone();
        self.hub
            .live(&[Table::Enrollments, Table::Courses], move || {
                let courses = courses.clone();
                let enrollments = enrollments.clone();
                async move { available(&courses, &enrollments, student_id, level).await }
            })
    }

    /// Enrolls the student with no score. Enrolling again clears the score.
    #[instrument(skip(self))]
    pub async fn enroll(&self, student_id: i32, course_id: i32) -> ServiceResult<enrollment::Model> {
        if self.students.get_by_id(student_id).await?.is_none() {
            return Err(ServiceError::UnknownReference {
                entity: "student",
                id: student_id,
            });
        }
        if self.courses.get_by_id(course_id).await?.is_none() {
            return Err(ServiceError::UnknownReference {
                entity: "course",
                id: course_id,
            });
        }

        let enrollment = self.upsert(student_id, course_id, None).await?;
        info!(enrollment_id = enrollment.id, "Student enrolled");
        Ok(enrollment)
    }

    #[instrument(skip(self))]
    pub async fn unenroll(&self, student_id: i32, course_id: i32) -> ServiceResult<bool> {
        Ok(self.enrollments.delete_pair(student_id, course_id).await?)
    }

    /// Records a score on an existing enrollment. Scores are not range-checked.
    #[instrument(skip(self))]
    pub async fn update_score(
        &self,
        student_id: i32,
        course_id: i32,
        score: f64,
    ) -> ServiceResult<enrollment::Model> {
        if self.enrollments.find(student_id, course_id).await?.is_none() {
            return Err(ServiceError::UnknownEnrollment {
                student_id,
                course_id,
            });
        }
        let graded = self.upsert(student_id, course_id, Some(score)).await?;
        info!(enrollment_id = graded.id, score, "Score recorded");
        Ok(graded)
    }

    /// Every course the student is enrolled in with its score, by course name.
    pub fn student_grades(&self, student_id: i32) -> LiveQuery<Vec<CourseGrade>> {
        let enrollments = self.enrollments.clone();
        self.hub
            .live(&[Table::Enrollments, Table::Courses], move || {
                let enrollments = enrollments.clone();
                async move { grade_sheet(&enrollments, student_id).await }
            })
    }

    /// The students of a course with their scores, by student name.
    pub fn course_roster(&self, course_id: i32) -> LiveQuery<Vec<RosterEntry>> {
        let enrollments = self.enrollments.clone();
        self.hub
            .live(&[Table::Enrollments, Table::Students], move || {
                let enrollments = enrollments.clone();
                async move { roster(&enrollments, course_id).await }
            })
    }

    async fn upsert(
        &self,
        student_id: i32,
        course_id: i32,
        score: Option<f64>,
    ) -> ServiceResult<enrollment::Model> {
        trace!(student_id, course_id, ?score, "Writing enrollment");
        let active = enrollment::ActiveModel {
            id: NotSet,
            student_id: Set(student_id),
            course_id: Set(course_id),
            score: Set(score),
        };
        Ok(self.enrollments.insert_or_replace(active).await?)
    }
}

async fn enrolled_ids(enrollments: &EnrollmentDao, student_id: i32) -> store::Result<HashSet<i32>> {
    Ok(enrollments
        .fetch_by_student(student_id)
        .await?
        .into_iter()
        .map(|e| e.course_id)
        .collect())
}

async fn enrolled(
    courses: &CourseDao,
    enrollments: &EnrollmentDao,
    student_id: i32,
) -> store::Result<Vec<course::Model>> {
    let ids = enrolled_ids(enrollments, student_id).await?;
    let all = courses.fetch_all().await?;
    Ok(all.into_iter().filter(|c| ids.contains(&c.id)).collect())
}

async fn available(
    courses: &CourseDao,
    enrollments: &EnrollmentDao,
    student_id: i32,
    level: Level,
) -> store::Result<Vec<course::Model>> {
    let ids = enrolled_ids(enrollments, student_id).await?;
    let at_level = courses.fetch_by_level(level).await?;
    Ok(at_level.into_iter().filter(|c| !ids.contains(&c.id)).collect())
}

async fn grade_sheet(enrollments: &EnrollmentDao, student_id: i32) -> store::Result<Vec<CourseGrade>> {
    let rows = enrollments.list_with_courses(student_id).await?;
    Ok(rows
        .into_iter()
        .map(|(enrollment, course)| CourseGrade {
            course,
            score: enrollment.score,
        })
        .collect())
}

async fn roster(enrollments: &EnrollmentDao, course_id: i32) -> store::Result<Vec<RosterEntry>> {
    let rows = enrollments.list_with_students(course_id).await?;
    Ok(rows
        .into_iter()
        .map(|(enrollment, student)| RosterEntry {
            enrollment_id: enrollment.id,
            student_id: enrollment.student_id,
            student,
            score: enrollment.score,
        })
        .collect())
}
