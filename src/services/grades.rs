use compute::{GradeComputer, GradeSummary, LevelGrade};
use model::entities::course;
use store::{ChangeHub, EnrollmentDao, LiveQuery, Table};

/// Live ECTS-weighted grade aggregates for a student.
///
/// Each emission re-reads the student's enrollments joined to their courses
/// and reduces them from scratch.
#[derive(Debug, Clone)]
pub struct GradeService {
    hub: ChangeHub,
    enrollments: EnrollmentDao,
    computer: GradeComputer,
}

impl GradeService {
    pub fn new(hub: ChangeHub, enrollments: EnrollmentDao, computer: GradeComputer) -> Self {
        Self {
            hub,
            enrollments,
            computer,
        }
    }

    pub fn final_grade(&self, student_id: i32) -> LiveQuery<GradeSummary> {
        let enrollments = self.enrollments.clone();
        let computer = self.computer;
        self.hub
            .live(&[Table::Enrollments, Table::Courses], move || {
                let enrollments = enrollments.clone();
                async move {
                    let pairs = graded_pairs(&enrollments, student_id).await;
                    pairs.map(|pairs| computer.final_grade(&pairs))
                }
            })
    }

    /// One entry per level, including levels the student has no course in.
    pub fn grades_by_level(&self, student_id: i32) -> LiveQuery<Vec<LevelGrade>> {
        let enrollments = self.enrollments.clone();
        let computer = self.computer;
        self.hub
            .live(&[Table::Enrollments, Table::Courses], move || {
                let enrollments = enrollments.clone();
                async move {
                    let pairs = graded_pairs(&enrollments, student_id).await;
                    pairs.map(|pairs| computer.grades_by_level(&pairs))
                }
            })
    }
}

async fn graded_pairs(
    enrollments: &EnrollmentDao,
    student_id: i32,
) -> store::Result<Vec<(course::Model, Option<f64>)>> {
    Ok(enrollments
        .list_with_courses(student_id)
        .await?
        .into_iter()
        .map(|(enrollment, course)| (course, enrollment.score))
        .collect())
}
