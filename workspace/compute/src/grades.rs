use model::Level;
use model::entities::course;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// ECTS-weighted aggregate of a set of graded courses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GradeSummary {
    /// Sum of the ECTS of every graded course.
    pub graded_ects: f64,
    /// Sum of `ects * score` over the graded courses.
    pub weighted_sum: f64,
    /// `weighted_sum / graded_ects`, absent when nothing carrying credit is graded.
    pub weighted_average: Option<f64>,
    pub graded_courses: usize,
}

/// The summary restricted to the courses of one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelGrade {
    pub level: Level,
    pub summary: GradeSummary,
}

/// Computes weighted grade averages from `(course, score)` pairs.
///
/// Pairs without a score are ungraded and left out entirely: they add
/// neither credits nor points.
#[derive(Debug, Default, Clone, Copy)]
pub struct GradeComputer;

impl GradeComputer {
    pub fn new() -> Self {
        Self
    }

    /// Weighted average over every graded pair.
    #[instrument(skip(self, grades), fields(num_pairs = grades.len()))]
    pub fn final_grade(&self, grades: &[(course::Model, Option<f64>)]) -> GradeSummary {
        let summary = summarize(grades.iter().map(|(course, score)| (course, *score)));
        debug!(
            graded_courses = summary.graded_courses,
            graded_ects = summary.graded_ects,
            average = ?summary.weighted_average,
            "Computed final grade"
        );
        summary
    }

    /// One entry per level in level order, including levels with no course.
    #[instrument(skip(self, grades), fields(num_pairs = grades.len()))]
    pub fn grades_by_level(&self, grades: &[(course::Model, Option<f64>)]) -> Vec<LevelGrade> {
        Level::ALL
            .iter()
            .map(|&level| {
                let summary = summarize(
                    grades
                        .iter()
                        .filter(|(course, _)| course.level == level)
                        .map(|(course, score)| (course, *score)),
                );
                trace!(%level, graded = summary.graded_courses, "Level summary");
                LevelGrade { level, summary }
            })
            .collect()
    }
}

fn summarize<'a>(pairs: impl Iterator<Item = (&'a course::Model, Option<f64>)>) -> GradeSummary {
    let mut summary = GradeSummary::default();
    for (course, score) in pairs {
        let Some(score) = score else { continue };
        summary.graded_ects += course.ects;
        summary.weighted_sum += course.ects * score;
        summary.graded_courses += 1;
    }
    if summary.graded_ects > 0.0 {
        summary.weighted_average = Some(summary.weighted_sum / summary.graded_ects);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: i32, ects: f64, level: Level) -> course::Model {
        course::Model {
            id,
            name: format!("Course {id}"),
            ects,
            level,
            teacher_id: None,
        }
    }

    #[test]
    fn test_weighted_average_by_ects() {
        let grades = vec![
            (course(1, 3.0, Level::B1), Some(10.0)),
            (course(2, 5.0, Level::B1), Some(16.0)),
        ];

        let summary = GradeComputer::new().final_grade(&grades);
        assert_eq!(summary.graded_ects, 8.0);
        assert_eq!(summary.weighted_sum, 110.0);
        assert_eq!(summary.weighted_average, Some(13.75));
        assert_eq!(summary.graded_courses, 2);
    }

    #[test]
    fn test_nothing_graded_has_no_average() {
        let computer = GradeComputer::new();
        assert_eq!(computer.final_grade(&[]).weighted_average, None);

        let ungraded = vec![(course(1, 6.0, Level::A1), None)];
        let summary = computer.final_grade(&ungraded);
        assert_eq!(summary, GradeSummary::default());
    }

    #[test]
    fn test_ungraded_courses_do_not_dilute_the_average() {
        let grades = vec![
            (course(1, 4.0, Level::B2), Some(14.0)),
            (course(2, 20.0, Level::B2), None),
        ];

        let summary = GradeComputer::new().final_grade(&grades);
        assert_eq!(summary.graded_ects, 4.0);
        assert_eq!(summary.weighted_average, Some(14.0));
    }

    #[test]
    fn test_zero_credit_courses_leave_average_absent() {
        let grades = vec![(course(1, 0.0, Level::P1), Some(18.0))];

        let summary = GradeComputer::new().final_grade(&grades);
        assert_eq!(summary.graded_courses, 1);
        assert_eq!(summary.weighted_average, None);
    }

    #[test]
    fn test_grades_by_level_covers_every_level() {
        let grades = vec![
            (course(1, 2.0, Level::B1), Some(12.0)),
            (course(2, 2.0, Level::B1), Some(8.0)),
            (course(3, 6.0, Level::MS), Some(15.0)),
            (course(4, 6.0, Level::MS), None),
        ];

        let by_level = GradeComputer::new().grades_by_level(&grades);
        assert_eq!(by_level.len(), Level::ALL.len());
        assert!(by_level.windows(2).all(|w| w[0].level < w[1].level));

        let average = |level: Level| {
            by_level
                .iter()
                .find(|entry| entry.level == level)
                .and_then(|entry| entry.summary.weighted_average)
        };
        assert_eq!(average(Level::B1), Some(10.0));
        assert_eq!(average(Level::MS), Some(15.0));
        assert_eq!(average(Level::P1), None);
        assert_eq!(average(Level::PhD), None);
    }
}
