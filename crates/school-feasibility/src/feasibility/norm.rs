use super::grades::GradeTable;
use super::input::{NormConfig, Shape};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeHours {
    pub grade: String,
    pub branch_count: f64,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectHours {
    pub subject: String,
    pub hours: f64,
}

/// Teaching load and the teacher count needed to cover it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormSummary {
    pub teacher_weekly_max_hours: Option<f64>,
    pub total_teaching_hours: f64,
    pub required_teachers: u64,
    pub grades: Vec<GradeHours>,
    /// Sorted by hours, highest first; ties keep first-seen order.
    pub subjects: Vec<SubjectHours>,
    #[serde(skip)]
    pub errors: Vec<String>,
}

/// Hours scale with class sections, not with student numbers.
pub fn calculate_norm(table: &GradeTable, config: &NormConfig) -> NormSummary {
    let mut errors = Vec::new();

    let max_hours = config
        .teacher_weekly_max_hours
        .filter(|hours| *hours > 0.0);
    if max_hours.is_none() {
        errors.push("teacher weekly max hours must be greater than zero".to_string());
    }

    let curriculum = match &config.curriculum_weekly_hours {
        Shape::Valid(table) => Some(table),
        Shape::Absent => {
            errors.push("curriculum weekly hours table is missing".to_string());
            None
        }
        Shape::Invalid => {
            errors.push("curriculum weekly hours table must be an object".to_string());
            None
        }
    };

    let mut grades = Vec::with_capacity(table.grades.len());
    let mut subjects: Vec<SubjectHours> = Vec::new();
    let mut total_teaching_hours = 0.0;

    for (grade, branch_count) in table.branch_counts() {
        let mut grade_hours = 0.0;
        let rows = curriculum.and_then(|curriculum| curriculum.subjects_for(grade));

        for (subject, hours) in rows.unwrap_or_default() {
            let Some(per_class) = hours.filter(|hours| *hours >= 0.0) else {
                continue;
            };

            let subject_hours = per_class * branch_count;
            grade_hours += subject_hours;

            match subjects.iter_mut().find(|entry| &entry.subject == subject) {
                Some(entry) => entry.hours += subject_hours,
                None => subjects.push(SubjectHours {
                    subject: subject.clone(),
                    hours: subject_hours,
                }),
            }
        }

        total_teaching_hours += grade_hours;
        grades.push(GradeHours {
            grade: grade.to_string(),
            branch_count,
            hours: grade_hours,
        });
    }

    // stable sort keeps insertion order for equal hours
    subjects.sort_by(|a, b| b.hours.total_cmp(&a.hours));

    let required_teachers = max_hours
        .map(|max_hours| (total_teaching_hours / max_hours).ceil().max(0.0) as u64)
        .unwrap_or(0);

    NormSummary {
        teacher_weekly_max_hours: config.teacher_weekly_max_hours,
        total_teaching_hours,
        required_teachers,
        grades,
        subjects,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feasibility::config::EngineConfig;
    use crate::feasibility::grades::GradeAggregator;
    use crate::feasibility::input::{CurriculumTable, GradeRow};

    fn curriculum(rows: Vec<(&str, Vec<(&str, Option<f64>)>)>) -> Shape<CurriculumTable> {
        Shape::Valid(CurriculumTable {
            grades: rows
                .into_iter()
                .map(|(grade, subjects)| {
                    (
                        grade.to_string(),
                        subjects
                            .into_iter()
                            .map(|(subject, hours)| (subject.to_string(), hours))
                            .collect(),
                    )
                })
                .collect(),
        })
    }

    fn table(rows: &[GradeRow]) -> GradeTable {
        GradeAggregator::new(&EngineConfig::default()).table(rows)
    }

    #[test]
    fn required_teachers_round_up() {
        let config = NormConfig {
            teacher_weekly_max_hours: Some(24.0),
            curriculum_weekly_hours: curriculum(vec![("1", vec![("math", Some(25.0))])]),
        };
        let summary = calculate_norm(&table(&[GradeRow::new("1", 4.0, 80.0)]), &config);

        assert_eq!(summary.total_teaching_hours, 100.0);
        assert_eq!(summary.required_teachers, 5);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn subjects_sorted_descending_with_stable_ties() {
        let config = NormConfig {
            teacher_weekly_max_hours: Some(20.0),
            curriculum_weekly_hours: curriculum(vec![
                (
                    "1",
                    vec![
                        ("art", Some(2.0)),
                        ("math", Some(5.0)),
                        ("music", Some(2.0)),
                        ("bad", Some(-3.0)),
                        ("worse", None),
                    ],
                ),
                ("2", vec![("math", Some(5.0))]),
            ]),
        };
        let summary = calculate_norm(
            &table(&[GradeRow::new("1", 1.0, 20.0), GradeRow::new("2", 2.0, 40.0)]),
            &config,
        );

        let order: Vec<&str> = summary
            .subjects
            .iter()
            .map(|entry| entry.subject.as_str())
            .collect();
        assert_eq!(order, vec!["math", "art", "music"]);
        assert_eq!(summary.subjects[0].hours, 15.0);
        assert_eq!(summary.total_teaching_hours, 19.0);
        assert_eq!(summary.grades[1].hours, 9.0);
    }

    #[test]
    fn invalid_configuration_is_reported() {
        let config = NormConfig {
            teacher_weekly_max_hours: Some(0.0),
            curriculum_weekly_hours: Shape::Invalid,
        };
        let summary = calculate_norm(&table(&[GradeRow::new("1", 1.0, 20.0)]), &config);

        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.required_teachers, 0);
        assert_eq!(summary.total_teaching_hours, 0.0);
    }
}
