//! Scenario input as it arrives from callers, plus the per-year variants the
//! engine derives from it.

pub(crate) mod lenient;
mod year;

pub use lenient::Shape;
pub use year::{ResolvedRevenue, RevenueSource, YearInput};

use super::config::{CohortBand, CohortBands};
use super::domain::{ProjectionYear, YearMap};
use lenient::as_number;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Base-year scenario the three-year projection is derived from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioInput {
    #[serde(deserialize_with = "lenient::list")]
    pub grades: Vec<GradeRow>,
    #[serde(deserialize_with = "lenient::per_year_rows")]
    pub grade_plan: YearMap<Option<Vec<GradeRow>>>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub cohort_bands: CohortBandsInput,
    #[serde(deserialize_with = "lenient::or_default")]
    pub revenue: RevenueInput,
    #[serde(deserialize_with = "lenient::or_default")]
    pub expenses: ExpenseInput,
    pub discounts: Shape<Vec<DiscountInput>>,
    #[serde(deserialize_with = "lenient::per_year")]
    pub hr: YearMap<Option<HrYearData>>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub inflation: InflationInput,
    #[serde(deserialize_with = "lenient::optional_number")]
    pub capacity: Option<f64>,
    #[serde(deserialize_with = "lenient::per_year_numbers")]
    pub capacity_by_year: YearMap<Option<f64>>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub school: SchoolInput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeRow {
    #[serde(deserialize_with = "lenient::text")]
    pub grade: String,
    #[serde(deserialize_with = "lenient::number")]
    pub branch_count: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_students: f64,
}

impl GradeRow {
    pub fn new(grade: &str, branch_count: f64, total_students: f64) -> Self {
        Self {
            grade: grade.to_string(),
            branch_count,
            total_students,
        }
    }
}

/// Per-band overrides; a missing band uses the configured default range.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CohortBandsInput {
    pub pre_primary: Option<CohortBand>,
    pub primary: Option<CohortBand>,
    pub middle: Option<CohortBand>,
    pub secondary: Option<CohortBand>,
}

impl CohortBandsInput {
    pub fn resolve(&self, defaults: &CohortBands) -> CohortBands {
        CohortBands {
            pre_primary: self
                .pre_primary
                .clone()
                .unwrap_or_else(|| defaults.pre_primary.clone()),
            primary: self
                .primary
                .clone()
                .unwrap_or_else(|| defaults.primary.clone()),
            middle: self
                .middle
                .clone()
                .unwrap_or_else(|| defaults.middle.clone()),
            secondary: self
                .secondary
                .clone()
                .unwrap_or_else(|| defaults.secondary.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RevenueInput {
    #[serde(deserialize_with = "lenient::or_default")]
    pub tuition: TuitionInput,
    #[serde(deserialize_with = "lenient::or_default")]
    pub non_education_fees: FeeInput,
    #[serde(deserialize_with = "lenient::or_default")]
    pub dormitory: FeeInput,
    #[serde(deserialize_with = "lenient::list")]
    pub other_institution_income: Vec<LumpSumRow>,
    #[serde(deserialize_with = "lenient::number")]
    pub government_incentives: f64,
    /// Legacy per-student fee only counted when no category is itemized.
    #[serde(deserialize_with = "lenient::number")]
    pub other_fee_per_student: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TuitionInput {
    pub rows: Shape<Vec<TuitionRow>>,
    #[serde(deserialize_with = "lenient::number")]
    pub per_student_fee: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TuitionRow {
    #[serde(deserialize_with = "lenient::text")]
    pub key: String,
    #[serde(deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(deserialize_with = "lenient::number")]
    pub student_count: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub unit_fee: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeeInput {
    #[serde(deserialize_with = "lenient::list")]
    pub rows: Vec<FeeRow>,
    #[serde(deserialize_with = "lenient::number")]
    pub per_student_fee: f64,
}

/// Itemized non-tuition fee or dormitory row. Later years may carry their own
/// student counts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeeRow {
    #[serde(deserialize_with = "lenient::text")]
    pub key: String,
    #[serde(deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(deserialize_with = "lenient::number")]
    pub student_count: f64,
    #[serde(deserialize_with = "lenient::optional_number")]
    pub student_count_y2: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    pub student_count_y3: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub unit_fee: f64,
}

impl FeeRow {
    /// Student count for `year`, falling back one year at a time towards year 1.
    pub fn student_count_for(&self, year: ProjectionYear) -> f64 {
        match year {
            ProjectionYear::Y1 => self.student_count,
            ProjectionYear::Y2 => self.student_count_y2.unwrap_or(self.student_count),
            ProjectionYear::Y3 => self
                .student_count_y3
                .or(self.student_count_y2)
                .unwrap_or(self.student_count),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LumpSumRow {
    #[serde(deserialize_with = "lenient::text")]
    pub key: String,
    #[serde(deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(deserialize_with = "lenient::number")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpenseInput {
    #[serde(deserialize_with = "lenient::amounts")]
    pub operating: BTreeMap<String, f64>,
    #[serde(deserialize_with = "lenient::entries")]
    pub services: BTreeMap<String, UnitCostItem>,
    #[serde(deserialize_with = "lenient::entries")]
    pub dormitory: BTreeMap<String, UnitCostItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UnitCostItem {
    #[serde(deserialize_with = "lenient::number")]
    pub student_count: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub unit_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiscountInput {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub mode: String,
    #[serde(deserialize_with = "lenient::optional_number")]
    pub value: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    pub ratio: Option<f64>,
}

/// One year's HR grid: role unit costs and level -> role headcounts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HrYearData {
    #[serde(deserialize_with = "lenient::amounts")]
    pub unit_costs: BTreeMap<String, f64>,
    #[serde(deserialize_with = "lenient::amount_grid")]
    pub headcounts: BTreeMap<String, BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InflationInput {
    #[serde(deserialize_with = "lenient::number")]
    pub y2: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub y3: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchoolInput {
    #[serde(deserialize_with = "lenient::optional_number")]
    pub capacity: Option<f64>,
}

/// Weekly curriculum hours per class section, by grade then subject, in
/// document order. Unparseable hour entries are kept as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurriculumTable {
    pub grades: Vec<(String, Vec<(String, Option<f64>)>)>,
}

impl CurriculumTable {
    pub fn subjects_for(&self, grade: &str) -> Option<&[(String, Option<f64>)]> {
        self.grades
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(grade.trim()))
            .map(|(_, subjects)| subjects.as_slice())
    }
}

impl<'de> Deserialize<'de> for CurriculumTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Value::Object(grades) = value else {
            return Err(serde::de::Error::custom(
                "curriculum weekly hours must be an object",
            ));
        };

        let grades = grades
            .into_iter()
            .map(|(grade, subjects)| {
                let subjects = match subjects {
                    Value::Object(subjects) => subjects
                        .into_iter()
                        .map(|(subject, hours)| (subject, as_number(&hours)))
                        .collect(),
                    _ => Vec::new(),
                };
                (grade, subjects)
            })
            .collect();

        Ok(Self { grades })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormConfig {
    #[serde(deserialize_with = "lenient::optional_number")]
    pub teacher_weekly_max_hours: Option<f64>,
    pub curriculum_weekly_hours: Shape<CurriculumTable>,
}

impl NormConfig {
    pub fn is_specified(&self) -> bool {
        self.teacher_weekly_max_hours.is_some() || !self.curriculum_weekly_hours.is_absent()
    }

    /// Fallback used when neither a year-specific nor a base config exists.
    pub fn with_default_hours(hours: f64) -> Self {
        Self {
            teacher_weekly_max_hours: Some(hours),
            curriculum_weekly_hours: Shape::Valid(CurriculumTable::default()),
        }
    }
}

/// Base norm config plus optional per-year replacements.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormPlan {
    #[serde(deserialize_with = "lenient::optional_number")]
    pub teacher_weekly_max_hours: Option<f64>,
    pub curriculum_weekly_hours: Shape<CurriculumTable>,
    #[serde(deserialize_with = "lenient::per_year")]
    pub years: YearMap<Option<NormConfig>>,
}

impl NormPlan {
    pub fn base(&self) -> NormConfig {
        NormConfig {
            teacher_weekly_max_hours: self.teacher_weekly_max_hours,
            curriculum_weekly_hours: self.curriculum_weekly_hours.clone(),
        }
    }

    /// Year-specific config, else the base config, else the default hours.
    pub fn resolve(&self, year: ProjectionYear, default_hours: f64) -> NormConfig {
        if let Some(config) = self.years.get(year).as_ref().filter(|c| c.is_specified()) {
            return config.clone();
        }

        let base = self.base();
        if base.is_specified() {
            base
        } else {
            NormConfig::with_default_hours(default_hours)
        }
    }
}
