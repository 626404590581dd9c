use super::domain::CohortBandKind;
use super::input::lenient;
use serde::{Deserialize, Serialize};

/// Inclusive grade range for one cohort band. The endpoints may be given in
/// either order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortBand {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient::text")]
    pub from_grade: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub to_grade: String,
}

fn enabled_by_default() -> bool {
    true
}

impl CohortBand {
    pub fn new(from_grade: &str, to_grade: &str) -> Self {
        Self {
            enabled: true,
            from_grade: from_grade.to_string(),
            to_grade: to_grade.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortBands {
    pub pre_primary: CohortBand,
    pub primary: CohortBand,
    pub middle: CohortBand,
    pub secondary: CohortBand,
}

impl CohortBands {
    pub fn get(&self, kind: CohortBandKind) -> &CohortBand {
        match kind {
            CohortBandKind::PrePrimary => &self.pre_primary,
            CohortBandKind::Primary => &self.primary,
            CohortBandKind::Middle => &self.middle,
            CohortBandKind::Secondary => &self.secondary,
        }
    }
}

impl Default for CohortBands {
    fn default() -> Self {
        Self {
            pre_primary: CohortBand::new("KG", "KG"),
            primary: CohortBand::new("1", "4"),
            middle: CohortBand::new("5", "8"),
            secondary: CohortBand::new("9", "12"),
        }
    }
}

/// Defaults and thresholds the projection engine runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Canonical grade order; range lookups use positions in this list.
    pub grade_keys: Vec<String>,
    pub default_bands: CohortBands,
    pub default_teacher_weekly_max_hours: f64,
    pub low_utilization_threshold: f64,
    pub capacity_risk_threshold: f64,
    pub discount_pressure_threshold: f64,
    pub inflation_rate_floor: f64,
    pub inflation_rate_ceiling: f64,
    /// When false, other institutional income and government incentives are
    /// reported as zero for scenarios without any itemized revenue rows.
    pub legacy_mode_counts_other_income: bool,
}

impl EngineConfig {
    pub fn grade_index(&self, grade: &str) -> Option<usize> {
        let grade = grade.trim();
        self.grade_keys
            .iter()
            .position(|key| key.eq_ignore_ascii_case(grade))
    }

    pub fn clamp_inflation_rate(&self, rate: f64) -> f64 {
        if !rate.is_finite() {
            return 0.0;
        }
        rate.clamp(self.inflation_rate_floor, self.inflation_rate_ceiling)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut grade_keys = vec!["KG".to_string()];
        grade_keys.extend((1..=12).map(|grade: u8| grade.to_string()));

        Self {
            grade_keys,
            default_bands: CohortBands::default(),
            default_teacher_weekly_max_hours: 24.0,
            low_utilization_threshold: 0.6,
            capacity_risk_threshold: 0.95,
            discount_pressure_threshold: 0.3,
            inflation_rate_floor: -0.99,
            inflation_rate_ceiling: 10.0,
            legacy_mode_counts_other_income: false,
        }
    }
}
