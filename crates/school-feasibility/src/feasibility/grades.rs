use super::config::{CohortBands, EngineConfig};
use super::domain::CohortBandKind;
use super::input::GradeRow;
use serde::Serialize;

/// Roster laid out over the canonical grade list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeTable {
    pub grades: Vec<GradeRow>,
    pub total_students: f64,
}

impl GradeTable {
    pub fn branch_counts(&self) -> impl Iterator<Item = (&str, f64)> {
        self.grades
            .iter()
            .map(|row| (row.grade.as_str(), row.branch_count))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BandTotals {
    pub pre_primary: f64,
    pub primary: f64,
    pub middle: f64,
    pub secondary: f64,
    pub total: f64,
}

impl BandTotals {
    pub fn get(&self, kind: CohortBandKind) -> f64 {
        match kind {
            CohortBandKind::PrePrimary => self.pre_primary,
            CohortBandKind::Primary => self.primary,
            CohortBandKind::Middle => self.middle,
            CohortBandKind::Secondary => self.secondary,
        }
    }

    fn set(&mut self, kind: CohortBandKind, value: f64) {
        match kind {
            CohortBandKind::PrePrimary => self.pre_primary = value,
            CohortBandKind::Primary => self.primary = value,
            CohortBandKind::Middle => self.middle = value,
            CohortBandKind::Secondary => self.secondary = value,
        }
    }
}

/// Normalizes a sparse roster and sums it into cohort bands.
pub struct GradeAggregator<'a> {
    config: &'a EngineConfig,
}

impl<'a> GradeAggregator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// One row per canonical grade; rows for unknown grades are ignored and
    /// missing grades read as zero.
    pub fn table(&self, rows: &[GradeRow]) -> GradeTable {
        let grades: Vec<GradeRow> = self
            .config
            .grade_keys
            .iter()
            .map(|key| {
                let matched = rows
                    .iter()
                    .find(|row| row.grade.trim().eq_ignore_ascii_case(key));
                GradeRow {
                    grade: key.clone(),
                    branch_count: matched.map_or(0.0, |row| row.branch_count.max(0.0)),
                    total_students: matched.map_or(0.0, |row| row.total_students.max(0.0)),
                }
            })
            .collect();

        let total_students = grades.iter().map(|row| row.total_students).sum();
        GradeTable {
            grades,
            total_students,
        }
    }

    pub fn band_totals(&self, table: &GradeTable, bands: &CohortBands) -> BandTotals {
        let mut totals = BandTotals::default();

        for kind in CohortBandKind::ordered() {
            let band = bands.get(kind);
            if !band.enabled {
                continue;
            }

            let (Some(from), Some(to)) = (
                self.config.grade_index(&band.from_grade),
                self.config.grade_index(&band.to_grade),
            ) else {
                continue;
            };

            let (low, high) = (from.min(to), from.max(to));
            let band_total = table
                .grades
                .iter()
                .enumerate()
                .filter(|(index, _)| (low..=high).contains(index))
                .map(|(_, row)| row.total_students)
                .sum();
            totals.set(kind, band_total);
        }

        totals.total = CohortBandKind::ordered()
            .into_iter()
            .map(|kind| totals.get(kind))
            .sum();
        totals
    }
}
