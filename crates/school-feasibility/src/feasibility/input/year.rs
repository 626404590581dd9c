use super::{DiscountInput, ExpenseInput, FeeRow, GradeRow, LumpSumRow, TuitionRow};
use crate::feasibility::config::CohortBands;
use crate::feasibility::domain::ProjectionYear;

/// Revenue category resolved once into either itemized rows or the legacy
/// per-student scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum RevenueSource<R> {
    Itemized(Vec<R>),
    Legacy { per_student_fee: f64 },
}

impl<R> RevenueSource<R> {
    /// Itemized rows win whenever there is at least one.
    pub fn resolve(rows: Vec<R>, per_student_fee: f64) -> Self {
        if rows.is_empty() {
            RevenueSource::Legacy { per_student_fee }
        } else {
            RevenueSource::Itemized(rows)
        }
    }

    pub fn is_itemized(&self) -> bool {
        matches!(self, RevenueSource::Itemized(_))
    }
}

impl<R> Default for RevenueSource<R> {
    fn default() -> Self {
        RevenueSource::Legacy {
            per_student_fee: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRevenue {
    pub tuition: RevenueSource<TuitionRow>,
    pub non_education_fees: RevenueSource<FeeRow>,
    pub dormitory: RevenueSource<FeeRow>,
    pub other_institution_income: Vec<LumpSumRow>,
    pub government_incentives: f64,
    pub other_fee_per_student: f64,
}

impl ResolvedRevenue {
    /// No main category uses itemized rows.
    pub fn is_full_legacy(&self) -> bool {
        !self.tuition.is_itemized()
            && !self.non_education_fees.is_itemized()
            && !self.dormitory.is_itemized()
    }
}

/// Fully resolved input for a single projection year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearInput {
    pub year: ProjectionYear,
    pub inflation_factor: f64,
    pub grades: Vec<GradeRow>,
    pub bands: CohortBands,
    pub revenue: ResolvedRevenue,
    pub expenses: ExpenseInput,
    pub discounts: Vec<DiscountInput>,
    pub capacity: Option<f64>,
    /// Nested legacy capacity, consulted when `capacity` is not positive.
    pub legacy_capacity: Option<f64>,
    /// Structural input problems found while deriving the year.
    pub input_errors: Vec<String>,
}

impl YearInput {
    pub fn new(year: ProjectionYear, bands: CohortBands) -> Self {
        Self {
            year,
            inflation_factor: 1.0,
            grades: Vec::new(),
            bands,
            revenue: ResolvedRevenue::default(),
            expenses: ExpenseInput::default(),
            discounts: Vec::new(),
            capacity: None,
            legacy_capacity: None,
            input_errors: Vec::new(),
        }
    }

    pub fn resolved_capacity(&self) -> f64 {
        self.capacity
            .filter(|capacity| *capacity > 0.0)
            .or(self.legacy_capacity)
            .unwrap_or(0.0)
    }
}
