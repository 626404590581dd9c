use super::super::discount::DiscountSummary;
use super::super::domain::{ProjectionYear, YearMap};
use super::super::expenses::ExpenseSummary;
use super::super::grades::BandTotals;
use super::super::input::GradeRow;
use super::super::norm::NormSummary;
use super::super::salary::StaffingSummary;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSummary {
    pub total_students: f64,
    pub tuition_students: f64,
    pub capacity: f64,
    pub utilization: Option<f64>,
    pub grades: Vec<GradeRow>,
    pub bands: BandTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeSummary {
    pub gross_tuition: f64,
    pub tuition_students: f64,
    pub tuition_avg_fee: f64,
    pub non_education_fees_total: f64,
    pub dormitory_revenues_total: f64,
    pub legacy_other_fees_total: f64,
    pub activity_gross: f64,
    pub other_institution_income_total: f64,
    pub government_incentives: f64,
    pub other_income_total: f64,
    pub total_gross_income: f64,
    pub full_legacy_mode: bool,
    pub total_discounts: f64,
    pub net_activity_income: f64,
    pub net_income: f64,
    pub discounts: DiscountSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetResult {
    pub net_activity_income: f64,
    pub net_income: f64,
    pub total_expenses: f64,
    pub net_result: f64,
}

/// Ratios are `None` whenever their denominator is zero or not finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    pub utilization: Option<f64>,
    pub per_student_denominator: f64,
    pub gross_income_per_student: Option<f64>,
    pub net_income_per_student: Option<f64>,
    pub expense_per_student: Option<f64>,
    pub net_result_per_student: Option<f64>,
    pub profit_margin: Option<f64>,
    pub discount_to_tuition_ratio: Option<f64>,
    pub hr_share: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Flags {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearResult {
    pub year: ProjectionYear,
    pub inflation_factor: f64,
    pub students: StudentSummary,
    pub income: IncomeSummary,
    pub expenses: ExpenseSummary,
    pub result: NetResult,
    pub kpis: KpiSummary,
    pub norm: NormSummary,
    pub staffing: StaffingSummary,
    pub flags: Flags,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InflationRates {
    pub y2: f64,
    pub y3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InflationSummary {
    /// Rates after clamping.
    pub rates: InflationRates,
    pub factors: YearMap<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityResult {
    pub years: YearMap<YearResult>,
    pub inflation: InflationSummary,
    pub multi_year_valid: bool,
}
