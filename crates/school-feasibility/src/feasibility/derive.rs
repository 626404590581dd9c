use super::config::EngineConfig;
use super::domain::{DiscountMode, ProjectionYear, SalaryLine, TuitionTrack, YearMap};
use super::grades::{BandTotals, GradeAggregator};
use super::input::{
    DiscountInput, ExpenseInput, FeeInput, FeeRow, GradeRow, ResolvedRevenue, RevenueSource,
    ScenarioInput, Shape, TuitionRow, YearInput,
};
use super::salary::StaffingSummary;

/// Builds each projection year's input from the base-year scenario. The base
/// scenario is only ever borrowed; every year works on its own copies.
pub struct YearDeriver<'a> {
    config: &'a EngineConfig,
    base: &'a ScenarioInput,
    staffing: &'a YearMap<StaffingSummary>,
}

impl<'a> YearDeriver<'a> {
    pub fn new(
        config: &'a EngineConfig,
        base: &'a ScenarioInput,
        staffing: &'a YearMap<StaffingSummary>,
    ) -> Self {
        Self {
            config,
            base,
            staffing,
        }
    }

    pub fn derive(&self, year: ProjectionYear, factor: f64) -> YearInput {
        let bands = self.base.cohort_bands.resolve(&self.config.default_bands);
        let mut input = YearInput::new(year, bands);
        input.inflation_factor = factor;
        input.grades = self.roster_for(year);

        let aggregator = GradeAggregator::new(self.config);
        let table = aggregator.table(&input.grades);
        let band_totals = aggregator.band_totals(&table, &input.bands);

        input.revenue = self.revenue_for(year, factor, &band_totals, &mut input.input_errors);
        input.expenses = self.expenses_for(year, factor);
        input.discounts = self.discounts_for(factor, &mut input.input_errors);
        input.capacity = Some(self.capacity_for(year));
        input.legacy_capacity = self.base.school.capacity;
        input
    }

    fn roster_for(&self, year: ProjectionYear) -> Vec<GradeRow> {
        let plan = &self.base.grade_plan;
        [plan.get(year), &plan.y1]
            .into_iter()
            .flatten()
            .find(|rows| !rows.is_empty())
            .unwrap_or(&self.base.grades)
            .clone()
    }

    fn capacity_for(&self, year: ProjectionYear) -> f64 {
        let by_year = &self.base.capacity_by_year;
        (*by_year.get(year))
            .or(by_year.y1)
            .or(self.base.capacity)
            .unwrap_or(0.0)
    }

    fn revenue_for(
        &self,
        year: ProjectionYear,
        factor: f64,
        bands: &BandTotals,
        errors: &mut Vec<String>,
    ) -> ResolvedRevenue {
        let revenue = &self.base.revenue;

        let tuition_rows: Vec<TuitionRow> = match &revenue.tuition.rows {
            Shape::Valid(rows) => rows
                .iter()
                .map(|row| {
                    let student_count = match TuitionTrack::from_key(&row.key) {
                        TuitionTrack::Band(kind) => bands.get(kind),
                        TuitionTrack::International => 0.0,
                        TuitionTrack::Unmapped => row.student_count,
                    };
                    TuitionRow {
                        student_count,
                        unit_fee: row.unit_fee * factor,
                        ..row.clone()
                    }
                })
                .collect(),
            Shape::Absent => Vec::new(),
            Shape::Invalid => {
                errors.push("tuition rows must be a list of tuition items".to_string());
                Vec::new()
            }
        };

        let fee_source = |fees: &FeeInput| -> RevenueSource<FeeRow> {
            let rows = fees
                .rows
                .iter()
                .map(|row| FeeRow {
                    student_count: row.student_count_for(year),
                    unit_fee: row.unit_fee * factor,
                    ..row.clone()
                })
                .collect();
            RevenueSource::resolve(rows, fees.per_student_fee * factor)
        };

        ResolvedRevenue {
            tuition: RevenueSource::resolve(tuition_rows, revenue.tuition.per_student_fee * factor),
            non_education_fees: fee_source(&revenue.non_education_fees),
            dormitory: fee_source(&revenue.dormitory),
            other_institution_income: revenue
                .other_institution_income
                .iter()
                .map(|row| {
                    let mut row = row.clone();
                    row.amount *= factor;
                    row
                })
                .collect(),
            government_incentives: revenue.government_incentives * factor,
            other_fee_per_student: revenue.other_fee_per_student * factor,
        }
    }

    fn expenses_for(&self, year: ProjectionYear, factor: f64) -> ExpenseInput {
        let mut expenses = self.base.expenses.clone();

        for amount in expenses.operating.values_mut() {
            *amount *= factor;
        }
        for item in expenses
            .services
            .values_mut()
            .chain(expenses.dormitory.values_mut())
        {
            item.unit_cost *= factor;
        }

        for line in SalaryLine::ordered() {
            let amount = self.salary_for(year, line, factor);
            expenses
                .operating
                .insert(line.expense_key().to_string(), amount);
        }

        expenses
    }

    /// HR-grid cost for the year when positive, otherwise the inflated year-1
    /// figure (grid first, then the raw operating expense value).
    fn salary_for(&self, year: ProjectionYear, line: SalaryLine, factor: f64) -> f64 {
        let mapped = self.staffing.get(year).salary_lines.get(line);
        if mapped > 0.0 {
            return mapped;
        }

        let year_one_mapped = self.staffing.y1.salary_lines.get(line);
        let year_one = if year_one_mapped > 0.0 {
            year_one_mapped
        } else {
            self.base
                .expenses
                .operating
                .get(line.expense_key())
                .copied()
                .unwrap_or(0.0)
        };
        year_one * factor
    }

    fn discounts_for(&self, factor: f64, errors: &mut Vec<String>) -> Vec<DiscountInput> {
        match &self.base.discounts {
            Shape::Valid(categories) => categories
                .iter()
                .map(|category| {
                    let mut category = category.clone();
                    if DiscountMode::parse(&category.mode) == Some(DiscountMode::Fixed) {
                        category.value = category.value.map(|value| value * factor);
                    }
                    category
                })
                .collect(),
            Shape::Absent => Vec::new(),
            Shape::Invalid => {
                errors.push("discounts must be a list of discount categories".to_string());
                Vec::new()
            }
        }
    }
}
