use super::config::EngineConfig;
use super::derive::YearDeriver;
use super::discount::{calculate_discounts, TuitionBase};
use super::domain::YearMap;
use super::expenses::calculate_expenses;
use super::grades::GradeAggregator;
use super::income::calculate_income;
use super::input::{NormConfig, NormPlan, ScenarioInput, YearInput};
use super::norm::calculate_norm;
use super::report::{
    derive_kpis, kpi_warnings, FeasibilityResult, Flags, IncomeSummary, InflationRates,
    InflationSummary, KpiInputs, NetResult, StudentSummary, YearResult,
};
use super::salary::{map_salaries, StaffingSummary};
use tracing::{debug, warn};

/// Entry point of the projection pipeline. Holds no state besides its
/// configuration, so one engine can serve any number of scenarios.
#[derive(Debug, Clone, Default)]
pub struct FeasibilityEngine {
    config: EngineConfig,
}

impl FeasibilityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Projects all three years from the base scenario.
    pub fn run_feasibility(&self, scenario: &ScenarioInput, norms: &NormPlan) -> FeasibilityResult {
        let inflation = self.inflation(scenario);

        let staffing: YearMap<StaffingSummary> = YearMap::from_fn(|year| {
            scenario
                .hr
                .get(year)
                .as_ref()
                .map(map_salaries)
                .unwrap_or_default()
        });

        let deriver = YearDeriver::new(&self.config, scenario, &staffing);
        let years = YearMap::from_fn(|year| {
            let input = deriver.derive(year, *inflation.factors.get(year));
            let norm = norms.resolve(year, self.config.default_teacher_weekly_max_hours);
            let mut result = self.run_one_year(&input, &norm);
            result.staffing = staffing.get(year).clone();
            result
        });

        let multi_year_valid = years.iter().all(|(_, year)| year.is_valid);

        FeasibilityResult {
            years,
            inflation,
            multi_year_valid,
        }
    }

    /// Validates and computes a single projection year. Problems are
    /// reported through `flags`; a complete result is always returned.
    pub fn run_one_year(&self, input: &YearInput, norm_config: &NormConfig) -> YearResult {
        let mut flags = Flags {
            errors: input.input_errors.clone(),
            warnings: Vec::new(),
        };

        let aggregator = GradeAggregator::new(&self.config);
        let table = aggregator.table(&input.grades);
        let bands = aggregator.band_totals(&table, &input.bands);
        let total_students = table.total_students;

        let capacity = input.resolved_capacity();
        if capacity <= 0.0 {
            flags
                .errors
                .push(format!("capacity must be greater than 0 (got {capacity})"));
        } else if total_students > capacity {
            flags.errors.push(format!(
                "total students ({total_students}) exceed capacity ({capacity})"
            ));
        }
        if total_students < 0.0 {
            flags
                .errors
                .push(format!("total students cannot be negative ({total_students})"));
        }
        let utilization = (capacity > 0.0).then(|| total_students / capacity);

        let norm = calculate_norm(&table, norm_config);
        flags.errors.extend(norm.errors.iter().cloned());

        let gross = calculate_income(
            &input.revenue,
            total_students,
            self.config.legacy_mode_counts_other_income,
        );

        let discounts = calculate_discounts(
            TuitionBase {
                tuition_students: gross.tuition_students,
                gross_tuition: gross.gross_tuition,
                tuition_avg_fee: gross.tuition_avg_fee,
            },
            &input.discounts,
        );
        flags.warnings.extend(discounts.warnings.iter().cloned());
        if let Some(cap) = discounts.cap_applied {
            flags.warnings.push(format!(
                "discount rate {:.2} capped at {:.2}",
                cap.original_avg_rate, cap.capped_avg_rate
            ));
        }

        let expenses = calculate_expenses(&input.expenses);
        flags.warnings.extend(expenses.warnings.iter().cloned());

        let total_discounts = discounts.total_discounts;
        let net_activity_income = gross.activity_gross - total_discounts;
        let net_income = gross.total_gross_income - total_discounts;
        let result = NetResult {
            net_activity_income,
            net_income,
            total_expenses: expenses.total_expenses,
            net_result: net_income - expenses.total_expenses,
        };

        let kpis = derive_kpis(&KpiInputs {
            total_students,
            tuition_students: gross.tuition_students,
            utilization,
            total_gross_income: gross.total_gross_income,
            gross_tuition: gross.gross_tuition,
            total_discounts,
            hr_total: expenses.hr_total,
            result,
        });
        flags.warnings.extend(kpi_warnings(&kpis, &self.config));

        let is_valid = flags.errors.is_empty();
        debug!(
            year = input.year.key(),
            total_students,
            net_result = result.net_result,
            is_valid,
            "projected year"
        );
        if !is_valid {
            warn!(
                year = input.year.key(),
                errors = flags.errors.len(),
                "projection year failed validation"
            );
        }

        YearResult {
            year: input.year,
            inflation_factor: input.inflation_factor,
            students: StudentSummary {
                total_students,
                tuition_students: gross.tuition_students,
                capacity,
                utilization,
                grades: table.grades,
                bands,
            },
            income: IncomeSummary {
                gross_tuition: gross.gross_tuition,
                tuition_students: gross.tuition_students,
                tuition_avg_fee: gross.tuition_avg_fee,
                non_education_fees_total: gross.non_education_fees_total,
                dormitory_revenues_total: gross.dormitory_revenues_total,
                legacy_other_fees_total: gross.legacy_other_fees_total,
                activity_gross: gross.activity_gross,
                other_institution_income_total: gross.other_institution_income_total,
                government_incentives: gross.government_incentives,
                other_income_total: gross.other_income_total,
                total_gross_income: gross.total_gross_income,
                full_legacy_mode: gross.full_legacy_mode,
                total_discounts,
                net_activity_income,
                net_income,
                discounts,
            },
            expenses,
            result,
            kpis,
            norm,
            staffing: StaffingSummary::default(),
            flags,
            is_valid,
        }
    }

    fn inflation(&self, scenario: &ScenarioInput) -> InflationSummary {
        let rates = InflationRates {
            y2: self.config.clamp_inflation_rate(scenario.inflation.y2),
            y3: self.config.clamp_inflation_rate(scenario.inflation.y3),
        };
        let y2 = 1.0 + rates.y2;
        let factors = YearMap {
            y1: 1.0,
            y2,
            y3: y2 * (1.0 + rates.y3),
        };
        InflationSummary { rates, factors }
    }
}
