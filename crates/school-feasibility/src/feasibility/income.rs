use super::input::{ResolvedRevenue, RevenueSource};
use serde::Serialize;

/// Gross revenue across all categories, before discounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrossIncome {
    pub gross_tuition: f64,
    pub tuition_students: f64,
    pub tuition_avg_fee: f64,
    pub non_education_fees_total: f64,
    pub dormitory_revenues_total: f64,
    pub legacy_other_fees_total: f64,
    pub other_institution_income_total: f64,
    pub government_incentives: f64,
    pub other_income_total: f64,
    pub activity_gross: f64,
    pub total_gross_income: f64,
    pub full_legacy_mode: bool,
}

fn category_total<R>(
    source: &RevenueSource<R>,
    total_students: f64,
    line: impl Fn(&R) -> (f64, f64),
) -> (f64, f64) {
    match source {
        RevenueSource::Itemized(rows) => rows.iter().fold((0.0, 0.0), |(amount, students), row| {
            let (count, fee) = line(row);
            let count = count.max(0.0);
            (amount + count * fee.max(0.0), students + count)
        }),
        RevenueSource::Legacy { per_student_fee } => (
            total_students * per_student_fee.max(0.0),
            total_students,
        ),
    }
}

/// Sums gross income. `count_other_income_in_legacy_mode` controls whether
/// other institutional income survives when no category is itemized.
pub fn calculate_income(
    revenue: &ResolvedRevenue,
    total_students: f64,
    count_other_income_in_legacy_mode: bool,
) -> GrossIncome {
    let (gross_tuition, itemized_students) =
        category_total(&revenue.tuition, total_students, |row| {
            (row.student_count, row.unit_fee)
        });
    let tuition_students = if itemized_students > 0.0 {
        itemized_students
    } else {
        total_students
    };
    let tuition_avg_fee = if tuition_students > 0.0 {
        gross_tuition / tuition_students
    } else {
        0.0
    };

    let (non_education_fees_total, _) =
        category_total(&revenue.non_education_fees, total_students, |row| {
            (row.student_count, row.unit_fee)
        });
    let (dormitory_revenues_total, _) =
        category_total(&revenue.dormitory, total_students, |row| {
            (row.student_count, row.unit_fee)
        });

    let full_legacy_mode = revenue.is_full_legacy();
    let legacy_other_fees_total = if full_legacy_mode {
        total_students * revenue.other_fee_per_student.max(0.0)
    } else {
        0.0
    };

    let activity_gross =
        gross_tuition + non_education_fees_total + dormitory_revenues_total + legacy_other_fees_total;

    let (other_institution_income_total, government_incentives) =
        if full_legacy_mode && !count_other_income_in_legacy_mode {
            (0.0, 0.0)
        } else {
            (
                revenue
                    .other_institution_income
                    .iter()
                    .map(|row| row.amount.max(0.0))
                    .sum(),
                revenue.government_incentives.max(0.0),
            )
        };
    let other_income_total = other_institution_income_total + government_incentives;

    GrossIncome {
        gross_tuition,
        tuition_students,
        tuition_avg_fee,
        non_education_fees_total,
        dormitory_revenues_total,
        legacy_other_fees_total,
        other_institution_income_total,
        government_incentives,
        other_income_total,
        activity_gross,
        total_gross_income: activity_gross + other_income_total,
        full_legacy_mode,
    }
}
