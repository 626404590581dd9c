use super::super::config::EngineConfig;
use super::views::{KpiSummary, NetResult};

/// Inputs the KPI step reads from the already computed year.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KpiInputs {
    pub total_students: f64,
    pub tuition_students: f64,
    pub utilization: Option<f64>,
    pub total_gross_income: f64,
    pub gross_tuition: f64,
    pub total_discounts: f64,
    pub hr_total: f64,
    pub result: NetResult,
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

pub(crate) fn derive_kpis(inputs: &KpiInputs) -> KpiSummary {
    let denominator = if inputs.tuition_students > 0.0 {
        inputs.tuition_students
    } else {
        inputs.total_students
    };
    let result = inputs.result;

    KpiSummary {
        utilization: inputs.utilization,
        per_student_denominator: denominator,
        gross_income_per_student: ratio(inputs.total_gross_income, denominator),
        net_income_per_student: ratio(result.net_income, denominator),
        expense_per_student: ratio(result.total_expenses, denominator),
        net_result_per_student: ratio(result.net_result, denominator),
        profit_margin: ratio(result.net_result, result.net_income),
        discount_to_tuition_ratio: ratio(inputs.total_discounts, inputs.gross_tuition),
        hr_share: ratio(inputs.hr_total, result.total_expenses),
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Informational findings over the KPIs. They never affect validity.
pub(crate) fn kpi_warnings(kpis: &KpiSummary, config: &EngineConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(utilization) = kpis.utilization {
        if utilization < config.low_utilization_threshold {
            warnings.push(format!(
                "low utilization: {} of capacity is below {}",
                percent(utilization),
                percent(config.low_utilization_threshold)
            ));
        } else if utilization > config.capacity_risk_threshold {
            warnings.push(format!(
                "capacity risk: {} of capacity is above {}",
                percent(utilization),
                percent(config.capacity_risk_threshold)
            ));
        }
    }

    if let Some(margin) = kpis.profit_margin {
        if margin < 0.0 {
            warnings.push(format!("operating loss: profit margin is {}", percent(margin)));
        }
    }

    if let Some(discount_ratio) = kpis.discount_to_tuition_ratio {
        if discount_ratio > config.discount_pressure_threshold {
            warnings.push(format!(
                "high discount pressure: discounts are {} of gross tuition",
                percent(discount_ratio)
            ));
        }
    }

    warnings
}
