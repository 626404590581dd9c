use super::domain::SalaryLine;
use super::input::{ExpenseInput, UnitCostItem};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseLine {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub operating: Vec<ExpenseLine>,
    pub operating_total: f64,
    pub services: Vec<ExpenseLine>,
    pub services_total: f64,
    pub dormitory: Vec<ExpenseLine>,
    pub dormitory_total: f64,
    /// Sum of the five HR-driven salary lines within operating expenses.
    pub hr_total: f64,
    pub total_expenses: f64,
    #[serde(skip)]
    pub warnings: Vec<String>,
}

fn per_student_lines(items: &BTreeMap<String, UnitCostItem>) -> (Vec<ExpenseLine>, f64) {
    let lines: Vec<ExpenseLine> = items
        .iter()
        .map(|(name, item)| ExpenseLine {
            name: name.clone(),
            amount: item.student_count.max(0.0) * item.unit_cost.max(0.0),
        })
        .collect();
    let total = lines.iter().map(|line| line.amount).sum();
    (lines, total)
}

pub fn calculate_expenses(expenses: &ExpenseInput) -> ExpenseSummary {
    let mut warnings = Vec::new();
    let mut hr_total = 0.0;

    let operating: Vec<ExpenseLine> = expenses
        .operating
        .iter()
        .map(|(name, raw)| {
            if *raw < 0.0 {
                warnings.push(format!(
                    "operating expense '{name}' is negative ({raw}); counted as 0"
                ));
            }
            let amount = raw.max(0.0);
            if SalaryLine::is_salary_key(name) {
                hr_total += amount;
            }
            ExpenseLine {
                name: name.clone(),
                amount,
            }
        })
        .collect();
    let operating_total: f64 = operating.iter().map(|line| line.amount).sum();

    let (services, services_total) = per_student_lines(&expenses.services);
    let (dormitory, dormitory_total) = per_student_lines(&expenses.dormitory);

    ExpenseSummary {
        operating,
        operating_total,
        services,
        services_total,
        dormitory,
        dormitory_total,
        hr_total,
        total_expenses: operating_total + services_total + dormitory_total,
        warnings,
    }
}
