use super::domain::{SalaryLine, StaffLevel, StaffRole};
use super::input::HrYearData;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleCost {
    pub role: StaffRole,
    pub role_label: &'static str,
    pub total_headcount: f64,
    pub unit_cost: f64,
    pub annual_cost: f64,
}

/// Annual cost of each HR-driven salary expense line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SalaryLines {
    pub national_staff: f64,
    pub national_support_staff: f64,
    pub local_staff: f64,
    pub local_support_staff: f64,
    pub international_staff: f64,
}

impl SalaryLines {
    pub fn get(&self, line: SalaryLine) -> f64 {
        match line {
            SalaryLine::NationalStaff => self.national_staff,
            SalaryLine::NationalSupportStaff => self.national_support_staff,
            SalaryLine::LocalStaff => self.local_staff,
            SalaryLine::LocalSupportStaff => self.local_support_staff,
            SalaryLine::InternationalStaff => self.international_staff,
        }
    }

    fn add(&mut self, line: SalaryLine, amount: f64) {
        let slot = match line {
            SalaryLine::NationalStaff => &mut self.national_staff,
            SalaryLine::NationalSupportStaff => &mut self.national_support_staff,
            SalaryLine::LocalStaff => &mut self.local_staff,
            SalaryLine::LocalSupportStaff => &mut self.local_support_staff,
            SalaryLine::InternationalStaff => &mut self.international_staff,
        };
        *slot += amount;
    }

    pub fn total(&self) -> f64 {
        SalaryLine::ordered()
            .into_iter()
            .map(|line| self.get(line))
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaffingSummary {
    pub roles: Vec<RoleCost>,
    pub salary_lines: SalaryLines,
    pub total_headcount: f64,
    pub total_salary_cost: f64,
}

/// Headcount x unit cost per role, bucketed into the five salary lines.
pub fn map_salaries(hr: &HrYearData) -> StaffingSummary {
    let mut salary_lines = SalaryLines::default();

    let roles: Vec<RoleCost> = StaffRole::ordered()
        .into_iter()
        .map(|role| {
            let total_headcount: f64 = StaffLevel::ordered()
                .into_iter()
                .filter_map(|level| hr.headcounts.get(level.key()))
                .filter_map(|counts| counts.get(role.key()))
                .map(|count| count.max(0.0))
                .sum();
            let unit_cost = hr
                .unit_costs
                .get(role.key())
                .copied()
                .unwrap_or(0.0)
                .max(0.0);
            let annual_cost = unit_cost * total_headcount;
            salary_lines.add(role.salary_line(), annual_cost);

            RoleCost {
                role,
                role_label: role.label(),
                total_headcount,
                unit_cost,
                annual_cost,
            }
        })
        .collect();

    let total_headcount = roles.iter().map(|role| role.total_headcount).sum();

    StaffingSummary {
        roles,
        total_headcount,
        total_salary_cost: salary_lines.total(),
        salary_lines,
    }
}
