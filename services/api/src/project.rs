use clap::Args;
use school_feasibility::config::AppConfig;
use school_feasibility::error::AppError;
use school_feasibility::feasibility::domain::{CohortBandKind, SalaryLine};
use school_feasibility::feasibility::{
    load_norms, load_scenario, render_payload, FeasibilityEngine, FeasibilityResult, NormPlan,
    RosterImporter, YearResult,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// Scenario JSON document with the base-year inputs
    #[arg(long)]
    pub(crate) scenario: PathBuf,
    /// Norm JSON document (teacher hours and curriculum); defaults apply when omitted
    #[arg(long)]
    pub(crate) norms: Option<PathBuf>,
    /// CSV roster (grade,branch_count,total_students) replacing the scenario's grades
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Print the rendered JSON payload instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_projection(args: ProjectArgs) -> Result<(), AppError> {
    let ProjectArgs {
        scenario,
        norms,
        roster_csv,
        json,
    } = args;

    let config = AppConfig::load()?;
    let mut scenario = load_scenario(&scenario)?;
    if let Some(path) = roster_csv {
        scenario.grades = RosterImporter::from_path(path)?;
    }
    let norms = match norms {
        Some(path) => load_norms(&path)?,
        None => NormPlan::default(),
    };

    let engine = FeasibilityEngine::new(config.engine);
    let result = engine.run_feasibility(&scenario, &norms);

    if json {
        let payload = render_payload(&result)?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        render_summary(&result);
    }

    Ok(())
}

fn render_summary(result: &FeasibilityResult) {
    println!("School feasibility projection");
    println!(
        "Inflation: year 2 {:.1}% | year 3 {:.1}%",
        result.inflation.rates.y2 * 100.0,
        result.inflation.rates.y3 * 100.0
    );

    for (_, year) in result.years.iter() {
        render_year(year);
    }

    println!(
        "\nMulti-year outcome: {}",
        if result.multi_year_valid {
            "all years valid"
        } else {
            "one or more years invalid"
        }
    );
}

fn render_year(year: &YearResult) {
    println!(
        "\n{} (inflation factor {:.4})",
        year.year.label(),
        year.inflation_factor
    );
    println!(
        "- Students: {:.0} of {:.0} capacity{}",
        year.students.total_students,
        year.students.capacity,
        year.students
            .utilization
            .map(|utilization| format!(" ({:.1}% utilization)", utilization * 100.0))
            .unwrap_or_default()
    );
    println!("- Bands: {}", band_breakdown(year));
    println!(
        "- Gross income: {:.2} | discounts: {:.2} | net income: {:.2}",
        year.income.total_gross_income, year.income.total_discounts, year.income.net_income
    );
    println!(
        "- Expenses: {:.2} | net result: {:.2} | margin: {}",
        year.result.total_expenses,
        year.result.net_result,
        year.kpis
            .profit_margin
            .map(|margin| format!("{:.1}%", margin * 100.0))
            .unwrap_or_else(|| "n/a".to_string())
    );
    println!(
        "- Staff: {:.0} | salaries: {}",
        year.staffing.total_headcount,
        salary_breakdown(year)
    );
    println!(
        "- Teaching hours: {:.1} | required teachers: {}",
        year.norm.total_teaching_hours, year.norm.required_teachers
    );

    for error in &year.flags.errors {
        println!("  ! {error}");
    }
    for warning in &year.flags.warnings {
        println!("  - {warning}");
    }
}

fn band_breakdown(year: &YearResult) -> String {
    CohortBandKind::ordered()
        .into_iter()
        .map(|kind| format!("{} {:.0}", kind.label(), year.students.bands.get(kind)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Salary lines with a non-zero cost, or `none`.
fn salary_breakdown(year: &YearResult) -> String {
    let lines: Vec<String> = SalaryLine::ordered()
        .into_iter()
        .map(|line| (line, year.staffing.salary_lines.get(line)))
        .filter(|(_, cost)| *cost != 0.0)
        .map(|(line, cost)| format!("{} {:.2}", line.label(), cost))
        .collect();

    if lines.is_empty() {
        "none".to_string()
    } else {
        lines.join(" | ")
    }
}
