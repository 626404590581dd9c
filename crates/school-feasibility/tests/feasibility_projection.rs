use school_feasibility::feasibility::{
    render_payload, EngineConfig, FeasibilityEngine, NormPlan, ScenarioInput,
};
use serde_json::{json, Value};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn scenario() -> ScenarioInput {
    serde_json::from_value(json!({
        "grades": [
            { "grade": "KG", "branch_count": 1, "total_students": 20 },
            { "grade": "1", "branch_count": 2, "total_students": 40 },
            { "grade": "5", "branch_count": 1, "total_students": 25 }
        ],
        "capacity": 100,
        "revenue": {
            "tuition": { "rows": [
                { "key": "pre_primary", "label": "Kindergarten", "student_count": 0, "unit_fee": 3000 },
                { "key": "primary", "label": "Primary", "student_count": 0, "unit_fee": 4000 },
                { "key": "middle", "label": "Middle", "student_count": 0, "unit_fee": 5000 }
            ] },
            "other_institution_income": [{ "key": "hall_rental", "label": "Hall rental", "amount": 10000 }],
            "government_incentives": 5000
        },
        "expenses": {
            "operating": { "rent": 50000 },
            "services": { "catering": { "student_count": 85, "unit_cost": 200 } }
        },
        "discounts": [
            { "name": "sibling", "mode": "percent", "value": 0.5, "ratio": 0.2 }
        ],
        "hr": {
            "y1": {
                "unit_costs": { "national_teacher": 30000 },
                "headcounts": { "primary": { "national_teacher": 6 } }
            }
        },
        "inflation": { "y2": 0.1, "y3": 0.05 }
    }))
    .expect("scenario parses")
}

fn norms() -> NormPlan {
    serde_json::from_value(json!({
        "teacher_weekly_max_hours": 24,
        "curriculum_weekly_hours": {
            "KG": { "Play": 20 },
            "1": { "Math": 6, "Reading": 6 },
            "5": { "Math": 5, "Science": 5 }
        }
    }))
    .expect("norms parse")
}

#[test]
fn first_year_accumulates_income_discounts_and_expenses() {
    let result = FeasibilityEngine::default().run_feasibility(&scenario(), &norms());
    let year = &result.years.y1;

    assert!(year.is_valid, "unexpected errors: {:?}", year.flags.errors);
    assert_eq!(year.students.total_students, 85.0);
    assert_close(year.students.bands.middle, 25.0);
    assert_close(year.income.gross_tuition, 345_000.0);
    assert_close(year.income.total_discounts, 34_500.0);
    assert_close(year.income.total_gross_income, 360_000.0);
    assert_close(year.result.net_income, 325_500.0);
    assert_close(year.expenses.hr_total, 180_000.0);
    assert_close(year.result.total_expenses, 247_000.0);
    assert_close(year.result.net_result, 78_500.0);
    assert_eq!(year.norm.total_teaching_hours, 54.0);
    assert_eq!(year.norm.required_teachers, 3);
    assert_eq!(year.norm.subjects[0].subject, "Play");
    assert_eq!(year.norm.subjects[1].subject, "Math");
    assert_eq!(year.norm.subjects[1].hours, 17.0);
    assert!(year.flags.warnings.is_empty(), "{:?}", year.flags.warnings);
}

#[test]
fn later_years_inflate_fees_and_carry_salaries_forward() {
    let result = FeasibilityEngine::default().run_feasibility(&scenario(), &norms());
    let y2 = &result.years.y2;
    let y3 = &result.years.y3;

    assert_close(result.inflation.factors.y2, 1.1);
    assert_close(result.inflation.factors.y3, 1.1 * 1.05);
    assert_close(y2.income.gross_tuition, 345_000.0 * 1.1);
    assert_close(y2.expenses.hr_total, 180_000.0 * 1.1);
    assert_close(y3.expenses.hr_total, 180_000.0 * 1.1 * 1.05);
    assert_close(y2.expenses.services_total, 85.0 * 200.0 * 1.1);
    assert_eq!(y3.students.total_students, 85.0);
    assert!(result.multi_year_valid);
}

#[test]
fn single_invalid_year_breaks_multi_year_validity() {
    let mut scenario = scenario();
    scenario.capacity_by_year.y3 = Some(50.0);

    let result = FeasibilityEngine::default().run_feasibility(&scenario, &norms());

    assert!(result.years.y1.is_valid);
    assert!(result.years.y2.is_valid);
    assert!(!result.years.y3.is_valid);
    assert!(!result.multi_year_valid);
}

#[test]
fn corrupt_later_hr_year_keeps_year_one_salaries() {
    let scenario: ScenarioInput = serde_json::from_value(json!({
        "grades": [{ "grade": "1", "branch_count": 2, "total_students": 40 }],
        "capacity": 100,
        "hr": {
            "y1": {
                "unit_costs": { "national_teacher": 30000 },
                "headcounts": { "primary": { "national_teacher": 6 } }
            },
            "y2": "n/a"
        },
        "inflation": { "y2": 0.1 }
    }))
    .expect("scenario parses");

    let result = FeasibilityEngine::default().run_feasibility(&scenario, &NormPlan::default());

    assert_close(result.years.y1.expenses.hr_total, 180_000.0);
    assert_close(result.years.y2.expenses.hr_total, 180_000.0 * 1.1);
    assert!(result.years.y1.kpis.hr_share.is_some());
}

#[test]
fn malformed_row_in_one_year_plan_keeps_other_year_rosters() {
    let scenario: ScenarioInput = serde_json::from_value(json!({
        "grades": [{ "grade": "1", "branch_count": 1, "total_students": 10 }],
        "capacity": 100,
        "grade_plan": {
            "y2": [{ "grade": "1", "branch_count": 2, "total_students": 40 }, "junk"],
            "y3": [{ "grade": "1", "branch_count": 3, "total_students": 60 }]
        }
    }))
    .expect("scenario parses");

    let result = FeasibilityEngine::default().run_feasibility(&scenario, &NormPlan::default());

    assert_eq!(result.years.y1.students.total_students, 10.0);
    assert_eq!(result.years.y2.students.total_students, 40.0);
    assert_eq!(result.years.y3.students.total_students, 60.0);
}

#[test]
fn year_specific_norms_replace_the_base_config() {
    let mut norms = norms();
    norms.years.y2 = serde_json::from_value(json!({
        "teacher_weekly_max_hours": 0,
        "curriculum_weekly_hours": {}
    }))
    .expect("year norms parse");

    let result = FeasibilityEngine::default().run_feasibility(&scenario(), &norms);

    assert!(result.years.y1.is_valid);
    assert!(!result.years.y2.is_valid);
    assert!(result.years.y3.is_valid);
}

#[test]
fn projection_is_deterministic() {
    let engine = FeasibilityEngine::default();
    let scenario = scenario();
    let norms = norms();

    let first = render_payload(&engine.run_feasibility(&scenario, &norms)).expect("renders");
    let second = render_payload(&engine.run_feasibility(&scenario, &norms)).expect("renders");

    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn payload_flattens_year_one_and_rounds_values() {
    let result = FeasibilityEngine::default().run_feasibility(&scenario(), &norms());
    let payload = render_payload(&result).expect("renders");

    assert_eq!(payload["students"], payload["years"]["y1"]["students"]);
    assert_eq!(payload["multi_year_valid"], json!(true));
    assert_eq!(payload["inflation"]["factors"]["y3"], json!(1.16));
    assert_eq!(payload["years"]["y3"]["inflation_factor"], json!(1.16));
    assert_eq!(payload["kpis"]["utilization"], json!(0.85));
    assert_eq!(payload["kpis"]["per_student_denominator"], json!(85.0));
}

#[test]
fn minimal_roster_reports_utilization() {
    let scenario: ScenarioInput = serde_json::from_value(json!({
        "grades": [{ "grade": "1", "branch_count": 2, "total_students": 40 }],
        "capacity": 100
    }))
    .expect("scenario parses");

    let result = FeasibilityEngine::default().run_feasibility(&scenario, &NormPlan::default());
    let year = &result.years.y1;

    assert_eq!(year.students.total_students, 40.0);
    assert_eq!(year.students.utilization, Some(0.4));
    assert!(year.is_valid);
    assert!(year.kpis.profit_margin.is_none());
}

#[test]
fn full_legacy_mode_drops_other_income_unless_configured() {
    let scenario: ScenarioInput = serde_json::from_value(json!({
        "grades": [{ "grade": "3", "branch_count": 1, "total_students": 30 }],
        "capacity": 40,
        "revenue": {
            "tuition": { "per_student_fee": 1000 },
            "other_fee_per_student": 100,
            "other_institution_income": [{ "key": "grant", "amount": 2000 }],
            "government_incentives": 5000
        }
    }))
    .expect("scenario parses");

    let preserved = FeasibilityEngine::default().run_feasibility(&scenario, &NormPlan::default());
    let income = &preserved.years.y1.income;
    assert!(income.full_legacy_mode);
    assert_close(income.gross_tuition, 30_000.0);
    assert_close(income.legacy_other_fees_total, 3_000.0);
    assert_eq!(income.government_incentives, 0.0);
    assert_close(income.total_gross_income, 33_000.0);

    let counting = FeasibilityEngine::new(EngineConfig {
        legacy_mode_counts_other_income: true,
        ..EngineConfig::default()
    })
    .run_feasibility(&scenario, &NormPlan::default());
    assert_close(counting.years.y1.income.total_gross_income, 40_000.0);
}

#[test]
fn malformed_sections_surface_as_errors_without_failing() {
    let scenario: ScenarioInput = serde_json::from_value(json!({
        "grades": [{ "grade": "2", "branch_count": 1, "total_students": 10 }],
        "capacity": "25",
        "revenue": { "tuition": { "rows": "not a list" } },
        "discounts": { "sibling": 0.1 },
        "expenses": "missing"
    }))
    .expect("scenario parses");

    let result = FeasibilityEngine::default().run_feasibility(&scenario, &NormPlan::default());
    let errors: &Vec<String> = &result.years.y1.flags.errors;

    assert!(!result.years.y1.is_valid);
    assert!(errors.iter().any(|error| error.contains("tuition rows")));
    assert!(errors.iter().any(|error| error.contains("discounts")));
    assert_eq!(result.years.y1.students.capacity, 25.0);

    let payload: Value = render_payload(&result).expect("renders");
    assert_eq!(payload["is_valid"], json!(false));
}
