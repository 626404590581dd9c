//! Blended tuition discount rate with a hard cap at gross tuition.
//!
//! Each category contributes an effective rate part:
//!
//! | Mode    | Effective rate part          | Amount                            |
//! |---------|------------------------------|-----------------------------------|
//! | percent | `ratio * clamp(value, 0, 1)` | `gross_tuition * part`            |
//! | fixed   | `ratio * value / avg_fee`    | `tuition_students * ratio * value`|
//!
//! The parts are summed into an average rate that is clamped to `[0, 1]`
//! before it is applied, so discounts never exceed gross tuition.

use super::domain::DiscountMode;
use super::input::DiscountInput;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountLine {
    pub name: String,
    pub mode: DiscountMode,
    pub value: f64,
    pub ratio: f64,
    pub effective_rate_part: f64,
    pub amount: f64,
}

/// Present only when the summed rate had to be capped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscountCap {
    pub original_avg_rate: f64,
    pub capped_avg_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscountSummary {
    pub categories: Vec<DiscountLine>,
    pub avg_discount_rate: f64,
    pub capped_avg_rate: f64,
    pub total_discounts: f64,
    pub cap_applied: Option<DiscountCap>,
    #[serde(skip)]
    pub warnings: Vec<String>,
}

/// Tuition figures the discount categories are applied against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuitionBase {
    pub tuition_students: f64,
    pub gross_tuition: f64,
    pub tuition_avg_fee: f64,
}

fn category_label(category: &DiscountInput, index: usize) -> String {
    if category.name.is_empty() {
        format!("discount #{}", index + 1)
    } else {
        category.name.clone()
    }
}

fn parse_category(category: &DiscountInput, index: usize) -> Result<DiscountLine, String> {
    let name = category_label(category, index);

    let Some(mode) = DiscountMode::parse(&category.mode) else {
        return Err(format!(
            "discount '{name}' dropped: unknown mode '{}'",
            category.mode
        ));
    };
    let value = match category.value {
        Some(value) if value >= 0.0 => value,
        _ => return Err(format!("discount '{name}' dropped: value must be zero or more")),
    };
    let Some(ratio) = category.ratio else {
        return Err(format!("discount '{name}' dropped: ratio is not a number"));
    };

    Ok(DiscountLine {
        name,
        mode,
        value,
        ratio: ratio.clamp(0.0, 1.0),
        effective_rate_part: 0.0,
        amount: 0.0,
    })
}

pub fn calculate_discounts(base: TuitionBase, categories: &[DiscountInput]) -> DiscountSummary {
    let mut warnings = Vec::new();
    let mut lines = Vec::with_capacity(categories.len());

    for (index, category) in categories.iter().enumerate() {
        let mut line = match parse_category(category, index) {
            Ok(line) => line,
            Err(warning) => {
                warnings.push(warning);
                continue;
            }
        };

        match line.mode {
            DiscountMode::Fixed => {
                line.effective_rate_part = if base.tuition_avg_fee > 0.0 {
                    (line.ratio * line.value) / base.tuition_avg_fee
                } else {
                    0.0
                };
                line.amount = base.tuition_students * line.ratio * line.value;
            }
            DiscountMode::Percent => {
                line.effective_rate_part = line.ratio * line.value.clamp(0.0, 1.0);
                line.amount = base.gross_tuition * line.effective_rate_part;
            }
        }
        lines.push(line);
    }

    let avg_discount_rate: f64 = lines.iter().map(|line| line.effective_rate_part).sum();
    let capped_avg_rate = avg_discount_rate.clamp(0.0, 1.0);
    let total_discounts = (base.gross_tuition * capped_avg_rate).min(base.gross_tuition);
    let cap_applied = (avg_discount_rate > 1.0).then_some(DiscountCap {
        original_avg_rate: avg_discount_rate,
        capped_avg_rate,
    });

    DiscountSummary {
        categories: lines,
        avg_discount_rate,
        capped_avg_rate,
        total_discounts,
        cap_applied,
        warnings,
    }
}
