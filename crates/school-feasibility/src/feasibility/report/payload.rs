use super::views::FeasibilityResult;
use serde_json::{Map, Number, Value};

const DECIMAL_PLACES: i32 = 2;

/// Response shape for callers: year-1 fields at the root next to `years`,
/// `inflation` and `multi_year_valid`, with every float rounded to two
/// decimals and non-finite values written as `null`.
pub fn render_payload(result: &FeasibilityResult) -> Result<Value, serde_json::Error> {
    let mut root = match serde_json::to_value(&result.years.y1)? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    root.insert("years".to_string(), serde_json::to_value(&result.years)?);
    root.insert("inflation".to_string(), serde_json::to_value(&result.inflation)?);
    root.insert(
        "multi_year_valid".to_string(),
        Value::Bool(result.multi_year_valid),
    );

    let mut payload = Value::Object(root);
    round_floats(&mut payload);
    Ok(payload)
}

fn round_floats(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(round_floats),
        Value::Object(fields) => fields.values_mut().for_each(round_floats),
        Value::Number(number) if number.is_f64() => {
            *value = number
                .as_f64()
                .map(round_to_places)
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number);
        }
        _ => {}
    }
}

fn round_to_places(raw: f64) -> f64 {
    let scale = 10f64.powi(DECIMAL_PLACES);
    let rounded = (raw * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_floats_are_rounded() {
        let mut value = json!({
            "rate": 0.123456,
            "rows": [{"amount": 10.005}, {"amount": 2.0}],
            "count": 7,
            "label": "kept",
        });
        round_floats(&mut value);

        assert_eq!(value["rate"], json!(0.12));
        assert_eq!(value["rows"][1]["amount"], json!(2.0));
        assert_eq!(value["count"], json!(7));
        assert_eq!(value["label"], json!("kept"));
    }

    #[test]
    fn negative_zero_is_normalized() {
        assert_eq!(round_to_places(-0.001).to_string(), "0");
        assert_eq!(round_to_places(-1.236), -1.24);
    }
}
