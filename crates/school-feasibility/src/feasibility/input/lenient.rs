//! Field deserializers that fall back to defaults instead of rejecting the
//! whole scenario when a leaf has the wrong type.

use crate::feasibility::domain::YearMap;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|value| value.is_finite())
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(raw) => raw.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value).unwrap_or(0.0))
}

pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value))
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_text(&value))
}

pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn rows_from<T: DeserializeOwned>(value: &Value) -> Option<Vec<T>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
        ),
        _ => None,
    }
}

/// Keeps the entries of an array that parse; anything else is an empty list.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(rows_from(&value).unwrap_or_default())
}

/// Reads `y1`/`y2`/`y3` independently so a malformed year only loses itself.
fn year_map<T>(value: &Value, parse: impl Fn(&Value) -> Option<T>) -> YearMap<Option<T>> {
    YearMap::from_fn(|year| {
        value
            .get(year.key())
            .filter(|entry| !entry.is_null())
            .and_then(&parse)
    })
}

pub(crate) fn per_year<'de, D, T>(deserializer: D) -> Result<YearMap<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(year_map(&value, |entry| serde_json::from_value(entry.clone()).ok()))
}

/// Per-year rows, filtered row by row like [`list`].
pub(crate) fn per_year_rows<'de, D, T>(deserializer: D) -> Result<YearMap<Option<Vec<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(year_map(&value, rows_from::<T>))
}

pub(crate) fn per_year_numbers<'de, D>(deserializer: D) -> Result<YearMap<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(year_map(&value, as_number))
}

/// Named amounts; entries that are not numeric read as zero.
pub(crate) fn amounts<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amounts_from(&value))
}

fn amounts_from(value: &Value) -> BTreeMap<String, f64> {
    match value {
        Value::Object(entries) => entries
            .iter()
            .map(|(key, amount)| (key.clone(), as_number(amount).unwrap_or(0.0)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

/// Two-level amount grid, e.g. level -> role -> headcount.
pub(crate) fn amount_grid<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, BTreeMap<String, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(rows) => rows
            .iter()
            .map(|(key, row)| (key.clone(), amounts_from(row)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// Named entries of a structured type; entries that fail to parse are dropped.
pub(crate) fn entries<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(items) => items
            .into_iter()
            .filter_map(|(key, item)| serde_json::from_value(item).ok().map(|item| (key, item)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// Input field whose structural validity is reported rather than defaulted.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<T> {
    Absent,
    Valid(T),
    Invalid,
}

impl<T> Default for Shape<T> {
    fn default() -> Self {
        Shape::Absent
    }
}

impl<T> Shape<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Shape::Absent)
    }
}

impl<'de, T> Deserialize<'de> for Shape<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Shape::Absent);
        }

        Ok(serde_json::from_value(value)
            .map(Shape::Valid)
            .unwrap_or(Shape::Invalid))
    }
}
