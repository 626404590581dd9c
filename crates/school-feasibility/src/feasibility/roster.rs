use super::input::GradeRow;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read grade roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid grade roster CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Loads a grade roster from CSV with `grade,branch_count,total_students`
/// headers. Blank counts read as 0; rows without a grade are skipped.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<GradeRow>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<GradeRow>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = Vec::new();

        for record in csv_reader.deserialize::<RosterCsvRow>() {
            let row = record?;
            if row.grade.is_empty() {
                continue;
            }
            rows.push(GradeRow::new(&row.grade, row.branch_count, row.total_students));
        }

        Ok(rows)
    }
}

#[derive(Debug, Deserialize)]
struct RosterCsvRow {
    grade: String,
    #[serde(default, deserialize_with = "blank_as_zero")]
    branch_count: f64,
    #[serde(default, deserialize_with = "blank_as_zero")]
    total_students: f64,
}

fn blank_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
