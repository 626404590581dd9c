use super::input::{NormPlan, ScenarioInput};
use serde::de::DeserializeOwned;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin} is not valid JSON: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ScenarioLoadError {
    pub fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            origin: origin.into(),
            source,
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ScenarioLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ScenarioLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw)
        .map_err(|source| ScenarioLoadError::json(path.display().to_string(), source))
}

/// Reads a scenario document. Only malformed JSON fails; unexpected shapes
/// inside a well-formed document fall back to defaults.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioInput, ScenarioLoadError> {
    read_json(path.as_ref())
}

pub fn load_norms<P: AsRef<Path>>(path: P) -> Result<NormPlan, ScenarioLoadError> {
    read_json(path.as_ref())
}
