//! Three-year school feasibility projection.
//!
//! [`FeasibilityEngine::run_feasibility`] derives each projection year from a
//! base [`ScenarioInput`], runs the per-year pipeline (norm, income,
//! discounts, expenses, KPIs) and returns an unrounded [`FeasibilityResult`].
//! [`render_payload`] turns that result into the rounded response document.

pub mod config;
mod derive;
pub mod discount;
pub mod domain;
mod engine;
pub mod expenses;
pub mod grades;
pub mod income;
pub mod input;
mod loader;
pub mod norm;
pub mod report;
mod roster;
pub mod salary;

pub use config::{CohortBand, CohortBands, EngineConfig};
pub use derive::YearDeriver;
pub use domain::{ProjectionYear, YearMap};
pub use engine::FeasibilityEngine;
pub use input::{GradeRow, NormConfig, NormPlan, ScenarioInput, YearInput};
pub use loader::{load_norms, load_scenario, ScenarioLoadError};
pub use report::{render_payload, FeasibilityResult, YearResult};
pub use roster::{RosterImportError, RosterImporter};
