mod kpis;
mod payload;
pub mod views;

pub use payload::render_payload;
pub use views::{
    FeasibilityResult, Flags, IncomeSummary, InflationRates, InflationSummary, KpiSummary,
    NetResult, StudentSummary, YearResult,
};

pub(crate) use kpis::{derive_kpis, kpi_warnings, KpiInputs};
