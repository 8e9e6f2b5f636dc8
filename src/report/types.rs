use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::runner::state::{RunReport, RunSummary, StepResult};

/// Serialized form of one run, written to `results.json` and consumed by
/// the `report` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResults {
    pub base_url: String,
    pub steps: Vec<StepResult>,
    pub summary: RunSummary,
    pub generated_at: String,
}

impl RunResults {
    pub fn from_report(report: &RunReport, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            steps: report.results.clone(),
            summary: report.summary(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}
