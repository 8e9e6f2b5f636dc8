use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::client::ResponseBody;
use crate::error::StepError;

/// Whether a step's failure invalidates downstream preconditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    /// Failure aborts the run; no later step is attempted
    Critical,
    /// Failure is recorded but the run continues
    Advisory,
}

/// Outcome of one step invocation. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub name: String,
    pub success: bool,
    /// None when the call never completed (transport error)
    pub status: Option<u16>,
    pub expected_status: u16,
    pub criticality: Criticality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ResponseBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl StepResult {
    pub fn passed(
        name: &str,
        status: u16,
        expected: u16,
        body: ResponseBody,
        duration_ms: u64,
    ) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            status: Some(status),
            expected_status: expected,
            criticality: Criticality::Advisory,
            body: Some(body),
            error: None,
            duration_ms,
        }
    }

    pub fn failed(name: &str, expected: u16, err: StepError, duration_ms: u64) -> Self {
        let (status, body) = match &err {
            StepError::UnexpectedStatus { actual, body, .. } => (Some(*actual), Some(body.clone())),
            StepError::MissingField { .. } => (Some(expected), None),
            StepError::Transport(_) => (None, None),
        };
        Self {
            name: name.to_string(),
            success: false,
            status,
            expected_status: expected,
            criticality: Criticality::Advisory,
            body,
            error: Some(err.to_string()),
            duration_ms,
        }
    }

    pub fn with_criticality(mut self, criticality: Criticality) -> Self {
        self.criticality = criticality;
        self
    }
}

/// Run lifecycle: `NotStarted -> Running -> (Aborted | Completed)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    NotStarted,
    Running,
    /// A critical step failed; already-recorded results stand
    Aborted,
    /// All planned steps executed (advisory failures allowed)
    Completed,
}

/// Aggregate of all step outcomes for one run. Created at run start,
/// finalized at run end, mutated only by the orchestrator.
#[derive(Debug)]
pub struct RunReport {
    pub status: RunStatus,
    pub results: Vec<StepResult>,
    started_at: Option<Instant>,
    total_duration_ms: Option<u64>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            status: RunStatus::NotStarted,
            results: Vec::new(),
            started_at: None,
            total_duration_ms: None,
        }
    }

    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Instant::now());
    }

    pub fn record(&mut self, result: StepResult) {
        debug_assert_eq!(self.status, RunStatus::Running);
        self.results.push(result);
    }

    pub fn abort(&mut self) {
        self.finish(RunStatus::Aborted);
    }

    pub fn complete(&mut self) {
        self.finish(RunStatus::Completed);
    }

    fn finish(&mut self, status: RunStatus) {
        self.status = status;
        if let Some(start) = self.started_at {
            self.total_duration_ms = Some(start.elapsed().as_millis() as u64);
        }
    }

    pub fn total_run(&self) -> usize {
        self.results.len()
    }

    pub fn total_passed(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Overall exit indicator: every executed step passed and the run was
    /// not aborted.
    pub fn all_passed(&self) -> bool {
        self.status == RunStatus::Completed && self.total_passed() == self.total_run()
    }

    pub fn summary(&self) -> RunSummary {
        let total_run = self.total_run() as u32;
        let total_passed = self.total_passed() as u32;
        let pass_rate = if total_run == 0 {
            0.0
        } else {
            f64::from(total_passed) / f64::from(total_run) * 100.0
        };
        RunSummary {
            status: self.status,
            total_run,
            total_passed,
            pass_rate,
            total_duration_ms: self.total_duration_ms,
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub status: RunStatus,
    pub total_run: u32,
    pub total_passed: u32,
    pub pass_rate: f64,
    pub total_duration_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(name: &str) -> StepResult {
        StepResult::passed(name, 200, 200, ResponseBody::Empty, 5)
    }

    fn fail(name: &str) -> StepResult {
        StepResult::failed(
            name,
            200,
            StepError::UnexpectedStatus {
                expected: 200,
                actual: 500,
                body: ResponseBody::Text("Server error".to_string()),
            },
            5,
        )
    }

    #[test]
    fn tallies_match_recorded_results() {
        let mut report = RunReport::new();
        report.start();
        report.record(pass("Register User"));
        report.record(fail("Login"));
        report.record(pass("Get Current User"));
        report.complete();

        assert_eq!(report.total_run(), report.results.len());
        assert_eq!(report.total_passed(), 2);
        let summary = report.summary();
        assert_eq!(summary.total_run, 3);
        assert_eq!(summary.total_passed, 2);
        assert!(!report.all_passed());
    }

    #[test]
    fn aborted_run_never_counts_as_passed() {
        let mut report = RunReport::new();
        report.start();
        report.record(pass("Register User"));
        report.abort();

        assert_eq!(report.status, RunStatus::Aborted);
        assert_eq!(report.total_passed(), report.total_run());
        assert!(!report.all_passed());
    }

    #[test]
    fn failed_result_keeps_expected_and_actual() {
        let result = fail("Login");
        assert_eq!(result.expected_status, 200);
        assert_eq!(result.status, Some(500));
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .contains("expected status 200"));
    }

    #[test]
    fn transport_failure_has_no_status() {
        let result = StepResult::failed(
            "Login",
            200,
            StepError::Transport("connection refused".to_string()),
            5,
        );
        assert_eq!(result.status, None);
        assert!(!result.success);
    }
}
