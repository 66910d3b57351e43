use serde::Serialize;

use crate::scenario::model::ScenarioResult;

// ============================================================================
// Suite report — aggregates multiple ScenarioResult instances
// ============================================================================

/// Aggregated report for a batch of scenario runs.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Name of the batch (usually the scenario file or directory)
    pub suite_name: String,

    /// Total number of scenarios
    pub total: usize,

    /// Number of passing scenarios
    pub passed: usize,

    /// Number of failing scenarios
    pub failed: usize,

    /// Individual scenario results
    pub scenario_results: Vec<ScenarioResult>,
}

impl SuiteReport {
    /// Build a report from a list of scenario results, computing the
    /// counts.
    pub fn from_results(suite_name: &str, results: Vec<ScenarioResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        Self {
            suite_name: suite_name.to_string(),
            total,
            passed,
            failed,
            scenario_results: results,
        }
    }

    /// Whether every scenario in the batch passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
