use crate::report::report_model::SuiteReport;
use crate::scenario::model::ScenarioAssertion;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

/// Format a suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Scenarios: login.yaml ===
///
/// ✓ PASS  password only form (6 steps, 4 assertions)
/// ✗ FAIL  burst of mutations (8 steps, 3 assertions)
///     [FAIL] Step 5: ObservedCount — Observed 3 inputs but expected 2
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Scenarios: {} ===\n\n", report.suite_name));

    for result in &report.scenario_results {
        let assertion_count = result.assertion_results.len();
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} assertions)\n",
            marker, result.scenario_name, result.steps_run, assertion_count
        ));

        // Show error if the scenario aborted
        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        // Show failed assertions
        if !result.passed {
            for ar in &result.assertion_results {
                if !ar.passed {
                    let assertion_name = format_assertion_type(&ar.spec);
                    let detail = ar.message.as_deref().unwrap_or("assertion failed");
                    out.push_str(&format!(
                        "    [FAIL] Step {}: {} — {}\n",
                        ar.step_index, assertion_name, detail
                    ));
                }
            }
        }
    }

    // Summary line
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total) ===\n",
        report.passed, report.failed, report.total
    ));

    out
}

/// Format a ScenarioAssertion variant name for display.
fn format_assertion_type(spec: &ScenarioAssertion) -> &'static str {
    match spec {
        ScenarioAssertion::ObservedCount { .. } => "ObservedCount",
        ScenarioAssertion::SurfaceCount { .. } => "SurfaceCount",
        ScenarioAssertion::InputObserved { .. } => "InputObserved",
        ScenarioAssertion::OverlayState { .. } => "OverlayState",
        ScenarioAssertion::SurfaceSrcContains { .. } => "SurfaceSrcContains",
        ScenarioAssertion::ValueEquals { .. } => "ValueEquals",
        ScenarioAssertion::FillResult { .. } => "FillResult",
    }
}
