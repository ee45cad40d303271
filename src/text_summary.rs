//! Text summary builder for CLI output.
//!
//! This module formats human-readable lines for text mode.

use crate::model::{RunOutcome, RunResult, Value};
use crate::orchestrator;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn join(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a text summary from a finished run.
pub(crate) fn build_text_summary(result: &RunResult) -> TextSummary {
    let processed = orchestrator::process_run_completion(result);
    let outcome = match result.outcome {
        RunOutcome::Completed => "completed",
        RunOutcome::Cancelled => "cancelled",
        RunOutcome::Failed => "failed",
    };

    let mut lines = vec![
        format!("Algorithm: {}", result.algorithm),
        format!("Outcome:   {outcome}"),
        format!("Input:     {}", join(&result.input)),
        format!("Output:    {}", join(&result.values)),
        format!(
            "Steps: {}  comparisons: {}  writes: {}",
            result.stats.events, result.stats.comparisons, result.stats.writes
        ),
        format!(
            "Pause: {}  elapsed: {} ms",
            humantime::format_duration(result.delay),
            result.elapsed_ms
        ),
    ];
    lines.push(processed.message);

    TextSummary { lines }
}
