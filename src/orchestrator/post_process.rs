//! Post-run processing.
//!
//! Checks a finished run and turns it into a status line for presentation layers.

use crate::model::{RunOutcome, RunResult, Value};

/// Result of post-run processing, ready for presentation layers.
pub(crate) struct ProcessedRun {
    pub message: String,
    /// Whether the array should be drawn in its final "all sorted" state.
    pub finished: bool,
}

fn is_sorted(values: &[Value]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

fn is_permutation(a: &[Value], b: &[Value]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

/// Validate the run's output and build its status message.
pub(crate) fn process_run_completion(run: &RunResult) -> ProcessedRun {
    if !is_permutation(&run.input, &run.values) {
        tracing::warn!(algorithm = ?run.algorithm, "run output is not a permutation of its input");
    }
    match run.outcome {
        RunOutcome::Completed => {
            if !is_sorted(&run.values) {
                tracing::warn!(algorithm = ?run.algorithm, "completed run left the array unsorted");
            }
            ProcessedRun {
                message: format!(
                    "{} finished: {} comparisons, {} writes in {:.1}s",
                    run.algorithm,
                    run.stats.comparisons,
                    run.stats.writes,
                    run.elapsed_ms as f64 / 1000.0
                ),
                finished: true,
            }
        }
        RunOutcome::Cancelled => ProcessedRun {
            message: format!(
                "{} stopped after {} steps",
                run.algorithm, run.stats.events
            ),
            finished: false,
        },
        RunOutcome::Failed => ProcessedRun {
            message: format!("{} failed; array restored", run.algorithm),
            finished: false,
        },
    }
}
