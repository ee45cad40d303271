mod bubble;
pub mod driver;
mod insertion;
mod merge;
mod quick;
mod selection;
pub mod tracer;

use crate::model::{Algorithm, RunConfig, RunOutcome, RunResult, RunStats, SortEvent, Step, Value};
use driver::AnimationDriver;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Instant;
use tokio::sync::mpsc;
use tracer::Tracer;

/// Raised at a checkpoint once the run's token has been cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("run cancelled")]
pub struct Cancelled;

/// Cooperative cancellation flag shared between a run and whoever may stop it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receives every visualization event together with the array as it is at that moment.
pub trait StepSink<T> {
    fn frame(&mut self, values: &[T], step: &Step);
}

/// Outcome and counters of one algorithm execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    pub outcome: RunOutcome,
    pub stats: RunStats,
}

/// Run `algorithm` over `values` in place, reporting each step to `sink`.
pub fn execute<T: Ord + Copy>(
    algorithm: Algorithm,
    values: &mut [T],
    sink: &mut dyn StepSink<T>,
    cancel: &CancelToken,
) -> Execution {
    let mut tracer = Tracer::new(values, sink, cancel);
    let res = match algorithm {
        Algorithm::Bubble => bubble::sort(&mut tracer),
        Algorithm::Selection => selection::sort(&mut tracer),
        Algorithm::Insertion => insertion::sort(&mut tracer),
        Algorithm::Merge => merge::sort(&mut tracer),
        Algorithm::Quick => quick::sort(&mut tracer),
    };
    let outcome = match res {
        Ok(()) => RunOutcome::Completed,
        Err(Cancelled) => RunOutcome::Cancelled,
    };
    Execution {
        outcome,
        stats: tracer.stats(),
    }
}

/// Current time as RFC 3339, for `RunResult::timestamp_utc`.
pub fn timestamp_utc() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into())
}

pub struct SortEngine {
    cfg: RunConfig,
}

impl SortEngine {
    pub fn new(cfg: RunConfig) -> Self {
        Self { cfg }
    }

    /// Execute one run to completion or cancellation. Blocks for the whole animation.
    pub fn run(
        self,
        mut values: Vec<Value>,
        event_tx: mpsc::UnboundedSender<SortEvent>,
        cancel: CancelToken,
    ) -> RunResult {
        let timestamp_utc = timestamp_utc();
        let input = values.clone();
        let started = Instant::now();

        let span = tracing::info_span!("run", algorithm = ?self.cfg.algorithm, len = values.len());
        let _guard = span.enter();
        tracing::info!(delay = ?self.cfg.delay, "run started");

        let mut driver = AnimationDriver::new(event_tx, self.cfg.delay);
        let exec = execute(self.cfg.algorithm, &mut values, &mut driver, &cancel);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match exec.outcome {
            RunOutcome::Completed => tracing::info!(
                comparisons = exec.stats.comparisons,
                writes = exec.stats.writes,
                elapsed_ms,
                "run completed"
            ),
            outcome => tracing::info!(?outcome, events = exec.stats.events, "run ended early"),
        }

        RunResult {
            timestamp_utc,
            algorithm: self.cfg.algorithm,
            outcome: exec.outcome,
            input,
            values,
            stats: exec.stats,
            delay: self.cfg.delay,
            elapsed_ms,
        }
    }
}
