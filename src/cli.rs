use crate::engine::{CancelToken, SortEngine};
use crate::model::{Algorithm, RunOutcome, RunResult, RunStats, SortEvent, Value};
use crate::orchestrator::session::{Session, DEFAULT_SIZE};
use crate::render;
use crate::speed::{DelayMapping, DEFAULT_SPEED};
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "sortviz",
    version,
    about = "Step-by-step sorting algorithm visualizer with optional TUI"
)]
pub struct Cli {
    /// Sorting algorithm to animate
    #[arg(long, value_enum, default_value_t = Algorithm::Bubble)]
    pub algorithm: Algorithm,

    /// Animation speed, 1 (slowest) to 100 (fastest)
    #[arg(long, default_value_t = DEFAULT_SPEED, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub speed: u8,

    /// Number of elements in generated arrays (5-100)
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// Pause at the highest speed
    #[arg(long, default_value = "5ms")]
    pub min_delay: humantime::Duration,

    /// Pause at the lowest speed
    #[arg(long, default_value = "500ms")]
    pub max_delay: humantime::Duration,

    /// Sort these comma-separated values instead of a random array
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub values: Option<Vec<Value>>,

    /// Seed for random array generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the run result as JSON and exit (no TUI)
    #[arg(long, conflicts_with = "text")]
    pub json: bool,

    /// Print every step as text and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Start sorting as soon as the TUI opens
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub start_on_launch: bool,

    /// Log file for the TUI (text and JSON modes log to stderr)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        !self.json && !self.text && cfg!(feature = "tui")
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args).await;
        }
    }

    if args.json {
        return run_json(args).await;
    }

    run_text(args).await
}

/// Build the initial session from CLI arguments.
pub(crate) fn build_session(args: &Cli) -> Session {
    let mapping = DelayMapping::new(
        Duration::from(args.min_delay),
        Duration::from(args.max_delay),
    );
    let session = Session::new(args.algorithm, args.speed, args.size, mapping, args.seed);
    match args.values.clone() {
        Some(values) => session.with_values(values),
        None => session,
    }
}

/// Spawn a one-shot run that Ctrl-C can cancel.
fn spawn_run(
    session: &Session,
    evt_tx: mpsc::UnboundedSender<SortEvent>,
) -> tokio::task::JoinHandle<RunResult> {
    let cancel = CancelToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling run");
            token.cancel();
        }
    });

    let engine = SortEngine::new(session.run_config());
    let values = session.values.clone();
    tokio::task::spawn_blocking(move || engine.run(values, evt_tx, cancel))
}

/// Wait for a one-shot run. A dead worker becomes a `Failed` result over the untouched input.
async fn finish_run(handle: tokio::task::JoinHandle<RunResult>, session: &Session) -> RunResult {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "sort task failed");
            let cfg = session.run_config();
            RunResult {
                timestamp_utc: crate::engine::timestamp_utc(),
                algorithm: cfg.algorithm,
                outcome: RunOutcome::Failed,
                input: session.values.clone(),
                values: session.values.clone(),
                stats: RunStats::default(),
                delay: cfg.delay,
                elapsed_ms: 0,
            }
        }
    }
}

async fn run_json(args: Cli) -> Result<()> {
    let session = build_session(&args);
    let (out_tx, out_handle) = spawn_output_writer();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<SortEvent>();

    let handle = spawn_run(&session, evt_tx);
    // Frames are not part of JSON output; drain them so the channel stays small.
    while evt_rx.recv().await.is_some() {}
    let result = finish_run(handle, &session).await;

    let out = serde_json::to_string_pretty(&result)?;
    let _ = out_tx.send(OutputLine::Stdout(out));
    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

async fn run_text(args: Cli) -> Result<()> {
    let session = build_session(&args);
    let (out_tx, out_handle) = spawn_output_writer();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<SortEvent>();

    let _ = out_tx.send(OutputLine::Stderr(format!(
        "== {} on {} values, {} per step ==",
        session.algorithm,
        session.values.len(),
        humantime::format_duration(session.delay())
    )));
    let handle = spawn_run(&session, evt_tx);

    let mut n = 0u64;
    while let Some(ev) = evt_rx.recv().await {
        if let SortEvent::Frame { values, step } = ev {
            n += 1;
            let cells = render::cells(&values, Some(&step), false);
            let _ = out_tx.send(OutputLine::Stdout(format!(
                "{n:>5}  {:<24}  {}",
                step.describe(),
                render::plain_line(&cells)
            )));
        }
    }

    let result = finish_run(handle, &session).await;
    let summary = crate::text_summary::build_text_summary(&result);
    for line in summary.lines {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }
    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_are_parsed() {
        let args = Cli::try_parse_from(["sortviz", "--text", "--values", "5,-3,8,1"]).unwrap();
        assert_eq!(args.values, Some(vec![5, -3, 8, 1]));
        let session = build_session(&args);
        assert_eq!(session.values, vec![5, -3, 8, 1]);
        assert!(!args.is_interactive());
    }

    #[test]
    fn speed_outside_range_is_rejected() {
        assert!(Cli::try_parse_from(["sortviz", "--speed", "0"]).is_err());
        assert!(Cli::try_parse_from(["sortviz", "--speed", "101"]).is_err());
    }

    #[test]
    fn json_and_text_conflict() {
        assert!(Cli::try_parse_from(["sortviz", "--json", "--text"]).is_err());
    }

    #[tokio::test]
    async fn dead_worker_becomes_failed_result_over_input() {
        let args = Cli::try_parse_from(["sortviz", "--json", "--values", "3,1,2"]).unwrap();
        let session = build_session(&args);
        let handle = tokio::task::spawn_blocking(|| -> RunResult { panic!("worker died") });
        let result = finish_run(handle, &session).await;
        assert_eq!(result.outcome, RunOutcome::Failed);
        assert_eq!(result.input, vec![3, 1, 2]);
        assert_eq!(result.values, vec![3, 1, 2]);
        assert_eq!(result.stats, RunStats::default());
    }

    #[test]
    fn delay_bounds_feed_the_mapping() {
        let args = Cli::try_parse_from([
            "sortviz",
            "--json",
            "--min-delay",
            "0ms",
            "--max-delay",
            "1s",
            "--speed",
            "100",
            "--algorithm",
            "quick",
        ])
        .unwrap();
        let session = build_session(&args);
        assert_eq!(session.delay(), Duration::ZERO);
        assert_eq!(session.algorithm, Algorithm::Quick);
        assert_eq!(session.values.len(), DEFAULT_SIZE);
    }
}
