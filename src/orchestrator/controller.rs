//! Run lifecycle controller.
//!
//! Owns the session and start/stop/regenerate orchestration, and emits events for
//! presentation layers. At most one run is active; anything that must replace a
//! run cancels it and waits for its task to finish first.

use super::session::Session;
use crate::engine::{CancelToken, SortEngine};
use crate::model::{Algorithm, InfoEvent, RunConfig, RunResult, SortEvent, Value};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::Duration;

/// Commands emitted by UI layers to control the session.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiCommand {
    Start,
    Stop,
    Generate,
    Resize(usize),
    SetSpeed(u8),
    SelectAlgorithm(Algorithm),
    Quit,
}

/// Internal handle for a running sort task.
struct RunCtx {
    cancel: CancelToken,
    input: Vec<Value>,
    handle: Option<tokio::task::JoinHandle<RunResult>>,
}

/// Body of one run, executed on a blocking thread.
type RunFn = Arc<
    dyn Fn(RunConfig, Vec<Value>, UnboundedSender<SortEvent>, CancelToken) -> RunResult
        + Send
        + Sync,
>;

fn engine_runner() -> RunFn {
    Arc::new(
        |cfg: RunConfig, values: Vec<Value>, tx: UnboundedSender<SortEvent>, cancel: CancelToken| {
            SortEngine::new(cfg).run(values, tx, cancel)
        },
    )
}

/// Spawn a new run over the session's current array and return its control handle.
fn start_run(session: &Session, event_tx: &UnboundedSender<SortEvent>, runner: &RunFn) -> RunCtx {
    let cfg = session.run_config();
    let cancel = CancelToken::new();
    let input = session.values.clone();

    let _ = event_tx.send(SortEvent::RunStarted {
        algorithm: cfg.algorithm,
        delay: cfg.delay,
    });

    let runner = Arc::clone(runner);
    let values = input.clone();
    let token = cancel.clone();
    let tx = event_tx.clone();
    // The engine sleeps between steps, so it gets a blocking thread of its own.
    let handle = tokio::task::spawn_blocking(move || runner(cfg, values, tx, token));
    RunCtx {
        cancel,
        input,
        handle: Some(handle),
    }
}

fn send_array(session: &Session, event_tx: &UnboundedSender<SortEvent>) {
    let _ = event_tx.send(SortEvent::ArrayGenerated {
        values: session.values.clone(),
    });
    let _ = event_tx.send(SortEvent::Settings(session.settings()));
}

/// Refuse a settings change during a run and resync the control to the unchanged state.
fn deflect(session: &Session, event_tx: &UnboundedSender<SortEvent>, control: &str) {
    tracing::debug!(control, "control change refused while sorting");
    let _ = event_tx.send(SortEvent::Info(InfoEvent::ControlsLocked {
        control: control.to_string(),
    }));
    let _ = event_tx.send(SortEvent::Settings(session.settings()));
}

/// Orchestrate runs based on UI commands and emit events back to presentation layers.
pub(crate) async fn run_controller(
    session: Session,
    start_on_launch: bool,
    event_tx: UnboundedSender<SortEvent>,
    cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    run_controller_with(session, start_on_launch, event_tx, cmd_rx, engine_runner()).await
}

async fn run_controller_with(
    mut session: Session,
    start_on_launch: bool,
    event_tx: UnboundedSender<SortEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
    runner: RunFn,
) -> Result<()> {
    send_array(&session, &event_tx);

    let mut run_ctx = if start_on_launch {
        Some(start_run(&session, &event_tx, &runner))
    } else {
        None
    };
    let mut regenerate_pending = false;
    let mut quit_pending = false;
    // Cancel watchdog: a long pause can delay the stop; keep the UI informed.
    let mut cancel_deadline: Option<tokio::time::Instant> = None;
    let mut watchdog = tokio::time::interval(Duration::from_millis(250));

    let res = loop {
        tokio::select! {
            cmd = cmd_rx.recv(), if !quit_pending => {
                match cmd {
                    Some(UiCommand::Start) => {
                        if run_ctx.is_some() {
                            tracing::debug!("start ignored, a run is active");
                            let _ = event_tx.send(SortEvent::Info(InfoEvent::AlreadyRunning));
                        } else {
                            run_ctx = Some(start_run(&session, &event_tx, &runner));
                        }
                    }
                    Some(UiCommand::Stop) => {
                        if let Some(ctx) = &run_ctx {
                            tracing::info!("stop requested");
                            ctx.cancel.cancel();
                            let _ = event_tx.send(SortEvent::Info(InfoEvent::Stopping));
                            cancel_deadline = Some(tokio::time::Instant::now() + Duration::from_secs(1));
                        } else {
                            let _ = event_tx.send(SortEvent::Info(InfoEvent::NotRunning));
                        }
                    }
                    Some(UiCommand::Generate) => {
                        // Regenerate is serialized: cancel the active run first, then
                        // regenerate once we observe its completion.
                        if let Some(ctx) = &run_ctx {
                            tracing::info!("new array requested during run, cancelling");
                            ctx.cancel.cancel();
                            regenerate_pending = true;
                            let _ = event_tx.send(SortEvent::Info(InfoEvent::Stopping));
                            cancel_deadline = Some(tokio::time::Instant::now() + Duration::from_secs(1));
                        } else {
                            session.regenerate();
                            send_array(&session, &event_tx);
                        }
                    }
                    Some(UiCommand::Resize(size)) => {
                        if run_ctx.is_some() {
                            deflect(&session, &event_tx, "size");
                        } else {
                            session.resize(size);
                            tracing::debug!(size = session.size, "array resized");
                            send_array(&session, &event_tx);
                        }
                    }
                    Some(UiCommand::SetSpeed(speed)) => {
                        if run_ctx.is_some() {
                            deflect(&session, &event_tx, "speed");
                        } else {
                            session.set_speed(speed);
                            let _ = event_tx.send(SortEvent::Settings(session.settings()));
                        }
                    }
                    Some(UiCommand::SelectAlgorithm(algorithm)) => {
                        if run_ctx.is_some() {
                            deflect(&session, &event_tx, "algorithm");
                        } else {
                            session.algorithm = algorithm;
                            let _ = event_tx.send(SortEvent::Settings(session.settings()));
                        }
                    }
                    Some(UiCommand::Quit) | None => {
                        // Quit waits for the current run to finish so nothing outlives the controller.
                        quit_pending = true;
                        if let Some(ctx) = &run_ctx {
                            ctx.cancel.cancel();
                        } else {
                            break Ok(());
                        }
                    }
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it can be dropped
            // if another select branch is chosen, and we'll never observe completion.
            maybe_done = async {
                if let Some(ctx) = &mut run_ctx {
                    if let Some(h) = ctx.handle.as_mut() {
                        return Some(h.await);
                    }
                }
                futures::future::pending().await
            } => {
                if let Some(join_res) = maybe_done {
                    let input = run_ctx.take().map(|ctx| ctx.input).unwrap_or_default();
                    match join_res {
                        Ok(result) => {
                            session.values = result.values.clone();
                            let _ = event_tx.send(SortEvent::RunFinished { result: Box::new(result) });
                        }
                        Err(e) => {
                            // Unexpected failure: fall back to the array the run started from.
                            tracing::error!(error = %e, "sort task failed");
                            session.values = input;
                            let _ = event_tx.send(SortEvent::RunFailed {
                                values: session.values.clone(),
                                message: format!("Run failed: {e}"),
                            });
                        }
                    }
                    cancel_deadline = None;
                    if quit_pending {
                        break Ok(());
                    }
                    if regenerate_pending {
                        regenerate_pending = false;
                        session.regenerate();
                        send_array(&session, &event_tx);
                    }
                }
            }
            _ = watchdog.tick() => {
                if let Some(deadline) = cancel_deadline {
                    if tokio::time::Instant::now() >= deadline && run_ctx.is_some() {
                        let _ = event_tx.send(SortEvent::Info(InfoEvent::Message(
                            "Still stopping…".into(),
                        )));
                        cancel_deadline = None;
                    }
                }
            }
        }
    };

    res
}
