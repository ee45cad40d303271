use crate::model::{Algorithm, InfoEvent, RunResult, Settings, SortEvent, Step, Value};
use crate::orchestrator;
use crate::orchestrator::session::DEFAULT_SIZE;
use crate::render::Transition;
use crate::speed::DEFAULT_SPEED;
use std::time::{Duration, Instant};

/// What the status panel reports about the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Sorting,
    Stopping,
    Sorted,
}

impl RunState {
    pub fn label(self) -> &'static str {
        match self {
            RunState::Idle => "Idle",
            RunState::Sorting => "Sorting",
            RunState::Stopping => "Stopping",
            RunState::Sorted => "Sorted",
        }
    }
}

pub struct UiState {
    pub tab: usize,
    pub run_state: RunState,
    pub info: String,
    // Mirrors the controller; only updated from `Settings` events.
    pub settings: Settings,

    pub values: Vec<Value>,
    pub step: Option<Step>,
    pub transition: Transition,
    pub frames: u64,
    pub run_start: Option<Instant>,
    pub last_result: Option<RunResult>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            run_state: RunState::Idle,
            info: String::new(),
            settings: Settings {
                algorithm: Algorithm::Bubble,
                speed: DEFAULT_SPEED,
                size: DEFAULT_SIZE,
                delay: Duration::ZERO,
            },
            values: Vec::new(),
            step: None,
            transition: Transition::None,
            frames: 0,
            run_start: None,
            last_result: None,
        }
    }
}

impl UiState {
    pub fn is_running(&self) -> bool {
        matches!(self.run_state, RunState::Sorting | RunState::Stopping)
    }

    pub fn finished(&self) -> bool {
        self.run_state == RunState::Sorted
    }

    fn reset_view(&mut self, values: Vec<Value>) {
        self.values = values;
        self.step = None;
        self.transition = Transition::None;
    }
}

pub fn apply_event(state: &mut UiState, ev: SortEvent) {
    match ev {
        SortEvent::ArrayGenerated { values } => {
            state.info = format!("New array of {} values", values.len());
            state.reset_view(values);
            state.run_state = RunState::Idle;
            state.frames = 0;
        }
        SortEvent::Settings(settings) => state.settings = settings,
        SortEvent::RunStarted { algorithm, delay } => {
            state.run_state = RunState::Sorting;
            state.frames = 0;
            state.run_start = Some(Instant::now());
            state.info = format!(
                "Sorting with {algorithm} ({} per step)",
                humantime::format_duration(delay)
            );
        }
        SortEvent::Frame { values, step } => {
            state.transition = Transition::between(&state.values, &values, &step);
            state.values = values;
            state.step = Some(step);
            state.frames += 1;
        }
        SortEvent::Info(info) => {
            if matches!(info, InfoEvent::Stopping) && state.is_running() {
                state.run_state = RunState::Stopping;
            }
            state.info = info.to_message();
        }
        SortEvent::RunFinished { result } => handle_run_completed(state, *result),
        SortEvent::RunFailed { values, message } => {
            state.reset_view(values);
            state.run_state = RunState::Idle;
            state.info = message;
        }
    }
}

fn handle_run_completed(state: &mut UiState, r: RunResult) {
    let processed = orchestrator::process_run_completion(&r);
    state.reset_view(r.values.clone());
    state.run_state = if processed.finished {
        RunState::Sorted
    } else {
        RunState::Idle
    };
    state.info = processed.message;
    state.last_result = Some(r);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RunOutcome, RunStats};

    fn finished_run(outcome: RunOutcome) -> SortEvent {
        SortEvent::RunFinished {
            result: Box::new(RunResult {
                timestamp_utc: String::new(),
                algorithm: Algorithm::Bubble,
                outcome,
                input: vec![2, 1],
                values: vec![1, 2],
                stats: RunStats::default(),
                delay: Duration::ZERO,
                elapsed_ms: 0,
            }),
        }
    }

    #[test]
    fn frames_track_transition_and_count() {
        let mut s = UiState::default();
        apply_event(&mut s, SortEvent::ArrayGenerated { values: vec![2, 1] });
        apply_event(
            &mut s,
            SortEvent::RunStarted {
                algorithm: Algorithm::Bubble,
                delay: Duration::ZERO,
            },
        );
        assert!(s.is_running());
        apply_event(
            &mut s,
            SortEvent::Frame {
                values: vec![1, 2],
                step: Step::new().swapping([0, 1]),
            },
        );
        assert_eq!(s.transition, Transition::Swap(0, 1));
        assert_eq!(s.frames, 1);
    }

    #[test]
    fn stopping_only_applies_while_running() {
        let mut s = UiState::default();
        apply_event(&mut s, SortEvent::Info(InfoEvent::Stopping));
        assert_eq!(s.run_state, RunState::Idle);
        s.run_state = RunState::Sorting;
        apply_event(&mut s, SortEvent::Info(InfoEvent::Stopping));
        assert_eq!(s.run_state, RunState::Stopping);
    }

    #[test]
    fn completion_marks_sorted_but_cancellation_does_not() {
        let mut s = UiState::default();
        s.run_state = RunState::Sorting;
        apply_event(&mut s, finished_run(RunOutcome::Completed));
        assert!(s.finished());
        assert!(s.step.is_none());

        s.run_state = RunState::Sorting;
        apply_event(&mut s, finished_run(RunOutcome::Cancelled));
        assert_eq!(s.run_state, RunState::Idle);
        assert!(s.last_result.is_some());
    }
}
