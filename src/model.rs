use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Element type of the array being sorted.
pub type Value = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Selection => "Selection Sort",
            Algorithm::Insertion => "Insertion Sort",
            Algorithm::Merge => "Merge Sort",
            Algorithm::Quick => "Quick Sort",
        }
    }

    /// Whether equal elements keep their relative order.
    pub fn is_stable(self) -> bool {
        matches!(self, Algorithm::Insertion | Algorithm::Merge)
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|a| *a == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Pick by 1-based keypad index.
    pub fn from_index(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub algorithm: Algorithm,
    pub delay: Duration,
}

/// Relative length of the pause that follows a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pause {
    #[default]
    Full,
    Half,
    Quarter,
}

impl Pause {
    pub fn scale(self, delay: Duration) -> Duration {
        match self {
            Pause::Full => delay,
            Pause::Half => delay / 2,
            Pause::Quarter => delay / 4,
        }
    }
}

/// One visualization event: which indices are compared, written or finalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    pub comparing: Vec<usize>,
    pub swapping: Vec<usize>,
    pub sorted: Vec<usize>,
    pub pause: Pause,
}

impl Step {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comparing(mut self, idx: impl IntoIterator<Item = usize>) -> Self {
        self.comparing = idx.into_iter().collect();
        self
    }

    pub fn swapping(mut self, idx: impl IntoIterator<Item = usize>) -> Self {
        self.swapping = idx.into_iter().collect();
        self
    }

    pub fn sorted(mut self, idx: impl IntoIterator<Item = usize>) -> Self {
        self.sorted = idx.into_iter().collect();
        self
    }

    pub fn pause(mut self, pause: Pause) -> Self {
        self.pause = pause;
        self
    }

    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.comparing.is_empty() {
            parts.push(format!("compare {:?}", self.comparing));
        }
        if !self.swapping.is_empty() {
            parts.push(format!("write {:?}", self.swapping));
        }
        if !self.sorted.is_empty() {
            parts.push(format!("sorted {}", self.sorted.len()));
        }
        if parts.is_empty() {
            "idle".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub comparisons: u64,
    pub writes: u64,
    pub events: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Cancelled,
    /// The worker died; `values` holds the restored input.
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(default)]
    pub timestamp_utc: String,
    pub algorithm: Algorithm,
    pub outcome: RunOutcome,
    pub input: Vec<Value>,
    pub values: Vec<Value>,
    pub stats: RunStats,
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
    pub elapsed_ms: u64,
}

/// Control values mirrored back to the UI whenever they change or a change is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub algorithm: Algorithm,
    pub speed: u8,
    pub size: usize,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub enum SortEvent {
    ArrayGenerated {
        values: Vec<Value>,
    },
    Settings(Settings),
    RunStarted {
        algorithm: Algorithm,
        delay: Duration,
    },
    Frame {
        values: Vec<Value>,
        step: Step,
    },
    Info(InfoEvent),
    RunFinished {
        // Box to keep SortEvent small; RunResult carries two arrays.
        result: Box<RunResult>,
    },
    RunFailed {
        values: Vec<Value>,
        message: String,
    },
}

/// Structured info events emitted by the controller and consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum InfoEvent {
    Message(String),
    AlreadyRunning,
    NotRunning,
    ControlsLocked { control: String },
    Stopping,
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::AlreadyRunning => "A sort is already running".to_string(),
            InfoEvent::NotRunning => "Nothing to stop".to_string(),
            InfoEvent::ControlsLocked { control } => {
                format!("Cannot change {control} while sorting")
            }
            InfoEvent::Stopping => "Stopping…".to_string(),
        }
    }
}
