//! Pure mapping from array state and step highlights to visual cells.
//!
//! Nothing here knows about algorithms. Front ends turn `Cell`s into
//! terminal spans or plain text.

use crate::model::{Step, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Plain,
    Sorted,
    Comparing,
    Swapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub value: Value,
    pub mark: Mark,
}

/// Build one cell per value. `finished` marks everything sorted.
pub fn cells(values: &[Value], step: Option<&Step>, finished: bool) -> Vec<Cell> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let mark = match step {
                Some(s) if s.swapping.contains(&i) => Mark::Swapping,
                Some(s) if s.comparing.contains(&i) => Mark::Comparing,
                _ if finished => Mark::Sorted,
                Some(s) if s.sorted.contains(&i) => Mark::Sorted,
                _ => Mark::Plain,
            };
            Cell { value, mark }
        })
        .collect()
}

/// How the array moved between two consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Write(usize),
    Swap(usize, usize),
}

impl Transition {
    /// Derive the transition from the previous snapshot, the current one and the step.
    pub fn between(prev: &[Value], current: &[Value], step: &Step) -> Self {
        if prev.len() != current.len() {
            return Transition::None;
        }
        match step.swapping.as_slice() {
            &[a, b] if a < current.len() && b < current.len() => {
                if a != b && prev[a] == current[b] && prev[b] == current[a] && prev[a] != prev[b] {
                    Transition::Swap(a.min(b), a.max(b))
                } else {
                    Transition::None
                }
            }
            &[i] if i < current.len() && prev[i] != current[i] => Transition::Write(i),
            _ => Transition::None,
        }
    }
}

/// Box width in characters for the widest value, including one space of padding.
pub fn box_width(values: &[Value]) -> usize {
    values
        .iter()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1)
        + 2
}

/// One-line plain text rendering, e.g. `3 [5] <8> 1` for text mode.
pub fn plain_line(cells: &[Cell]) -> String {
    cells
        .iter()
        .map(|c| match c.mark {
            Mark::Plain => format!("{}", c.value),
            Mark::Sorted => format!("{}.", c.value),
            Mark::Comparing => format!("[{}]", c.value),
            Mark::Swapping => format!("<{}>", c.value),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
