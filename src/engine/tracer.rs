use super::{CancelToken, Cancelled, StepSink};
use crate::model::{RunStats, Step};
use std::cmp::Ordering;

/// Mutable view of the array for one run.
///
/// Every mutation and comparison an algorithm performs goes through here so
/// that stats are counted in one place, and every event passes the
/// cancellation checkpoint before it reaches the sink.
pub struct Tracer<'a, T> {
    values: &'a mut [T],
    sink: &'a mut dyn StepSink<T>,
    cancel: &'a CancelToken,
    stats: RunStats,
}

impl<'a, T: Ord + Copy> Tracer<'a, T> {
    pub fn new(values: &'a mut [T], sink: &'a mut dyn StepSink<T>, cancel: &'a CancelToken) -> Self {
        Self {
            values,
            sink,
            cancel,
            stats: RunStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, i: usize) -> T {
        self.values[i]
    }

    pub fn compare(&mut self, a: T, b: T) -> Ordering {
        self.stats.comparisons += 1;
        a.cmp(&b)
    }

    pub fn set(&mut self, i: usize, v: T) {
        self.values[i] = v;
        self.stats.writes += 1;
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.values.swap(i, j);
        self.stats.writes += 2;
    }

    /// Checkpoint, then hand the event to the sink.
    pub fn show(&mut self, step: Step) -> Result<(), Cancelled> {
        if self.cancel.is_cancelled() {
            return Err(Cancelled);
        }
        self.stats.events += 1;
        self.sink.frame(self.values, &step);
        Ok(())
    }

    /// Write back values held outside the array, starting at `at`.
    ///
    /// Used on the cancellation path so the array stays a permutation of the input.
    pub fn restore(&mut self, at: usize, held: &[T]) {
        for (offset, v) in held.iter().enumerate() {
            self.values[at + offset] = *v;
        }
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }
}
