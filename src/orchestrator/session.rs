//! Session state owned by the run controller.
//!
//! Holds the current array and the control values. Runs take the array by
//! value and hand it back through their `RunResult`.

use crate::model::{Algorithm, RunConfig, Settings, Value};
use crate::speed::DelayMapping;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::time::Duration;

pub const MIN_SIZE: usize = 5;
pub const MAX_SIZE: usize = 100;
pub const DEFAULT_SIZE: usize = 20;
pub const VALUE_RANGE: RangeInclusive<Value> = 5..=100;

pub(crate) struct Session {
    pub values: Vec<Value>,
    pub algorithm: Algorithm,
    pub speed: u8,
    pub size: usize,
    pub mapping: DelayMapping,
    rng: StdRng,
}

impl Session {
    pub fn new(algorithm: Algorithm, speed: u8, size: usize, mapping: DelayMapping, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut session = Self {
            values: Vec::new(),
            algorithm,
            speed: DelayMapping::clamp_speed(speed),
            size: Self::clamp_size(size),
            mapping,
            rng,
        };
        session.regenerate();
        session
    }

    /// Replace the generated array with explicit values; size follows their length.
    pub fn with_values(mut self, values: Vec<Value>) -> Self {
        self.size = values.len();
        self.values = values;
        self
    }

    pub fn clamp_size(size: usize) -> usize {
        size.clamp(MIN_SIZE, MAX_SIZE)
    }

    /// Fresh random array; an explicit array of out-of-range length snaps back into range.
    pub fn regenerate(&mut self) {
        self.size = Self::clamp_size(self.size);
        let size = self.size;
        self.values = (0..size)
            .map(|_| self.rng.gen_range(VALUE_RANGE))
            .collect();
    }

    pub fn resize(&mut self, size: usize) {
        self.size = Self::clamp_size(size);
        self.regenerate();
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.speed = DelayMapping::clamp_speed(speed);
    }

    pub fn delay(&self) -> Duration {
        self.mapping.delay_for(self.speed)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            algorithm: self.algorithm,
            speed: self.speed,
            size: self.values.len(),
            delay: self.delay(),
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            algorithm: self.algorithm,
            delay: self.delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: usize) -> Session {
        Session::new(Algorithm::Quick, 50, size, DelayMapping::default(), Some(7))
    }

    #[test]
    fn generated_values_stay_in_range() {
        let s = session(100);
        assert_eq!(s.values.len(), 100);
        assert!(s.values.iter().all(|v| VALUE_RANGE.contains(v)));
    }

    #[test]
    fn size_is_clamped() {
        assert_eq!(session(1).values.len(), MIN_SIZE);
        assert_eq!(session(1000).values.len(), MAX_SIZE);
        let mut s = session(20);
        s.resize(42);
        assert_eq!(s.settings().size, 42);
    }

    #[test]
    fn seed_makes_generation_reproducible() {
        assert_eq!(session(30).values, session(30).values);
    }

    #[test]
    fn explicit_values_override_size() {
        let s = session(20).with_values(vec![5, 3, 8, 1]);
        assert_eq!(s.size, 4);
        assert_eq!(s.settings().size, 4);
        assert_eq!(s.run_config().algorithm, Algorithm::Quick);
    }

    #[test]
    fn regenerating_after_explicit_values_returns_to_range() {
        let mut s = session(20).with_values(vec![2, 1]);
        s.regenerate();
        assert_eq!(s.values.len(), MIN_SIZE);
    }
}
