//! Speed control to pause duration mapping.
//!
//! Higher speed means a shorter pause. The mapping is linear between the
//! configured bounds and clamps out-of-range speeds.

use std::time::Duration;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 100;
pub const DEFAULT_SPEED: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayMapping {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for DelayMapping {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(500),
        }
    }
}

impl DelayMapping {
    /// Build a mapping, swapping the bounds if they were given inverted.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        if min_delay <= max_delay {
            Self {
                min_delay,
                max_delay,
            }
        } else {
            Self {
                min_delay: max_delay,
                max_delay: min_delay,
            }
        }
    }

    pub fn clamp_speed(speed: u8) -> u8 {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    }

    /// Pause length for a speed value, floored to whole milliseconds.
    pub fn delay_for(&self, speed: u8) -> Duration {
        let speed = Self::clamp_speed(speed);
        let span = (MAX_SPEED - MIN_SPEED) as f64;
        let max_ms = self.max_delay.as_millis() as f64;
        let min_ms = self.min_delay.as_millis() as f64;
        // Multiply before dividing so whole-number results stay exact.
        let reduction = (speed - MIN_SPEED) as f64 * (max_ms - min_ms) / span;
        let ms = (max_ms - reduction).floor().max(0.0);
        Duration::from_millis(ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_map_inversely() {
        let m = DelayMapping::default();
        assert_eq!(m.delay_for(MAX_SPEED), Duration::from_millis(5));
        assert_eq!(m.delay_for(MIN_SPEED), Duration::from_millis(500));
    }

    #[test]
    fn matches_slider_formula_in_between() {
        // floor(500 - (50 - 1) / 99 * 495) = floor(255) = 255
        let m = DelayMapping::default();
        assert_eq!(m.delay_for(50), Duration::from_millis(255));
    }

    #[test]
    fn out_of_range_speed_is_clamped() {
        let m = DelayMapping::default();
        assert_eq!(m.delay_for(0), m.delay_for(MIN_SPEED));
        assert_eq!(m.delay_for(u8::MAX), m.delay_for(MAX_SPEED));
    }

    #[test]
    fn faster_is_never_slower() {
        let m = DelayMapping::default();
        let mut last = m.delay_for(MIN_SPEED);
        for s in MIN_SPEED..=MAX_SPEED {
            let d = m.delay_for(s);
            assert!(d <= last, "speed {s} gave {d:?} after {last:?}");
            last = d;
        }
    }

    #[test]
    fn zero_floor_disables_pause_at_max_speed() {
        let m = DelayMapping::new(Duration::ZERO, Duration::from_millis(200));
        assert_eq!(m.delay_for(MAX_SPEED), Duration::ZERO);
    }

    #[test]
    fn inverted_bounds_are_normalized() {
        let m = DelayMapping::new(Duration::from_millis(500), Duration::from_millis(5));
        assert_eq!(m, DelayMapping::default());
    }
}
