//! Animation driver: forwards each step to the presentation layer and paces the run.

use super::StepSink;
use crate::model::{SortEvent, Step, Value};
use std::time::Duration;
use tokio::sync::mpsc;

pub struct AnimationDriver {
    event_tx: mpsc::UnboundedSender<SortEvent>,
    delay: Duration,
}

impl AnimationDriver {
    pub fn new(event_tx: mpsc::UnboundedSender<SortEvent>, delay: Duration) -> Self {
        Self { event_tx, delay }
    }
}

impl StepSink<Value> for AnimationDriver {
    fn frame(&mut self, values: &[Value], step: &Step) {
        // A closed channel only means nobody is watching; the run still finishes.
        let _ = self.event_tx.send(SortEvent::Frame {
            values: values.to_vec(),
            step: step.clone(),
        });
        let pause = step.pause.scale(self.delay);
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CancelToken, SortEngine};
    use crate::model::{Algorithm, Pause, RunConfig, RunOutcome};
    use std::time::Instant;

    #[test]
    fn zero_delay_still_emits_every_frame() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = SortEngine::new(RunConfig {
            algorithm: Algorithm::Bubble,
            delay: Duration::ZERO,
        });
        let result = engine.run(vec![5, 3, 8, 1], tx, CancelToken::new());
        assert_eq!(result.outcome, RunOutcome::Completed);
        assert_eq!(result.values, vec![1, 3, 5, 8]);
        assert_eq!(result.input, vec![5, 3, 8, 1]);

        let mut frames = 0;
        while let Ok(ev) = rx.try_recv() {
            assert!(matches!(ev, SortEvent::Frame { .. }));
            frames += 1;
        }
        assert_eq!(frames as u64, result.stats.events);
    }

    #[test]
    fn pauses_follow_step_weight() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut driver = AnimationDriver::new(tx, Duration::from_millis(40));
        let started = Instant::now();
        driver.frame(&[1], &Step::new().pause(Pause::Quarter));
        driver.frame(&[1], &Step::new().pause(Pause::Half));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn closed_channel_does_not_stop_the_run() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let engine = SortEngine::new(RunConfig {
            algorithm: Algorithm::Merge,
            delay: Duration::ZERO,
        });
        let result = engine.run(vec![2, 1, 3], tx, CancelToken::new());
        assert_eq!(result.outcome, RunOutcome::Completed);
        assert_eq!(result.values, vec![1, 2, 3]);
    }
}
