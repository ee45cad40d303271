use super::tracer::Tracer;
use super::Cancelled;
use crate::model::{Pause, Step};

pub(super) fn sort<T: Ord + Copy>(t: &mut Tracer<'_, T>) -> Result<(), Cancelled> {
    let n = t.len();
    if n == 0 {
        return Ok(());
    }
    t.show(Step::new().sorted([0]))?;

    for i in 1..n {
        let current = t.get(i);
        // `hole` is the slot `current` will land in; it always holds a stale copy.
        let mut hole = i;
        let shifted = shift_greater(t, current, &mut hole, i);
        if let Err(cancelled) = shifted {
            t.restore(hole, &[current]);
            return Err(cancelled);
        }

        t.set(hole, current);
        t.show(Step::new().swapping([hole]).sorted(0..=i))?;
        t.show(Step::new().sorted(0..=i))?;
    }
    Ok(())
}

/// Move every element greater than `current` one slot right, leaving `hole` at the gap.
fn shift_greater<T: Ord + Copy>(
    t: &mut Tracer<'_, T>,
    current: T,
    hole: &mut usize,
    i: usize,
) -> Result<(), Cancelled> {
    t.show(Step::new().comparing([i]).sorted(0..i))?;
    while *hole > 0 {
        let j = *hole - 1;
        let left = t.get(j);
        if !t.compare(left, current).is_gt() {
            break;
        }
        t.show(Step::new().comparing([j]).swapping([j + 1]).sorted(0..i))?;
        t.set(j + 1, left);
        *hole = j;
        t.show(
            Step::new()
                .comparing([j])
                .swapping([j + 1])
                .sorted(0..i)
                .pause(Pause::Half),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::*;
    use crate::engine::{execute, CancelToken};
    use crate::model::{Algorithm, RunOutcome};

    #[test]
    fn equal_elements_are_not_shifted() {
        let mut v = vec![2, 2, 2];
        let (exec, _) = run_recorded(Algorithm::Insertion, &mut v);
        // only the final placement of each element is written
        assert_eq!(exec.stats.writes, 2);
        assert_eq!(exec.stats.comparisons, 2);
    }

    #[test]
    fn prefix_grows_after_each_insertion() {
        let mut v = vec![4, 3, 2, 1];
        let (_, rec) = run_recorded(Algorithm::Insertion, &mut v);
        assert_eq!(v, vec![1, 2, 3, 4]);
        let prefixes: Vec<usize> = rec
            .frames
            .iter()
            .filter(|(_, s)| s.comparing.is_empty() && s.swapping.is_empty())
            .map(|(_, s)| s.sorted.len())
            .collect();
        assert_eq!(prefixes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn cancel_mid_shift_puts_held_value_back() {
        // [5,4,1]: the ninth frame shows 5 shifted right while 1 is held aside.
        let token = CancelToken::new();
        let mut rec = Recorder {
            frames: Vec::new(),
            cancel_after: Some((9, token.clone())),
        };
        let mut v = vec![5, 4, 1];
        let exec = execute(Algorithm::Insertion, &mut v, &mut rec, &token);
        assert_eq!(exec.outcome, RunOutcome::Cancelled);
        assert_eq!(rec.frames.last().map(|(s, _)| s.clone()), Some(vec![4, 5, 5]));
        assert_eq!(v, vec![4, 1, 5]);
    }
}
