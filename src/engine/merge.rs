use super::tracer::Tracer;
use super::Cancelled;
use crate::model::{Pause, Step};

pub(super) fn sort<T: Ord + Copy>(t: &mut Tracer<'_, T>) -> Result<(), Cancelled> {
    match t.len() {
        0 => Ok(()),
        n => sort_range(t, 0, n - 1),
    }
}

fn sort_range<T: Ord + Copy>(t: &mut Tracer<'_, T>, left: usize, right: usize) -> Result<(), Cancelled> {
    if left >= right {
        if left == right {
            t.show(Step::new().sorted([left]).pause(Pause::Half))?;
        }
        return Ok(());
    }
    let mid = left + (right - left) / 2;
    sort_range(t, left, mid)?;
    sort_range(t, mid + 1, right)?;
    merge(t, left, mid, right)
}

/// Read cursors into the two copied halves and the write cursor into the array.
struct Cursor {
    i: usize,
    j: usize,
    k: usize,
}

fn merge<T: Ord + Copy>(t: &mut Tracer<'_, T>, left: usize, mid: usize, right: usize) -> Result<(), Cancelled> {
    t.show(Step::new().comparing(left..=right))?;
    let lhs: Vec<T> = (left..=mid).map(|i| t.get(i)).collect();
    let rhs: Vec<T> = (mid + 1..=right).map(|j| t.get(j)).collect();

    let mut c = Cursor { i: 0, j: 0, k: left };
    let res = merge_into(t, &lhs, &rhs, mid, &mut c);
    if let Err(cancelled) = res {
        // Unplaced values exactly fill [k, right].
        t.restore(c.k, &lhs[c.i..]);
        t.restore(c.k + lhs.len() - c.i, &rhs[c.j..]);
        return Err(cancelled);
    }

    t.show(Step::new().sorted(left..=right))
}

fn merge_into<T: Ord + Copy>(
    t: &mut Tracer<'_, T>,
    lhs: &[T],
    rhs: &[T],
    mid: usize,
    c: &mut Cursor,
) -> Result<(), Cancelled> {
    let left = c.k;
    while c.i < lhs.len() && c.j < rhs.len() {
        let pair = [left + c.i, mid + 1 + c.j];
        t.show(Step::new().comparing(pair))?;
        let v = if t.compare(lhs[c.i], rhs[c.j]).is_le() {
            c.i += 1;
            lhs[c.i - 1]
        } else {
            c.j += 1;
            rhs[c.j - 1]
        };
        t.set(c.k, v);
        c.k += 1;
        t.show(Step::new().comparing(pair).swapping([c.k - 1]))?;
        t.show(Step::new().comparing([c.k - 1]).pause(Pause::Half))?;
    }

    while c.i < lhs.len() {
        let src = left + c.i;
        t.set(c.k, lhs[c.i]);
        c.i += 1;
        c.k += 1;
        t.show(Step::new().comparing([src]).swapping([c.k - 1]))?;
        t.show(Step::new().comparing([c.k - 1]).pause(Pause::Half))?;
    }

    while c.j < rhs.len() {
        let src = mid + 1 + c.j;
        t.set(c.k, rhs[c.j]);
        c.j += 1;
        c.k += 1;
        t.show(Step::new().comparing([src]).swapping([c.k - 1]))?;
        t.show(Step::new().comparing([c.k - 1]).pause(Pause::Half))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::*;
    use crate::engine::{execute, CancelToken};
    use crate::model::{Algorithm, RunOutcome};

    #[test]
    fn two_elements_compare_once_and_place_smaller_first() {
        let mut v = vec![9, 1];
        let (exec, rec) = run_recorded(Algorithm::Merge, &mut v);
        assert_eq!(v, vec![1, 9]);
        assert_eq!(exec.stats.comparisons, 1);
        let compared: Vec<_> = rec
            .frames
            .iter()
            .filter(|(_, s)| s.comparing == vec![0, 1] && s.swapping.is_empty())
            .collect();
        // range highlight, then the 9 vs 1 comparison
        assert_eq!(compared.len(), 2);
        let placements: Vec<Vec<i64>> = rec
            .frames
            .iter()
            .filter(|(_, s)| !s.swapping.is_empty())
            .map(|(snap, _)| snap.clone())
            .collect();
        assert_eq!(placements, vec![vec![1, 1], vec![1, 9]]);
    }

    #[test]
    fn merged_range_is_marked_after_each_merge() {
        let mut v = vec![3, 1, 2];
        let (_, rec) = run_recorded(Algorithm::Merge, &mut v);
        assert_eq!(v, vec![1, 2, 3]);
        let last = rec.frames.last().map(|(_, s)| s.sorted.clone());
        assert_eq!(last, Some(vec![0, 1, 2]));
    }

    #[test]
    fn cancel_mid_merge_restores_unplaced_values() {
        for stop in 1..20 {
            let token = CancelToken::new();
            let mut rec = Recorder {
                frames: Vec::new(),
                cancel_after: Some((stop, token.clone())),
            };
            let input = vec![8, 3, 5, 1, 9, 2];
            let mut v = input.clone();
            let exec = execute(Algorithm::Merge, &mut v, &mut rec, &token);
            assert_eq!(exec.outcome, RunOutcome::Cancelled, "stop {stop}");
            assert!(same_multiset(&input, &v), "stop {stop}: {v:?}");
        }
    }
}
