use super::tracer::Tracer;
use super::Cancelled;
use crate::model::{Pause, Step};

pub(super) fn sort<T: Ord + Copy>(t: &mut Tracer<'_, T>) -> Result<(), Cancelled> {
    let n = t.len();
    let mut sorted: Vec<usize> = Vec::with_capacity(n);

    for i in 0..n.saturating_sub(1) {
        let mut min = i;
        t.show(Step::new().comparing([min]).sorted(sorted.clone()))?;

        for j in (i + 1)..n {
            t.show(
                Step::new()
                    .comparing([min, j])
                    .sorted(sorted.clone())
                    .pause(Pause::Quarter),
            )?;
            let (candidate, current) = (t.get(j), t.get(min));
            if t.compare(candidate, current).is_lt() {
                min = j;
                t.show(
                    Step::new()
                        .comparing([min])
                        .sorted(sorted.clone())
                        .pause(Pause::Half),
                )?;
            }
        }

        if min != i {
            t.swap(i, min);
            t.show(
                Step::new()
                    .swapping([i, min])
                    .sorted(sorted.iter().copied().chain([i]))
                    .pause(Pause::Half),
            )?;
        }

        sorted.push(i);
        t.show(Step::new().sorted(sorted.clone()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::*;
    use crate::model::Algorithm;

    #[test]
    fn swaps_only_when_minimum_moved() {
        let mut v = vec![1, 2, 3];
        let (exec, _) = run_recorded(Algorithm::Selection, &mut v);
        assert_eq!(exec.stats.writes, 0);
        assert_eq!(exec.stats.comparisons, 3);

        let mut v = vec![3, 1, 2];
        let (exec, _) = run_recorded(Algorithm::Selection, &mut v);
        assert_eq!(v, vec![1, 2, 3]);
        // 3<->1, then 3<->2
        assert_eq!(exec.stats.writes, 4);
    }

    #[test]
    fn head_is_finalized_in_order() {
        let mut v = vec![6, 2, 9, 2, 5];
        let (_, rec) = run_recorded(Algorithm::Selection, &mut v);
        let marks: Vec<Vec<usize>> = rec
            .frames
            .iter()
            .filter(|(_, s)| s.comparing.is_empty() && s.swapping.is_empty())
            .map(|(_, s)| s.sorted.clone())
            .collect();
        assert_eq!(marks, vec![vec![0], vec![0, 1], vec![0, 1, 2], vec![0, 1, 2, 3]]);
        for (snapshot, step) in &rec.frames {
            for &i in &step.sorted {
                assert_eq!(snapshot[i], [2, 2, 5, 6, 9][i]);
            }
        }
    }
}
