use super::tracer::Tracer;
use super::Cancelled;
use crate::model::{Pause, Step};

pub(super) fn sort<T: Ord + Copy>(t: &mut Tracer<'_, T>) -> Result<(), Cancelled> {
    let mut sorted = Vec::new();
    match t.len() {
        0 => Ok(()),
        n => sort_range(t, 0, n - 1, &mut sorted),
    }
}

fn sort_range<T: Ord + Copy>(
    t: &mut Tracer<'_, T>,
    low: usize,
    high: usize,
    sorted: &mut Vec<usize>,
) -> Result<(), Cancelled> {
    if low == high {
        if !sorted.contains(&low) {
            sorted.push(low);
            t.show(Step::new().sorted(sorted.clone()).pause(Pause::Half))?;
        }
        return Ok(());
    }
    if low > high {
        return Ok(());
    }

    let pivot = partition(t, low, high, sorted)?;
    sorted.push(pivot);
    t.show(Step::new().sorted(sorted.clone()))?;

    if pivot > low {
        sort_range(t, low, pivot - 1, sorted)?;
    }
    if pivot < high {
        sort_range(t, pivot + 1, high, sorted)?;
    }
    Ok(())
}

/// Lomuto partition around `values[high]`; returns the pivot's final index.
fn partition<T: Ord + Copy>(
    t: &mut Tracer<'_, T>,
    low: usize,
    high: usize,
    sorted: &[usize],
) -> Result<usize, Cancelled> {
    let pivot = t.get(high);
    // Everything left of `boundary` is strictly less than the pivot.
    let mut boundary = low;
    t.show(Step::new().comparing([high]).sorted(sorted.to_vec()))?;

    for j in low..high {
        t.show(Step::new().comparing([j, high]).sorted(sorted.to_vec()))?;
        let v = t.get(j);
        if t.compare(v, pivot).is_lt() {
            if boundary != j {
                t.swap(boundary, j);
                t.show(
                    Step::new()
                        .swapping([boundary, j])
                        .comparing([high])
                        .sorted(sorted.to_vec())
                        .pause(Pause::Half),
                )?;
            }
            boundary += 1;
        }
    }

    if boundary != high {
        t.swap(boundary, high);
        t.show(
            Step::new()
                .swapping([boundary, high])
                .sorted(sorted.iter().copied().chain([boundary]))
                .pause(Pause::Half),
        )?;
    }
    Ok(boundary)
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::*;
    use crate::model::Algorithm;

    #[test]
    fn first_partition_with_no_smaller_element_swaps_pivot_to_front() {
        let mut v = vec![4, 2, 7, 2];
        let (_, rec) = run_recorded(Algorithm::Quick, &mut v);
        assert_eq!(v, vec![2, 2, 4, 7]);

        let (snapshot, step) = rec
            .frames
            .iter()
            .find(|(_, s)| !s.swapping.is_empty())
            .expect("pivot swap");
        assert_eq!(snapshot, &vec![2, 2, 7, 4]);
        assert_eq!(step.swapping, vec![0, 3]);

        // pivot index 0 is marked, then the right side 1..=3 is partitioned around 4
        let marked = rec.frames.iter().position(|(_, s)| s.sorted == vec![0]);
        let next_pivot = rec.frames.iter().position(|(_, s)| s.comparing == vec![3] && s.sorted == vec![0]);
        assert!(marked.is_some());
        assert!(next_pivot > marked);
    }

    #[test]
    fn every_index_ends_up_marked() {
        let mut v = vec![5, 1, 4, 1, 3, 9, 2];
        let (_, rec) = run_recorded(Algorithm::Quick, &mut v);
        let mut last = rec.frames.last().map(|(_, s)| s.sorted.clone()).unwrap_or_default();
        last.sort();
        assert_eq!(last, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn marked_pivots_hold_final_values() {
        let mut v = vec![3, 8, 1, 8, 0, 5];
        let (_, rec) = run_recorded(Algorithm::Quick, &mut v);
        let expected = [0, 1, 3, 5, 8, 8];
        for (snapshot, step) in &rec.frames {
            for &i in &step.sorted {
                assert_eq!(snapshot[i], expected[i], "index {i} in {snapshot:?}");
            }
        }
    }
}
