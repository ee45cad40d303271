use super::tracer::Tracer;
use super::Cancelled;
use crate::model::{Pause, Step};

/// Indices fixed at the tail after `passes` completed passes.
fn tail(n: usize, passes: usize) -> impl Iterator<Item = usize> {
    (0..passes.min(n)).map(move |k| n - 1 - k)
}

pub(super) fn sort<T: Ord + Copy>(t: &mut Tracer<'_, T>) -> Result<(), Cancelled> {
    let n = t.len();
    let mut pass = 0;
    loop {
        let mut swapped = false;
        for i in 0..n.saturating_sub(1 + pass) {
            t.show(Step::new().comparing([i, i + 1]).sorted(tail(n, pass)))?;
            let (a, b) = (t.get(i), t.get(i + 1));
            if t.compare(a, b).is_gt() {
                t.swap(i, i + 1);
                swapped = true;
                t.show(
                    Step::new()
                        .swapping([i, i + 1])
                        .sorted(tail(n, pass))
                        .pause(Pause::Half),
                )?;
            }
        }
        if n < 2 {
            return Ok(());
        }
        pass += 1;
        t.show(Step::new().sorted(tail(n, pass)))?;
        if !swapped {
            return Ok(());
        }
    }
}
