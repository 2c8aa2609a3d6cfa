use crate::types::LyricLine;

/// Raises any start time not strictly above its predecessor to the
/// predecessor plus `epsilon`. Returns how many lines were raised.
pub(crate) fn enforce_increasing(lines: &mut [LyricLine], epsilon: f64) -> usize {
    let mut raised = 0usize;
    let mut prev: Option<f64> = None;
    for line in lines.iter_mut() {
        let Some(t) = line.assigned_start_time else {
            continue;
        };
        let t = match prev {
            Some(p) if t <= p => {
                let lifted = p + epsilon;
                tracing::debug!(
                    line = line.index,
                    from = format!("{:.3}", t),
                    to = format!("{:.3}", lifted),
                    "resolver: raised line time to keep order"
                );
                line.assigned_start_time = Some(lifted);
                raised += 1;
                lifted
            }
            _ => t,
        };
        prev = Some(t);
    }
    raised
}
