use crate::types::{LineStatus, LyricLine};

/// Times every `Unresolved` line from the matched anchors around it and marks
/// it `Interpolated`. Returns the transcript indices of the lines it timed.
///
/// - Between two anchors the gap is shared out by character count: each line
///   is assumed to last in proportion to its length.
/// - Before the first anchor, lines step back by the inter-line spacing of
///   the first two anchors, clamped at zero.
/// - After the last anchor, lines step forward by the spacing of the last two
///   anchors.
///
/// With a single anchor, `default_line_spacing_s` stands in for the spacing.
pub(crate) fn fill_unresolved(lines: &mut [LyricLine], default_line_spacing_s: f64) -> Vec<usize> {
    let anchors: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.status == LineStatus::Matched)
        .map(|(slot, _)| slot)
        .collect();
    let (Some(&first), Some(&last)) = (anchors.first(), anchors.last()) else {
        return Vec::new();
    };

    let mut timed = Vec::new();

    let lead_spacing = anchors
        .get(1)
        .map(|&second| spacing(lines, first, second))
        .unwrap_or(default_line_spacing_s);
    let first_time = anchor_time(lines, first);
    for slot in 0..first {
        let back = lead_spacing * (first - slot) as f64;
        set_interpolated(&mut lines[slot], (first_time - back).max(0.0), &mut timed);
    }

    for pair in anchors.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let lo_time = anchor_time(lines, lo);
        let hi_time = anchor_time(lines, hi);
        let total_weight: f64 = lines[lo..hi].iter().map(LyricLine::weight).sum();
        let mut covered = 0.0f64;
        for slot in lo + 1..hi {
            covered += lines[slot - 1].weight();
            let t = lo_time + (hi_time - lo_time) * covered / total_weight;
            set_interpolated(&mut lines[slot], t, &mut timed);
        }
    }

    let trail_spacing = if anchors.len() >= 2 {
        spacing(lines, anchors[anchors.len() - 2], last)
    } else {
        default_line_spacing_s
    };
    let last_time = anchor_time(lines, last);
    for slot in last + 1..lines.len() {
        let forward = trail_spacing * (slot - last) as f64;
        set_interpolated(&mut lines[slot], last_time + forward, &mut timed);
    }

    timed.sort_unstable();
    timed
}

fn anchor_time(lines: &[LyricLine], slot: usize) -> f64 {
    lines[slot].assigned_start_time.unwrap_or(0.0)
}

/// Seconds per line between two anchors; never negative.
fn spacing(lines: &[LyricLine], a: usize, b: usize) -> f64 {
    let dt = anchor_time(lines, b) - anchor_time(lines, a);
    (dt / (b - a) as f64).max(0.0)
}

fn set_interpolated(line: &mut LyricLine, time: f64, timed: &mut Vec<usize>) {
    tracing::debug!(
        line = line.index,
        time = format!("{:.3}", time),
        "resolver: interpolated line"
    );
    line.assigned_start_time = Some(time);
    line.assigned_end_time = None;
    line.status = LineStatus::Interpolated;
    timed.push(line.index);
}
