use std::ops::{Range, RangeInclusive};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::alignment::dp::{check_table_size, global_align, AlignmentPlan, TokenAlignment};
use crate::config::{ChunkPolicy, ScoringConfig};
use crate::error::AlignmentError;

/// Inputs of one alignment job at unit granularity.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentTask<'a> {
    pub recognized: &'a [String],
    /// Confidence of the token owning each recognized unit.
    pub confidences: &'a [f32],
    /// Start time of the token owning each recognized unit.
    pub unit_starts: &'a [f64],
    pub lyric: &'a [String],
    /// Paragraphs as contiguous ranges of lyric unit positions, in order.
    pub lyric_paragraphs: &'a [Range<usize>],
}

/// A sub-problem aligned on its own and stitched back in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub recognized: Range<usize>,
    pub lyric: Range<usize>,
}

/// Maps ranges of owners (line slots) to ranges of unit positions. `owners`
/// must be sorted, which holds for units flattened in line order.
pub fn unit_ranges(owners: &[usize], owner_ranges: &[Range<usize>]) -> Vec<Range<usize>> {
    owner_ranges
        .iter()
        .map(|r| {
            let start = owners.partition_point(|&o| o < r.start);
            let end = owners.partition_point(|&o| o < r.end);
            start..end
        })
        .collect()
}

/// Lyric and recognized units compared on each side of a candidate cut.
const CUT_CONTEXT_UNITS: usize = 4;

/// Groups consecutive paragraphs into chunks whose estimated table fits
/// `limit`, then picks the recognized cut for each group boundary.
///
/// The cut starts from the recognized share proportional to the lyric share
/// and moves within about one chunk's worth of units to the position where
/// the recognized units on both sides best match the lyric units around the
/// boundary. Ties go to the widest pause between token starts, then to the
/// proportional estimate. Boundaries are fixed before any alignment runs.
pub fn plan_chunks(task: &AlignmentTask<'_>, limit: usize) -> Vec<Chunk> {
    let recognized_len = task.recognized.len();
    let lyric_len = task.lyric.len();
    let paragraphs = task.lyric_paragraphs;
    if lyric_len == 0 || paragraphs.is_empty() {
        return vec![Chunk {
            recognized: 0..recognized_len,
            lyric: 0..lyric_len,
        }];
    }

    let estimate_recognized =
        |lyric_units: usize| (recognized_len * lyric_units).div_ceil(lyric_len);

    let mut lyric_cuts = Vec::new();
    let mut group_start = 0usize;
    let mut group_end = 0usize;
    for paragraph in paragraphs {
        let end = paragraph.end.max(group_end);
        let candidate = end - group_start;
        let fits = AlignmentPlan::cell_count(estimate_recognized(candidate), candidate) <= limit;
        if !fits && group_end > group_start {
            lyric_cuts.push(group_end);
            group_start = group_end;
        }
        group_end = end;
    }
    if lyric_cuts.last() != Some(&lyric_len) {
        lyric_cuts.push(lyric_len);
    }

    let reach = (recognized_len / lyric_cuts.len()).max(1);

    let mut chunks = Vec::with_capacity(lyric_cuts.len());
    let mut lyric_start = 0usize;
    let mut recognized_start = 0usize;
    for cut in lyric_cuts {
        let recognized_end = if cut == lyric_len {
            recognized_len
        } else {
            let estimate = (recognized_len * cut + lyric_len / 2) / lyric_len;
            // Largest end that keeps this chunk's own table within `limit`.
            let fit_end = recognized_start + (limit / (cut - lyric_start + 1)).saturating_sub(1);
            let lo = estimate.saturating_sub(reach).max(recognized_start);
            let hi = (estimate + reach)
                .min(fit_end)
                .min(recognized_len)
                .max(lo);
            snap_recognized_cut(task, cut, estimate, lo..=hi)
        };
        chunks.push(Chunk {
            recognized: recognized_start..recognized_end,
            lyric: lyric_start..cut,
        });
        lyric_start = cut;
        recognized_start = recognized_end;
    }
    chunks
}

fn snap_recognized_cut(
    task: &AlignmentTask<'_>,
    lyric_cut: usize,
    estimate: usize,
    candidates: RangeInclusive<usize>,
) -> usize {
    let mut best = estimate.clamp(*candidates.start(), *candidates.end());
    let (mut best_matches, mut best_pause) = boundary_evidence(task, lyric_cut, best);
    for cut in candidates {
        let (matches, pause) = boundary_evidence(task, lyric_cut, cut);
        let better = matches > best_matches
            || (matches == best_matches
                && (pause > best_pause
                    || (pause == best_pause && cut.abs_diff(estimate) < best.abs_diff(estimate))));
        if better {
            best = cut;
            best_matches = matches;
            best_pause = pause;
        }
    }
    tracing::debug!(
        lyric_cut,
        estimate,
        recognized_cut = best,
        matches = best_matches,
        "chunking: recognized cut placed"
    );
    best
}

/// Exact unit matches across a cut placed before recognized unit `cut`, and
/// the pause between the token starts on either side of it.
fn boundary_evidence(task: &AlignmentTask<'_>, lyric_cut: usize, cut: usize) -> (usize, f64) {
    let after = task.lyric[lyric_cut..]
        .iter()
        .zip(&task.recognized[cut..])
        .take(CUT_CONTEXT_UNITS)
        .filter(|(l, r)| l == r)
        .count();
    let before = task.lyric[..lyric_cut]
        .iter()
        .rev()
        .zip(task.recognized[..cut].iter().rev())
        .take(CUT_CONTEXT_UNITS)
        .filter(|(l, r)| l == r)
        .count();
    let pause = match (
        cut.checked_sub(1).and_then(|prev| task.unit_starts.get(prev)),
        task.unit_starts.get(cut),
    ) {
        (Some(prev), Some(next)) => next - prev,
        _ => 0.0,
    };
    (before + after, pause)
}

/// Aligns the whole task in one table when it fits, otherwise applies
/// `policy`.
pub fn align_task(
    task: &AlignmentTask<'_>,
    scoring: &ScoringConfig,
    max_table_cells: usize,
    policy: ChunkPolicy,
) -> Result<TokenAlignment, AlignmentError> {
    let m = task.recognized.len();
    let n = task.lyric.len();
    if AlignmentPlan::cell_count(m, n) <= max_table_cells {
        return global_align(
            task.recognized,
            task.confidences,
            task.lyric,
            scoring,
            max_table_cells,
        );
    }

    match policy {
        ChunkPolicy::Reject => Err(AlignmentError::SizeLimitExceeded {
            cells: AlignmentPlan::cell_count(m, n),
            limit: max_table_cells,
        }),
        ChunkPolicy::Paragraph => align_chunked(task, scoring, max_table_cells),
    }
}

fn align_chunked(
    task: &AlignmentTask<'_>,
    scoring: &ScoringConfig,
    max_table_cells: usize,
) -> Result<TokenAlignment, AlignmentError> {
    let chunks = plan_chunks(task, max_table_cells);
    for chunk in &chunks {
        check_table_size(chunk.recognized.len(), chunk.lyric.len(), max_table_cells)?;
    }
    tracing::info!(
        chunks = chunks.len(),
        recognized_units = task.recognized.len(),
        lyric_units = task.lyric.len(),
        "chunking: table exceeds bound, aligning per paragraph group"
    );

    let run = |chunk: &Chunk| {
        global_align(
            &task.recognized[chunk.recognized.clone()],
            &task.confidences[chunk.recognized.clone()],
            &task.lyric[chunk.lyric.clone()],
            scoring,
            max_table_cells,
        )
    };

    #[cfg(feature = "parallel")]
    let results: Vec<Result<TokenAlignment, AlignmentError>> = chunks.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<TokenAlignment, AlignmentError>> = chunks.iter().map(run).collect();

    let mut stitched = TokenAlignment::default();
    for (chunk, result) in chunks.iter().zip(results) {
        stitched.append(result?, chunk.recognized.start, chunk.lyric.start);
    }
    Ok(stitched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::dp::AlignStep;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn unit_ranges_follow_owners() {
        let owners = [0, 0, 1, 3, 3, 4];
        let ranges = unit_ranges(&owners, &[0..2, 2..4, 4..5]);
        assert_eq!(ranges, vec![0..3, 3..5, 5..6]);
    }

    #[test]
    fn unit_ranges_handle_unitless_paragraph() {
        let owners = [0, 2];
        let ranges = unit_ranges(&owners, &[0..1, 1..2, 2..3]);
        assert_eq!(ranges, vec![0..1, 1..1, 1..2]);
    }

    fn numbered(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{prefix}{i}")).collect()
    }

    fn evenly_spaced(count: usize) -> Vec<f64> {
        (0..count).map(|i| i as f64).collect()
    }

    fn task<'a>(
        recognized: &'a [String],
        unit_starts: &'a [f64],
        lyric: &'a [String],
        lyric_paragraphs: &'a [Range<usize>],
    ) -> AlignmentTask<'a> {
        AlignmentTask {
            recognized,
            confidences: &[],
            unit_starts,
            lyric,
            lyric_paragraphs,
        }
    }

    #[test]
    fn single_chunk_when_everything_fits() {
        let units = numbered("w", 10);
        let starts = evenly_spaced(10);
        let chunks = plan_chunks(&task(&units, &starts, &units, &[0..5, 5..10]), 1_000);
        assert_eq!(
            chunks,
            vec![Chunk {
                recognized: 0..10,
                lyric: 0..10
            }]
        );
    }

    #[test]
    fn paragraphs_split_where_content_changes() {
        // Each paragraph alone needs (5+1)*(5+1) = 36 cells; two need 121.
        let units = numbered("w", 10);
        let starts = evenly_spaced(10);
        let chunks = plan_chunks(&task(&units, &starts, &units, &[0..5, 5..10]), 40);
        assert_eq!(
            chunks,
            vec![
                Chunk {
                    recognized: 0..5,
                    lyric: 0..5
                },
                Chunk {
                    recognized: 5..10,
                    lyric: 5..10
                },
            ]
        );
    }

    #[test]
    fn leading_filler_stays_with_first_paragraph() {
        let recognized = words("oh oh oh yeah yeah yeah sun is up moon goes down");
        let lyric = words("sun is up moon goes down");
        let starts: Vec<f64> = (0..12).map(|i| i as f64 * 2.0).collect();
        let chunks = plan_chunks(&task(&recognized, &starts, &lyric, &[0..3, 3..6]), 40);
        assert_eq!(
            chunks,
            vec![
                Chunk {
                    recognized: 0..9,
                    lyric: 0..3
                },
                Chunk {
                    recognized: 9..12,
                    lyric: 3..6
                },
            ]
        );
    }

    #[test]
    fn unmatched_boundary_falls_on_widest_pause() {
        let recognized = words("x x x x x x");
        let lyric = words("y y y y");
        let starts = [0.0, 1.0, 9.0, 10.0, 11.0, 12.0];
        let chunks = plan_chunks(&task(&recognized, &starts, &lyric, &[0..2, 2..4]), 20);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].recognized, 0..2);
        assert_eq!(chunks[1].recognized, 2..6);
    }

    #[test]
    fn chunks_cover_both_sequences_contiguously() {
        let recognized = numbered("r", 17);
        let lyric = numbered("l", 12);
        let starts = evenly_spaced(17);
        let paragraphs = [0..3, 3..4, 4..9, 9..12];
        let chunks = plan_chunks(&task(&recognized, &starts, &lyric, &paragraphs), 30);
        assert_eq!(chunks.first().map(|c| c.lyric.start), Some(0));
        assert_eq!(chunks.last().map(|c| c.lyric.end), Some(12));
        assert_eq!(chunks.last().map(|c| c.recognized.end), Some(17));
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].lyric.end, pair[1].lyric.start);
            assert_eq!(pair[0].recognized.end, pair[1].recognized.start);
        }
    }

    #[test]
    fn reject_policy_fails_oversized_task() {
        let recognized = words("a b c d");
        let lyric = words("a b c d");
        let task = AlignmentTask {
            recognized: &recognized,
            confidences: &[0.9; 4],
            unit_starts: &[0.0, 1.0, 2.0, 3.0],
            lyric: &lyric,
            lyric_paragraphs: &[0..2, 2..4],
        };
        let err = align_task(&task, &ScoringConfig::default(), 20, ChunkPolicy::Reject).unwrap_err();
        assert!(err.is_size_limit());
    }

    #[test]
    fn paragraph_policy_stitches_chunks() {
        let recognized = words("a b c d");
        let lyric = words("a b c d");
        let task = AlignmentTask {
            recognized: &recognized,
            confidences: &[0.9; 4],
            unit_starts: &[0.0, 1.0, 2.0, 3.0],
            lyric: &lyric,
            lyric_paragraphs: &[0..2, 2..4],
        };
        let out = align_task(&task, &ScoringConfig::default(), 20, ChunkPolicy::Paragraph).unwrap();
        assert_eq!(out.chunk_count, 2);
        assert_eq!(out.lyric_matches(4), vec![Some(0), Some(1), Some(2), Some(3)]);
        assert!(out.steps.iter().all(|s| matches!(s, AlignStep::Match { .. })));
    }

    #[test]
    fn paragraph_policy_fails_when_one_paragraph_is_too_big() {
        let recognized = words("a b c d");
        let lyric = words("a b c d");
        let task = AlignmentTask {
            recognized: &recognized,
            confidences: &[0.9; 4],
            unit_starts: &[0.0, 1.0, 2.0, 3.0],
            lyric: &lyric,
            lyric_paragraphs: &[0..4],
        };
        let err =
            align_task(&task, &ScoringConfig::default(), 20, ChunkPolicy::Paragraph).unwrap_err();
        assert!(err.is_size_limit());
    }
}
