use serde::Serialize;

use crate::alignment::dp::{AlignStep, TokenAlignment};
use crate::alignment::resolve::ResolveReport;
use crate::types::{LineStatus, LyricLine};

/// Per-job alignment quality figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentSummary {
    pub transcript_lines: usize,
    pub blank_lines: usize,
    pub matched_lines: usize,
    pub interpolated_lines: usize,
    /// Lines whose time was lifted to keep the output strictly ordered.
    pub raised_lines: usize,
    pub recognized_tokens: usize,
    pub recognized_units: usize,
    pub lyric_units: usize,
    pub matched_units: usize,
    pub skipped_recognized_units: usize,
    pub skipped_lyric_units: usize,
    /// Mean substitution score over matched units.
    pub mean_match_score: Option<f64>,
    pub alignment_score: f64,
    pub chunk_count: usize,
}

impl AlignmentSummary {
    pub fn build(
        transcript_lines: usize,
        lines: &[LyricLine],
        recognized_tokens: usize,
        recognized_units: usize,
        lyric_units: usize,
        alignment: &TokenAlignment,
        resolve: &ResolveReport,
    ) -> Self {
        let mut summary = Self {
            transcript_lines,
            blank_lines: transcript_lines.saturating_sub(lines.len()),
            matched_lines: count_status(lines, LineStatus::Matched),
            interpolated_lines: count_status(lines, LineStatus::Interpolated),
            raised_lines: resolve.raised_lines,
            recognized_tokens,
            recognized_units,
            lyric_units,
            alignment_score: alignment.score,
            chunk_count: alignment.chunk_count,
            ..Self::default()
        };

        let mut score_sum = 0.0f64;
        for step in &alignment.steps {
            match step {
                AlignStep::Match { score, .. } => {
                    summary.matched_units += 1;
                    score_sum += score;
                }
                AlignStep::SkipRecognized(_) => summary.skipped_recognized_units += 1,
                AlignStep::SkipLyric(_) => summary.skipped_lyric_units += 1,
            }
        }
        if summary.matched_units > 0 {
            summary.mean_match_score = Some(score_sum / summary.matched_units as f64);
        }
        summary
    }

    /// Share of non-blank lines that were matched directly.
    pub fn line_coverage(&self) -> f64 {
        let total = self.matched_lines + self.interpolated_lines;
        if total == 0 {
            return 0.0;
        }
        self.matched_lines as f64 / total as f64
    }
}

fn count_status(lines: &[LyricLine], status: LineStatus) -> usize {
    lines.iter().filter(|l| l.status == status).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(index: usize, status: LineStatus) -> LyricLine {
        let mut l = LyricLine::new(index, "x", vec!["x".to_string()]);
        l.status = status;
        l.assigned_start_time = Some(index as f64);
        l
    }

    #[test]
    fn counts_steps_and_statuses() {
        let lines = vec![
            line(0, LineStatus::Matched),
            line(2, LineStatus::Interpolated),
            line(3, LineStatus::Matched),
        ];
        let alignment = TokenAlignment {
            steps: vec![
                AlignStep::Match {
                    recognized: 0,
                    lyric: 0,
                    score: 1.0,
                },
                AlignStep::SkipRecognized(1),
                AlignStep::SkipLyric(1),
                AlignStep::Match {
                    recognized: 2,
                    lyric: 2,
                    score: 0.5,
                },
            ],
            score: 0.8,
            chunk_count: 1,
        };
        let resolve = ResolveReport {
            matched_lines: 2,
            interpolated_lines: vec![2],
            raised_lines: 0,
        };
        let summary = AlignmentSummary::build(4, &lines, 3, 3, 3, &alignment, &resolve);
        assert_eq!(summary.blank_lines, 1);
        assert_eq!(summary.matched_lines, 2);
        assert_eq!(summary.interpolated_lines, 1);
        assert_eq!(summary.matched_units, 2);
        assert_eq!(summary.skipped_recognized_units, 1);
        assert_eq!(summary.skipped_lyric_units, 1);
        assert_eq!(summary.mean_match_score, Some(0.75));
        assert!((summary.line_coverage() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_summary_has_zero_coverage() {
        assert_eq!(AlignmentSummary::default().line_coverage(), 0.0);
    }
}
