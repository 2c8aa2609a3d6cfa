use crate::alignment::similarity::substitution_score;
use crate::config::ScoringConfig;
use crate::error::AlignmentError;

/// Scores closer than this are treated as equal so tie-breaks stay stable
/// under floating point summation order.
const SCORE_TIE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Step {
    Match,
    SkipRecognized,
    SkipLyric,
    End,
}

/// One move of the recovered alignment path. Indices are unit positions in
/// the recognized and lyric sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignStep {
    Match {
        recognized: usize,
        lyric: usize,
        score: f64,
    },
    SkipRecognized(usize),
    SkipLyric(usize),
}

impl AlignStep {
    fn offset(self, recognized_base: usize, lyric_base: usize) -> Self {
        match self {
            Self::Match {
                recognized,
                lyric,
                score,
            } => Self::Match {
                recognized: recognized + recognized_base,
                lyric: lyric + lyric_base,
                score,
            },
            Self::SkipRecognized(r) => Self::SkipRecognized(r + recognized_base),
            Self::SkipLyric(l) => Self::SkipLyric(l + lyric_base),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenAlignment {
    pub steps: Vec<AlignStep>,
    pub score: f64,
    /// Number of independently aligned chunks this path was stitched from.
    pub chunk_count: usize,
}

impl TokenAlignment {
    /// For each lyric unit, the recognized unit it was matched to.
    pub fn lyric_matches(&self, lyric_len: usize) -> Vec<Option<usize>> {
        let mut matches = vec![None; lyric_len];
        for step in &self.steps {
            if let AlignStep::Match {
                recognized, lyric, ..
            } = *step
            {
                if let Some(slot) = matches.get_mut(lyric) {
                    *slot = Some(recognized);
                }
            }
        }
        matches
    }

    pub fn match_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AlignStep::Match { .. }))
            .count()
    }

    pub(crate) fn append(&mut self, other: TokenAlignment, recognized_base: usize, lyric_base: usize) {
        self.steps.extend(
            other
                .steps
                .into_iter()
                .map(|s| s.offset(recognized_base, lyric_base)),
        );
        self.score += other.score;
        self.chunk_count += other.chunk_count;
    }
}

/// The (m+1)×(n+1) score table and step arena for one alignment job.
///
/// Cell `(i, j)` holds the best score for aligning the recognized suffix
/// `i..m` with the lyric suffix `j..n`. The fill runs from `(m, n)` back to
/// `(0, 0)`; the traceback then walks forward from `(0, 0)` and always takes
/// a match when it is among the best moves, so each lyric unit lands on the
/// earliest recognized unit that keeps the total optimal.
pub struct AlignmentPlan {
    rows: usize,
    cols: usize,
    scores: Vec<f64>,
    steps: Vec<Step>,
}

impl AlignmentPlan {
    pub fn cell_count(recognized_len: usize, lyric_len: usize) -> usize {
        (recognized_len + 1).saturating_mul(lyric_len + 1)
    }

    pub fn fill(
        recognized: &[String],
        confidences: &[f32],
        lyric: &[String],
        scoring: &ScoringConfig,
    ) -> Self {
        debug_assert_eq!(recognized.len(), confidences.len());
        let m = recognized.len();
        let n = lyric.len();
        let rows = m + 1;
        let cols = n + 1;
        let gap = scoring.gap_penalty;

        let mut scores = vec![0.0f64; rows * cols];
        let mut steps = vec![Step::End; rows * cols];

        for j in (0..n).rev() {
            let idx = m * cols + j;
            scores[idx] = scores[idx + 1] - gap;
            steps[idx] = Step::SkipLyric;
        }

        for i in (0..m).rev() {
            let row = i * cols;
            let next_row = row + cols;
            scores[row + n] = scores[next_row + n] - gap;
            steps[row + n] = Step::SkipRecognized;

            for j in (0..n).rev() {
                let matched = scores[next_row + j + 1]
                    + substitution_score(&lyric[j], &recognized[i], confidences[i], scoring);
                let skip_recognized = scores[next_row + j] - gap;
                let skip_lyric = scores[row + j + 1] - gap;

                let mut best = matched;
                let mut step = Step::Match;
                if skip_recognized > best + SCORE_TIE_EPS {
                    best = skip_recognized;
                    step = Step::SkipRecognized;
                }
                if skip_lyric > best + SCORE_TIE_EPS {
                    best = skip_lyric;
                    step = Step::SkipLyric;
                }
                scores[row + j] = best;
                steps[row + j] = step;
            }
        }

        Self {
            rows,
            cols,
            scores,
            steps,
        }
    }

    pub fn best_score(&self) -> f64 {
        self.scores[0]
    }

    /// Iterative traceback from `(0, 0)` to `(m, n)`.
    pub fn traceback(
        &self,
        recognized: &[String],
        confidences: &[f32],
        lyric: &[String],
        scoring: &ScoringConfig,
    ) -> Vec<AlignStep> {
        let m = self.rows - 1;
        let n = self.cols - 1;
        let mut path = Vec::with_capacity(m + n);
        let (mut i, mut j) = (0usize, 0usize);
        while i < m || j < n {
            match self.steps[i * self.cols + j] {
                Step::Match => {
                    let score =
                        substitution_score(&lyric[j], &recognized[i], confidences[i], scoring);
                    path.push(AlignStep::Match {
                        recognized: i,
                        lyric: j,
                        score,
                    });
                    i += 1;
                    j += 1;
                }
                Step::SkipRecognized => {
                    path.push(AlignStep::SkipRecognized(i));
                    i += 1;
                }
                Step::SkipLyric => {
                    path.push(AlignStep::SkipLyric(j));
                    j += 1;
                }
                // Only (m, n) carries the end marker, and the loop stops there.
                Step::End => break,
            }
        }
        path
    }
}

pub fn check_table_size(
    recognized_len: usize,
    lyric_len: usize,
    limit: usize,
) -> Result<(), AlignmentError> {
    let cells = AlignmentPlan::cell_count(recognized_len, lyric_len);
    if cells > limit {
        return Err(AlignmentError::SizeLimitExceeded { cells, limit });
    }
    Ok(())
}

/// Global alignment of one recognized/lyric unit pair within the size bound.
/// The plan is dropped before returning.
pub fn global_align(
    recognized: &[String],
    confidences: &[f32],
    lyric: &[String],
    scoring: &ScoringConfig,
    max_table_cells: usize,
) -> Result<TokenAlignment, AlignmentError> {
    check_table_size(recognized.len(), lyric.len(), max_table_cells)?;
    let plan = AlignmentPlan::fill(recognized, confidences, lyric, scoring);
    let steps = plan.traceback(recognized, confidences, lyric, scoring);
    tracing::debug!(
        recognized_units = recognized.len(),
        lyric_units = lyric.len(),
        score = format!("{:.3}", plan.best_score()),
        "dp: aligned"
    );
    Ok(TokenAlignment {
        steps,
        score: plan.best_score(),
        chunk_count: 1,
    })
}
