#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::alignment::chunking::{unit_ranges, AlignmentTask};
use crate::alignment::report::AlignmentSummary;
use crate::alignment::resolve::LineEvidence;
use crate::alignment::time_format::Timestamp;
use crate::alignment::transcript::parse_transcript;
use crate::error::AlignmentError;
use crate::pipeline::traits::{LineResolver, SequenceAligner, TextNormalizer};
use crate::types::{
    AlignmentInput, AlignmentOutput, AlignmentWarning, LineRecord, LineStatus, LyricLine,
    RecordStatus, Token, UnitSequence,
};

/// Runs alignment jobs. Holds no per-job state, so one instance can serve
/// many jobs concurrently.
pub struct LyricAligner {
    normalizer: Box<dyn TextNormalizer>,
    sequence_aligner: Box<dyn SequenceAligner>,
    line_resolver: Box<dyn LineResolver>,
}

pub(crate) struct LyricAlignerParts {
    pub normalizer: Box<dyn TextNormalizer>,
    pub sequence_aligner: Box<dyn SequenceAligner>,
    pub line_resolver: Box<dyn LineResolver>,
}

impl LyricAligner {
    pub(crate) fn from_parts(parts: LyricAlignerParts) -> Self {
        Self {
            normalizer: parts.normalizer,
            sequence_aligner: parts.sequence_aligner,
            line_resolver: parts.line_resolver,
        }
    }

    pub fn align(&self, input: &AlignmentInput) -> Result<AlignmentOutput, AlignmentError> {
        validate_tokens(&input.tokens)?;
        let parsed = parse_transcript(&input.transcript, self.normalizer.as_ref())?;

        if input.tokens.is_empty() {
            return Err(AlignmentError::degenerate("recognizer produced no tokens"));
        }
        let (tokens, recognized, confidences) = self.prepare_tokens(&input.tokens);
        if recognized.is_empty() {
            return Err(AlignmentError::degenerate(format!(
                "none of {} recognized tokens has comparable text",
                tokens.len()
            )));
        }

        let lyric_paragraphs = unit_ranges(&parsed.units.owners, &parsed.paragraphs);
        let unit_starts: Vec<f64> = recognized
            .owners
            .iter()
            .map(|&owner| tokens[owner].start_time)
            .collect();
        let task = AlignmentTask {
            recognized: &recognized.units,
            confidences: &confidences,
            unit_starts: &unit_starts,
            lyric: &parsed.units.units,
            lyric_paragraphs: &lyric_paragraphs,
        };
        let alignment = self.sequence_aligner.align_units(&task)?;
        let lyric_matches = alignment.lyric_matches(parsed.units.len());

        let mut lines = parsed.lines;
        let evidence = LineEvidence {
            tokens: &tokens,
            recognized_owners: &recognized.owners,
            lyric_owners: &parsed.units.owners,
            lyric_matches: &lyric_matches,
        };
        let resolve = self.line_resolver.resolve(&mut lines, &evidence)?;

        let records = build_records(&parsed.raw_lines, &lines)?;
        let mut warnings = Vec::new();
        if !resolve.interpolated_lines.is_empty() {
            warnings.push(AlignmentWarning::PartialMatch {
                interpolated_lines: resolve.interpolated_lines.clone(),
            });
        }
        let summary = AlignmentSummary::build(
            parsed.raw_lines.len(),
            &lines,
            tokens.len(),
            recognized.len(),
            parsed.units.len(),
            &alignment,
            &resolve,
        );
        tracing::info!(
            lines = lines.len(),
            matched = summary.matched_lines,
            interpolated = summary.interpolated_lines,
            matched_units = summary.matched_units,
            chunks = summary.chunk_count,
            "aligner: job complete"
        );

        Ok(AlignmentOutput {
            lines,
            records,
            warnings,
            summary,
        })
    }

    /// Aligns independent jobs, concurrently when the `parallel` feature is
    /// enabled. Results keep the order of `inputs`.
    pub fn align_batch(
        &self,
        inputs: &[AlignmentInput],
    ) -> Vec<Result<AlignmentOutput, AlignmentError>> {
        #[cfg(feature = "parallel")]
        let results = inputs.par_iter().map(|input| self.align(input)).collect();
        #[cfg(not(feature = "parallel"))]
        let results = inputs.iter().map(|input| self.align(input)).collect();
        results
    }

    /// Copies the tokens with `normalized_text` filled in and flattens them
    /// into recognized units plus the confidence of each unit's token.
    fn prepare_tokens(&self, input: &[Token]) -> (Vec<Token>, UnitSequence, Vec<f32>) {
        let mut tokens = input.to_vec();
        let mut recognized = UnitSequence::default();
        let mut confidences = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter_mut().enumerate() {
            token.normalized_text = self.normalizer.normalize(&token.text);
            for unit in self.normalizer.units(&token.text) {
                recognized.push(unit, index);
                confidences.push(token.confidence);
            }
        }
        tracing::debug!(
            tokens = tokens.len(),
            recognized_units = recognized.len(),
            "aligner: recognized tokens normalized"
        );
        (tokens, recognized, confidences)
    }
}

fn validate_tokens(tokens: &[Token]) -> Result<(), AlignmentError> {
    let mut prev_start = 0.0f64;
    for (i, t) in tokens.iter().enumerate() {
        if !(t.start_time.is_finite() && t.start_time >= 0.0) {
            return Err(AlignmentError::invalid_input(format!(
                "token {i} ({:?}) has invalid start_time {}",
                t.text, t.start_time
            )));
        }
        if !(t.end_time.is_finite() && t.end_time >= t.start_time) {
            return Err(AlignmentError::invalid_input(format!(
                "token {i} ({:?}) ends at {} before it starts at {}",
                t.text, t.end_time, t.start_time
            )));
        }
        if !(0.0..=1.0).contains(&t.confidence) {
            return Err(AlignmentError::invalid_input(format!(
                "token {i} ({:?}) has confidence {} outside [0, 1]",
                t.text, t.confidence
            )));
        }
        if t.start_time < prev_start {
            return Err(AlignmentError::invalid_input(format!(
                "token {i} ({:?}) starts at {} before the previous token at {}",
                t.text, t.start_time, prev_start
            )));
        }
        prev_start = t.start_time;
    }
    Ok(())
}

/// One record per transcript line; blank lines become `Skip` records.
fn build_records(raw_lines: &[String], lines: &[LyricLine]) -> Result<Vec<LineRecord>, AlignmentError> {
    let mut records = Vec::with_capacity(raw_lines.len());
    let mut resolved = lines.iter().peekable();
    for (index, raw) in raw_lines.iter().enumerate() {
        let Some(line) = resolved.next_if(|l| l.index == index) else {
            records.push(LineRecord::skip(index, raw.as_str()));
            continue;
        };
        let status = match line.status {
            LineStatus::Matched => RecordStatus::Matched,
            LineStatus::Interpolated => RecordStatus::Interpolated,
            LineStatus::Unresolved => {
                return Err(AlignmentError::degenerate(format!(
                    "line {index} was left without a time"
                )))
            }
        };
        let Some(start) = line.assigned_start_time else {
            return Err(AlignmentError::degenerate(format!(
                "line {index} was left without a time"
            )));
        };
        records.push(LineRecord::timed(
            index,
            line.raw_text.as_str(),
            Timestamp::from_seconds(start),
            status,
        ));
    }
    Ok(records)
}
