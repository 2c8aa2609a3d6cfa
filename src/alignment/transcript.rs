use std::ops::Range;

use crate::error::AlignmentError;
use crate::pipeline::traits::TextNormalizer;
use crate::types::{LyricLine, UnitSequence};

#[derive(Debug, Clone)]
pub struct ParsedTranscript {
    /// Every transcript line, blank ones included, as written.
    pub raw_lines: Vec<String>,
    /// Non-blank lines in order. A "line slot" is an index into this vector.
    pub lines: Vec<LyricLine>,
    /// Lyric units; owners are line slots.
    pub units: UnitSequence,
    /// Blank-line separated blocks, as ranges of line slots.
    pub paragraphs: Vec<Range<usize>>,
}

pub fn parse_transcript(
    transcript: &str,
    normalizer: &dyn TextNormalizer,
) -> Result<ParsedTranscript, AlignmentError> {
    let unified = transcript.replace("\r\n", "\n").replace('\r', "\n");
    let raw_lines: Vec<String> = unified.lines().map(str::to_string).collect();

    let mut lines = Vec::new();
    let mut units = UnitSequence::default();
    let mut paragraphs = Vec::new();
    let mut paragraph_start: Option<usize> = None;

    for (index, raw) in raw_lines.iter().enumerate() {
        if raw.trim().is_empty() {
            if let Some(start) = paragraph_start.take() {
                paragraphs.push(start..lines.len());
            }
            continue;
        }

        let slot = lines.len();
        paragraph_start.get_or_insert(slot);
        let normalized_tokens = normalizer.units(raw);
        for unit in &normalized_tokens {
            units.push(unit.clone(), slot);
        }
        lines.push(LyricLine::new(index, raw.trim(), normalized_tokens));
    }
    if let Some(start) = paragraph_start {
        paragraphs.push(start..lines.len());
    }

    if lines.is_empty() {
        return Err(AlignmentError::malformed(
            "transcript has no non-blank lines",
        ));
    }

    tracing::debug!(
        total_lines = raw_lines.len(),
        lyric_lines = lines.len(),
        lyric_units = units.len(),
        paragraphs = paragraphs.len(),
        "transcript: parsed"
    );

    Ok(ParsedTranscript {
        raw_lines,
        lines,
        units,
        paragraphs,
    })
}
