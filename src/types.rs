use serde::{Deserialize, Serialize};

use crate::alignment::report::AlignmentSummary;
use crate::alignment::time_format::Timestamp;
use crate::error::AlignmentError;

/// Script context for normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    #[default]
    Generic,
    /// Kana folding and romaji syllable canonicalization.
    Japanese,
}

/// One recognized word as delivered by the external recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Filled by the pipeline's normalizer; any incoming value is overwritten.
    #[serde(default)]
    pub normalized_text: String,
    /// Seconds from the start of the audio.
    pub start_time: f64,
    pub end_time: f64,
    /// Recognizer confidence in [0, 1].
    pub confidence: f32,
}

impl Token {
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64, confidence: f32) -> Self {
        Self {
            text: text.into(),
            normalized_text: String::new(),
            start_time,
            end_time,
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Matched,
    Interpolated,
    Unresolved,
}

/// A non-blank transcript line and its resolved timing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LyricLine {
    /// Position in the transcript, blank lines included.
    pub index: usize,
    pub raw_text: String,
    pub normalized_tokens: Vec<String>,
    pub assigned_start_time: Option<f64>,
    /// End of the last recognized token matched to this line. `Matched` only.
    pub assigned_end_time: Option<f64>,
    pub status: LineStatus,
}

impl LyricLine {
    pub fn new(index: usize, raw_text: impl Into<String>, normalized_tokens: Vec<String>) -> Self {
        Self {
            index,
            raw_text: raw_text.into(),
            normalized_tokens,
            assigned_start_time: None,
            assigned_end_time: None,
            status: LineStatus::Unresolved,
        }
    }

    /// Character count used to weight interpolation; never zero.
    pub(crate) fn weight(&self) -> f64 {
        self.raw_text.trim().chars().count().max(1) as f64
    }
}

/// Flattened comparison units with the index of the item that owns each one
/// (a line slot for lyric units, a token index for recognized units).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitSequence {
    pub units: Vec<String>,
    pub owners: Vec<usize>,
}

impl UnitSequence {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub(crate) fn push(&mut self, unit: String, owner: usize) {
        self.units.push(unit);
        self.owners.push(owner);
    }
}

#[derive(Debug, Clone)]
pub struct AlignmentInput {
    pub tokens: Vec<Token>,
    pub transcript: String,
}

impl AlignmentInput {
    pub fn new(tokens: Vec<Token>, transcript: impl Into<String>) -> Self {
        Self {
            tokens,
            transcript: transcript.into(),
        }
    }

    /// Accepts a transcript as raw bytes; anything that is not UTF-8 is a
    /// malformed transcript.
    pub fn from_utf8(tokens: Vec<Token>, transcript: Vec<u8>) -> Result<Self, AlignmentError> {
        let transcript = String::from_utf8(transcript).map_err(|e| {
            AlignmentError::malformed(format!(
                "transcript is not valid UTF-8 at byte {}",
                e.utf8_error().valid_up_to()
            ))
        })?;
        Ok(Self { tokens, transcript })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Matched,
    Interpolated,
    /// Blank transcript line (instrumental gap); carries no timestamp.
    Skip,
}

/// The hand-off record for one transcript line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineRecord {
    pub line_index: usize,
    pub line_text: String,
    pub minutes: Option<String>,
    pub seconds: Option<String>,
    pub milliseconds: Option<String>,
    pub status: RecordStatus,
    #[serde(skip)]
    pub timestamp: Option<Timestamp>,
}

impl LineRecord {
    pub(crate) fn skip(line_index: usize, line_text: impl Into<String>) -> Self {
        Self {
            line_index,
            line_text: line_text.into(),
            minutes: None,
            seconds: None,
            milliseconds: None,
            status: RecordStatus::Skip,
            timestamp: None,
        }
    }

    pub(crate) fn timed(
        line_index: usize,
        line_text: impl Into<String>,
        timestamp: Timestamp,
        status: RecordStatus,
    ) -> Self {
        Self {
            line_index,
            line_text: line_text.into(),
            minutes: Some(timestamp.minutes_field()),
            seconds: Some(timestamp.seconds_field()),
            milliseconds: Some(timestamp.milliseconds_field()),
            status,
            timestamp: Some(timestamp),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentWarning {
    /// Lines whose time was interpolated rather than matched, by transcript index.
    PartialMatch { interpolated_lines: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentOutput {
    /// One entry per non-blank line, in transcript order.
    pub lines: Vec<LyricLine>,
    /// One entry per transcript line, blank lines included.
    pub records: Vec<LineRecord>,
    pub warnings: Vec<AlignmentWarning>,
    pub summary: AlignmentSummary,
}

impl AlignmentOutput {
    pub fn is_partial_match(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, AlignmentWarning::PartialMatch { .. }))
    }
}
