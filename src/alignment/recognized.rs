use serde::Deserialize;

use crate::error::AlignmentError;
use crate::types::Token;

#[derive(Debug, Deserialize)]
struct RecognizerResult {
    segments: Vec<RecognizerSegment>,
}

#[derive(Debug, Deserialize)]
struct RecognizerSegment {
    #[serde(default)]
    words: Vec<RecognizerWord>,
}

#[derive(Debug, Deserialize)]
struct RecognizerWord {
    word: String,
    start: f64,
    end: f64,
    #[serde(default = "default_probability")]
    probability: f32,
}

fn default_probability() -> f32 {
    1.0
}

/// Flattens a recognizer result of the form
/// `{"segments": [{"words": [{"word", "start", "end", "probability"}]}]}`
/// into tokens, in segment order.
pub fn tokens_from_segments_json(data: &str) -> Result<Vec<Token>, AlignmentError> {
    let result: RecognizerResult = serde_json::from_str(data)
        .map_err(|e| AlignmentError::json("parse recognizer segments", e))?;
    Ok(result
        .segments
        .into_iter()
        .flat_map(|segment| segment.words)
        .map(|w| Token::new(w.word.trim(), w.start, w.end, w.probability))
        .collect())
}
