use strsim::normalized_levenshtein;

use crate::config::ScoringConfig;

/// Score of the worst possible substitution before the confidence penalty.
pub const MISMATCH_FLOOR: f64 = -1.0;

/// Reward for aligning lyric unit `lyric` with recognized unit `recognized`.
///
/// Exact matches earn `exact_match`; anything else maps normalized edit
/// similarity in [0, 1] onto [-1, 1). Empty units never match.
pub fn substitution_score(
    lyric: &str,
    recognized: &str,
    confidence: f32,
    scoring: &ScoringConfig,
) -> f64 {
    let base = if lyric.is_empty() || recognized.is_empty() {
        MISMATCH_FLOOR
    } else if lyric == recognized {
        scoring.exact_match
    } else {
        2.0 * normalized_levenshtein(lyric, recognized) - 1.0
    };
    if confidence < scoring.low_confidence_threshold {
        base - scoring.low_confidence_penalty
    } else {
        base
    }
}
