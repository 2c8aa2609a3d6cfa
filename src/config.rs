use std::path::Path;

use serde::Deserialize;

use crate::error::AlignmentError;
use crate::types::Script;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    /// Script context used by the normalizer for both token streams.
    pub script: Script,
    pub scoring: ScoringConfig,
    /// Upper bound on `(m + 1) * (n + 1)` for a single DP table.
    pub max_table_cells: usize,
    pub chunk_policy: ChunkPolicy,
    /// Minimal step used to keep consecutive line times strictly ordered.
    pub monotonic_epsilon_s: f64,
    /// Inter-line spacing used for extrapolation when only one anchor exists.
    pub default_line_spacing_s: f64,
}

impl AlignerConfig {
    pub const DEFAULT_MAX_TABLE_CELLS: usize = 4_000_000;

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read aligner config", e))?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, AlignmentError> {
        let config: Self = serde_json::from_str(data)
            .map_err(|e| AlignmentError::json("parse aligner config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        if self.max_table_cells == 0 {
            return Err(AlignmentError::invalid_input(
                "max_table_cells must be positive",
            ));
        }
        if !(self.monotonic_epsilon_s.is_finite() && self.monotonic_epsilon_s > 0.0) {
            return Err(AlignmentError::invalid_input(
                "monotonic_epsilon_s must be a positive finite number",
            ));
        }
        if !(self.default_line_spacing_s.is_finite() && self.default_line_spacing_s >= 0.0) {
            return Err(AlignmentError::invalid_input(
                "default_line_spacing_s must be a non-negative finite number",
            ));
        }
        self.scoring.validate()
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            script: Script::default(),
            scoring: ScoringConfig::default(),
            max_table_cells: Self::DEFAULT_MAX_TABLE_CELLS,
            chunk_policy: ChunkPolicy::default(),
            monotonic_epsilon_s: 0.001,
            default_line_spacing_s: 3.0,
        }
    }
}

/// Weights of the DP transitions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub exact_match: f64,
    /// Cost of skipping one unit on either side. Stored as a positive number.
    pub gap_penalty: f64,
    pub low_confidence_threshold: f32,
    pub low_confidence_penalty: f64,
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), AlignmentError> {
        if !(self.gap_penalty.is_finite() && self.gap_penalty > 0.0) {
            return Err(AlignmentError::invalid_input(
                "gap_penalty must be a positive finite number",
            ));
        }
        // A substitution scores at least -1.0; two gaps must stay cheaper
        // than the worst mismatch or bad matches get forced.
        if 2.0 * self.gap_penalty >= 1.0 + self.low_confidence_penalty.max(0.0) {
            return Err(AlignmentError::invalid_input(format!(
                "gap_penalty {} is too large: two gaps must cost less than a full mismatch",
                self.gap_penalty
            )));
        }
        if !(self.exact_match.is_finite() && self.exact_match > 0.0) {
            return Err(AlignmentError::invalid_input(
                "exact_match must be a positive finite number",
            ));
        }
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            return Err(AlignmentError::invalid_input(
                "low_confidence_threshold must lie in [0, 1]",
            ));
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            exact_match: 1.0,
            gap_penalty: 0.35,
            low_confidence_threshold: 0.3,
            low_confidence_penalty: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkPolicy {
    /// Split oversized jobs at blank-line paragraph boundaries.
    #[default]
    Paragraph,
    /// Fail oversized jobs with `SizeLimitExceeded`.
    Reject,
}
