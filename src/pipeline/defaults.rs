use crate::alignment::chunking::{align_task, AlignmentTask};
use crate::alignment::dp::TokenAlignment;
use crate::alignment::normalize::normalize_text;
use crate::alignment::resolve::{resolve_lines, LineEvidence, ResolveParams, ResolveReport};
use crate::config::{AlignerConfig, ChunkPolicy, ScoringConfig};
use crate::error::AlignmentError;
use crate::pipeline::traits::{LineResolver, SequenceAligner, TextNormalizer};
use crate::types::{LyricLine, Script};

pub struct ScriptAwareNormalizer {
    script: Script,
}

impl ScriptAwareNormalizer {
    pub fn new(script: Script) -> Self {
        Self { script }
    }
}

impl TextNormalizer for ScriptAwareNormalizer {
    fn normalize(&self, raw: &str) -> String {
        normalize_text(raw, self.script)
    }
}

pub struct DpSequenceAligner {
    scoring: ScoringConfig,
    max_table_cells: usize,
    chunk_policy: ChunkPolicy,
}

impl DpSequenceAligner {
    pub fn new(scoring: ScoringConfig, max_table_cells: usize, chunk_policy: ChunkPolicy) -> Self {
        Self {
            scoring,
            max_table_cells,
            chunk_policy,
        }
    }

    pub fn from_config(config: &AlignerConfig) -> Self {
        Self::new(
            config.scoring.clone(),
            config.max_table_cells,
            config.chunk_policy,
        )
    }
}

impl SequenceAligner for DpSequenceAligner {
    fn align_units(&self, task: &AlignmentTask<'_>) -> Result<TokenAlignment, AlignmentError> {
        align_task(task, &self.scoring, self.max_table_cells, self.chunk_policy)
    }
}

pub struct InterpolatingLineResolver {
    params: ResolveParams,
}

impl InterpolatingLineResolver {
    pub fn new(params: ResolveParams) -> Self {
        Self { params }
    }

    pub fn from_config(config: &AlignerConfig) -> Self {
        Self::new(ResolveParams {
            monotonic_epsilon_s: config.monotonic_epsilon_s,
            default_line_spacing_s: config.default_line_spacing_s,
        })
    }
}

impl LineResolver for InterpolatingLineResolver {
    fn resolve(
        &self,
        lines: &mut [LyricLine],
        evidence: &LineEvidence<'_>,
    ) -> Result<ResolveReport, AlignmentError> {
        resolve_lines(lines, evidence, &self.params)
    }
}
