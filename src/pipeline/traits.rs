use crate::alignment::chunking::AlignmentTask;
use crate::alignment::dp::TokenAlignment;
use crate::alignment::normalize::segment;
use crate::alignment::resolve::{LineEvidence, ResolveReport};
use crate::error::AlignmentError;
use crate::types::LyricLine;

pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> String;

    fn units(&self, raw: &str) -> Vec<String> {
        segment(&self.normalize(raw))
    }
}

pub trait SequenceAligner: Send + Sync {
    fn align_units(&self, task: &AlignmentTask<'_>) -> Result<TokenAlignment, AlignmentError>;
}

pub trait LineResolver: Send + Sync {
    fn resolve(
        &self,
        lines: &mut [LyricLine],
        evidence: &LineEvidence<'_>,
    ) -> Result<ResolveReport, AlignmentError>;
}
