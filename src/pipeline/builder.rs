use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::pipeline::defaults::{DpSequenceAligner, InterpolatingLineResolver, ScriptAwareNormalizer};
use crate::pipeline::runtime::{LyricAligner, LyricAlignerParts};
use crate::pipeline::traits::{LineResolver, SequenceAligner, TextNormalizer};

pub struct LyricAlignerBuilder {
    config: AlignerConfig,
    normalizer: Option<Box<dyn TextNormalizer>>,
    sequence_aligner: Option<Box<dyn SequenceAligner>>,
    line_resolver: Option<Box<dyn LineResolver>>,
}

impl LyricAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            config,
            normalizer: None,
            sequence_aligner: None,
            line_resolver: None,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn TextNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn with_sequence_aligner(mut self, sequence_aligner: Box<dyn SequenceAligner>) -> Self {
        self.sequence_aligner = Some(sequence_aligner);
        self
    }

    pub fn with_line_resolver(mut self, line_resolver: Box<dyn LineResolver>) -> Self {
        self.line_resolver = Some(line_resolver);
        self
    }

    pub fn build(self) -> Result<LyricAligner, AlignmentError> {
        self.config.validate()?;
        let config = self.config;

        Ok(LyricAligner::from_parts(LyricAlignerParts {
            normalizer: self
                .normalizer
                .unwrap_or_else(|| Box::new(ScriptAwareNormalizer::new(config.script))),
            sequence_aligner: self
                .sequence_aligner
                .unwrap_or_else(|| Box::new(DpSequenceAligner::from_config(&config))),
            line_resolver: self
                .line_resolver
                .unwrap_or_else(|| Box::new(InterpolatingLineResolver::from_config(&config))),
        }))
    }
}
