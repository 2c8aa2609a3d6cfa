pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::lrc::{render_lrc, LineVariants};
pub use alignment::recognized::tokens_from_segments_json;
pub use alignment::report::AlignmentSummary;
pub use alignment::time_format::Timestamp;
pub use config::{AlignerConfig, ChunkPolicy, ScoringConfig};
pub use error::AlignmentError;
pub use pipeline::builder::LyricAlignerBuilder;
pub use pipeline::runtime::LyricAligner;
pub use pipeline::traits::{LineResolver, SequenceAligner, TextNormalizer};
pub use types::{
    AlignmentInput, AlignmentOutput, AlignmentWarning, LineRecord, LineStatus, LyricLine,
    RecordStatus, Script, Token,
};
