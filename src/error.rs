use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("malformed transcript: {message}")]
    MalformedTranscript { message: String },
    #[error("alignment degenerate: {message}")]
    AlignmentDegenerate { message: String },
    #[error("alignment table of {cells} cells exceeds the limit of {limit}")]
    SizeLimitExceeded { cells: usize, limit: usize },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl AlignmentError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedTranscript {
            message: message.into(),
        }
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        Self::AlignmentDegenerate {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// True for failures that say nothing about the inputs themselves, only
    /// that this job was too large for the configured table bound.
    pub fn is_size_limit(&self) -> bool {
        matches!(self, Self::SizeLimitExceeded { .. })
    }
}
