use thiserror::Error;

pub type Result<T> = std::result::Result<T, SubmissionError>;

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Reasons a report is rejected before it reaches the network. The display
/// text is what the form shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing address field")]
    MissingAddressField { field: &'static str },

    #[error("at least one violation required")]
    NoViolations,

    #[error("violation type required")]
    MissingViolationType { id: u32 },
}
