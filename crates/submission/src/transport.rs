use crate::{Result, SubmissionPayload};
use async_trait::async_trait;

/// Raw HTTP reply to a report submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

/// Delivers an assembled report to the backend. One call is one POST.
#[async_trait]
pub trait ReportTransport: Send + Sync {
    async fn post_report(&self, payload: &SubmissionPayload) -> Result<TransportResponse>;
}
