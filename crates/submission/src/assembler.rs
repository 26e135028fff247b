use crate::payload::{assemble_payload, validate};
use crate::{ReportTransport, SubmissionPayload, TransportResponse, ValidationError, Violation};
use log::{info, warn};
use report_protocol::{Address, ReportResponse};
use std::sync::Arc;

/// Shown when the backend rejects a report without saying why.
pub const GENERIC_SUBMIT_FAILURE: &str = "Failed to submit report";

/// Shown when the backend accepts a report but returns no id for it.
pub const MISSING_REPORT_ID: &str = "Report accepted but no report id was returned";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success { report_id: String },
    ValidationFailure { message: String },
    TransportFailure { message: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Failure text for the form, if this is a failure.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::ValidationFailure { message } | Self::TransportFailure { message } => {
                Some(message.as_str())
            }
        }
    }
}

impl From<ValidationError> for SubmissionOutcome {
    fn from(err: ValidationError) -> Self {
        Self::ValidationFailure {
            message: err.to_string(),
        }
    }
}

/// Validates a report, builds its payload and hands it to the transport.
pub struct SubmissionAssembler {
    transport: Arc<dyn ReportTransport>,
}

impl SubmissionAssembler {
    pub fn new(transport: Arc<dyn ReportTransport>) -> Self {
        Self { transport }
    }

    pub fn validate(
        &self,
        address: &Address,
        violations: &[Violation],
    ) -> Result<(), ValidationError> {
        validate(address, violations)
    }

    pub fn assemble_payload(&self, address: &Address, violations: &[Violation]) -> SubmissionPayload {
        assemble_payload(address, violations)
    }

    /// Send one POST. Never retries.
    pub async fn submit(&self, payload: &SubmissionPayload) -> SubmissionOutcome {
        info!(
            "Submitting report with {} violations and {} images",
            payload.document.violations.len(),
            payload.attachments.len()
        );

        match self.transport.post_report(payload).await {
            Ok(response) => interpret_response(&response),
            Err(err) => {
                warn!("Report submission failed: {err}");
                SubmissionOutcome::TransportFailure {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Validation failures return without touching the network.
    pub async fn validate_and_submit(
        &self,
        address: &Address,
        violations: &[Violation],
    ) -> SubmissionOutcome {
        if let Err(err) = self.validate(address, violations) {
            info!("Report rejected before submission: {err:?}");
            return err.into();
        }
        let payload = self.assemble_payload(address, violations);
        self.submit(&payload).await
    }
}

/// Map the backend reply to an outcome. The body is only read as JSON when
/// the response says it is JSON.
pub fn interpret_response(response: &TransportResponse) -> SubmissionOutcome {
    let body = if response.is_json() && !response.body.is_empty() {
        match serde_json::from_slice::<ReportResponse>(&response.body) {
            Ok(body) => Some(body),
            Err(err) => {
                warn!("Unreadable submission response (HTTP {}): {err}", response.status);
                None
            }
        }
    } else {
        None
    };

    if !response.is_success() {
        let message = body
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_SUBMIT_FAILURE.to_string());
        warn!("Report rejected with HTTP {}: {message}", response.status);
        return SubmissionOutcome::TransportFailure { message };
    }

    match body.and_then(|b| b.report_id) {
        Some(report_id) => {
            info!("Report submitted: {report_id}");
            SubmissionOutcome::Success { report_id }
        }
        None => SubmissionOutcome::TransportFailure {
            message: MISSING_REPORT_ID.to_string(),
        },
    }
}
