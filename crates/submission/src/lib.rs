//! # Report Submission
//!
//! Violation entries, client-side validation and the multipart submission of
//! a violation report.
//!
//! ## Pipeline
//!
//! ```text
//! AddressResolutionController ──┐
//!                               ├──> validate ──> assemble_payload ──> ReportTransport
//! ViolationListController ──────┘      │                │                    │
//!                                      │                ├─> data (JSON)      │
//!                                      │                └─> violation_<i>_image
//!                                      ▼                                     ▼
//!                               ValidationFailure              Success / TransportFailure
//! ```

mod assembler;
mod catalog;
mod error;
mod form;
mod payload;
mod transport;
mod violations;

pub use assembler::{
    interpret_response, SubmissionAssembler, SubmissionOutcome, GENERIC_SUBMIT_FAILURE,
    MISSING_REPORT_ID,
};
pub use catalog::{ViolationType, ViolationTypeCatalog, VIOLATION_TYPE_PLACEHOLDER_LABEL};
pub use error::{Result, SubmissionError, ValidationError};
pub use form::{FormStatus, ReportForm};
pub use payload::{assemble_payload, validate, ImageAttachment, SubmissionPayload};
pub use transport::{ReportTransport, TransportResponse};
pub use violations::{Violation, ViolationImage, ViolationListController, ViolationPatch};
