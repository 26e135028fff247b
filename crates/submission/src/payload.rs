use crate::{Result, ValidationError, Violation, ViolationImage};
use report_protocol::{image_field_name, serialize_json, Address, ReportDocument, ViolationRecord};

/// Binary part of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// Multipart field name, `violation_<index>_image`
    pub field: String,
    pub image: ViolationImage,
}

/// Everything sent in one `POST /api/violations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub document: ReportDocument,
    pub attachments: Vec<ImageAttachment>,
}

impl SubmissionPayload {
    /// JSON text of the `data` field.
    pub fn data_json(&self) -> Result<String> {
        Ok(serialize_json(&self.document)?)
    }
}

/// Check a report before anything is sent. Rules run in order and the first
/// failure wins: address fields, then violation presence, then violation types.
pub fn validate(address: &Address, violations: &[Violation]) -> std::result::Result<(), ValidationError> {
    if let Some(field) = address.first_missing_field() {
        return Err(ValidationError::MissingAddressField { field });
    }

    if violations.is_empty() {
        return Err(ValidationError::NoViolations);
    }

    if let Some(untyped) = violations.iter().find(|v| v.kind.is_empty()) {
        return Err(ValidationError::MissingViolationType { id: untyped.id });
    }

    Ok(())
}

/// Split the report into the JSON document and the per-violation images.
/// Attachments are keyed by list position, not by violation id.
pub fn assemble_payload(address: &Address, violations: &[Violation]) -> SubmissionPayload {
    let records = violations
        .iter()
        .map(|v| ViolationRecord {
            id: v.id,
            kind: v.kind.clone(),
            notes: v.notes.clone(),
        })
        .collect();

    let attachments = violations
        .iter()
        .enumerate()
        .filter_map(|(index, v)| {
            v.image.as_ref().map(|image| ImageAttachment {
                field: image_field_name(index),
                image: image.clone(),
            })
        })
        .collect();

    SubmissionPayload {
        document: ReportDocument {
            address: address.clone(),
            violations: records,
        },
        attachments,
    }
}
