use serde::{Deserialize, Deserializer, Serialize};

pub mod endpoints;

/// Multipart field carrying the JSON report document.
pub const DATA_FIELD: &str = "data";

/// Multipart field name for the image attached to the violation at `index`.
pub fn image_field_name(index: usize) -> String {
    format!("violation_{index}_image")
}

/// Service address as entered on the report form.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub district: String,
}

impl Address {
    /// Name of the first required field that is still empty.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("line1", &self.line1),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
            ("district", &self.district),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}

/// Candidate address offered while typing.
///
/// Accepts both the district accounts shape (`service_address`, `account_id`)
/// and the legacy autocomplete shape (`address`, `account_number`).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AddressSuggestion {
    #[serde(alias = "address")]
    pub service_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(
        default,
        alias = "account_number",
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_id: Option<String>,
}

impl AddressSuggestion {
    pub fn new(service_address: impl Into<String>) -> Self {
        Self {
            service_address: service_address.into(),
            ..Default::default()
        }
    }
}

/// Response of the legacy autocomplete endpoint, which has shipped both as a
/// bare array and wrapped in `{suggestions: [...]}`.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum AutocompleteResponse {
    List(Vec<AddressSuggestion>),
    Wrapped { suggestions: Vec<AddressSuggestion> },
}

impl AutocompleteResponse {
    pub fn into_suggestions(self) -> Vec<AddressSuggestion> {
        match self {
            Self::List(items) | Self::Wrapped { suggestions: items } => items,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AddressDetails {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

/// One violation as it appears in the `data` JSON part. Images travel as
/// separate multipart fields.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ViolationRecord {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub address: Address,
    pub violations: Vec<ViolationRecord>,
}

/// Body returned by `POST /api/violations`, on success or failure.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ReportResponse {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub report_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

// Ids come back as strings from some deployments and as integer row ids from others.
fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_missing_field_follows_form_order() {
        let address = Address {
            line1: "1 Main".to_string(),
            state: "CO".to_string(),
            zip: "80817".to_string(),
            district: "ventana".to_string(),
            ..Default::default()
        };
        assert_eq!(address.first_missing_field(), Some("city"));

        let complete = Address {
            city: "Fountain".to_string(),
            ..address
        };
        assert_eq!(complete.first_missing_field(), None);
    }

    #[test]
    fn line2_is_never_required() {
        let address = Address {
            line1: "1 Main".to_string(),
            line2: String::new(),
            city: "Fountain".to_string(),
            state: "CO".to_string(),
            zip: "80817".to_string(),
            district: "ventana".to_string(),
        };
        assert_eq!(address.first_missing_field(), None);
    }

    #[test]
    fn suggestion_accepts_legacy_field_names() {
        let raw = r#"{"address":"12 Elm St","account_number":10442,"account_name":"Doe"}"#;
        let parsed: AddressSuggestion = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.service_address, "12 Elm St");
        assert_eq!(parsed.account_id.as_deref(), Some("10442"));
        assert_eq!(parsed.city, None);
    }

    #[test]
    fn autocomplete_accepts_both_shapes() {
        let bare = r#"[{"service_address":"1 Oak"}]"#;
        let wrapped = r#"{"suggestions":[{"address":"1 Oak"},{"address":"2 Oak"}]}"#;

        let bare: AutocompleteResponse = serde_json::from_str(bare).unwrap();
        let wrapped: AutocompleteResponse = serde_json::from_str(wrapped).unwrap();

        assert_eq!(bare.into_suggestions().len(), 1);
        let wrapped = wrapped.into_suggestions();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[1].service_address, "2 Oak");
    }

    #[test]
    fn document_serializes_violation_type_key() {
        let doc = ReportDocument {
            address: Address::default(),
            violations: vec![ViolationRecord {
                id: 3,
                kind: "weeds".to_string(),
                notes: "north fence".to_string(),
            }],
        };
        let value: serde_json::Value = serde_json::from_str(&serialize_json(&doc).unwrap()).unwrap();
        assert_eq!(value["violations"][0]["type"], "weeds");
        assert_eq!(value["violations"][0]["id"], 3);
        assert!(value["violations"][0].get("image").is_none());
        assert_eq!(value["address"]["line2"], "");
    }

    #[test]
    fn report_response_accepts_numeric_id() {
        let parsed: ReportResponse = serde_json::from_str(r#"{"report_id":42}"#).unwrap();
        assert_eq!(parsed.report_id.as_deref(), Some("42"));

        let parsed: ReportResponse = serde_json::from_str(r#"{"error":"bad zip"}"#).unwrap();
        assert_eq!(parsed.report_id, None);
        assert_eq!(parsed.error.as_deref(), Some("bad zip"));
    }

    #[test]
    fn image_fields_are_keyed_by_position() {
        assert_eq!(image_field_name(0), "violation_0_image");
        assert_eq!(image_field_name(7), "violation_7_image");
    }
}
