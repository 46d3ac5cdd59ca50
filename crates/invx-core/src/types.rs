//! Wire types shared by the server, the CLI and the extraction client.
//!
//! Field names follow the camelCase JSON produced by the extraction API and
//! consumed by the front-end, so every struct renames its fields accordingly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Value format reported by the extraction API for a single field.
///
/// Formats the API may add later are kept verbatim in [`FieldFormat::Other`]
/// instead of failing the whole invoice. A `null` format reads as `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum FieldFormat {
    Text,
    Number,
    Date,
    Currency,
    Other(String),
}

impl Default for FieldFormat {
    fn default() -> Self {
        FieldFormat::Text
    }
}

impl From<String> for FieldFormat {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Text" => FieldFormat::Text,
            "Number" => FieldFormat::Number,
            "Date" => FieldFormat::Date,
            "Currency" => FieldFormat::Currency,
            _ => FieldFormat::Other(raw),
        }
    }
}

impl From<Option<String>> for FieldFormat {
    fn from(raw: Option<String>) -> Self {
        raw.map(FieldFormat::from).unwrap_or_default()
    }
}

impl From<FieldFormat> for String {
    fn from(format: FieldFormat) -> Self {
        format.to_string()
    }
}

impl std::fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldFormat::Text => write!(f, "Text"),
            FieldFormat::Number => write!(f, "Number"),
            FieldFormat::Date => write!(f, "Date"),
            FieldFormat::Currency => write!(f, "Currency"),
            FieldFormat::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// The extraction API's confidence label for a field value.
///
/// Unrecognised labels are preserved in [`ValidationState::Other`]; a missing
/// or `null` label deserializes as `Other("")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ValidationState {
    Valid,
    VerificationNeeded,
    Undefined,
    Other(String),
}

impl Default for ValidationState {
    fn default() -> Self {
        ValidationState::Other(String::new())
    }
}

impl From<String> for ValidationState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Valid" => ValidationState::Valid,
            "VerificationNeeded" => ValidationState::VerificationNeeded,
            "Undefined" => ValidationState::Undefined,
            _ => ValidationState::Other(raw),
        }
    }
}

impl From<Option<String>> for ValidationState {
    fn from(raw: Option<String>) -> Self {
        raw.map(ValidationState::from).unwrap_or_default()
    }
}

impl From<ValidationState> for String {
    fn from(state: ValidationState) -> Self {
        state.to_string()
    }
}

impl std::fmt::Display for ValidationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationState::Valid => write!(f, "Valid"),
            ValidationState::VerificationNeeded => write!(f, "VerificationNeeded"),
            ValidationState::Undefined => write!(f, "Undefined"),
            ValidationState::Other(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
    #[serde(default)]
    pub format: FieldFormat,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One key/value pair extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedField {
    pub field_name: String,
    #[serde(default)]
    pub value: Option<FieldValue>,
    #[serde(default)]
    pub validation_state: ValidationState,
}

impl ExtractedField {
    /// Raw value text, or `""` when the API sent no value object.
    #[must_use]
    pub fn raw_value(&self) -> &str {
        self.value.as_ref().map_or("", |v| v.value.as_str())
    }

    /// `true` when the value is present and not only whitespace.
    #[must_use]
    pub fn has_value(&self) -> bool {
        !self.raw_value().trim().is_empty()
    }
}

/// Body returned by the extraction API for one processed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocumentResponse {
    #[serde(default)]
    pub detected_template: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<ExtractedField>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Processing,
    #[serde(alias = "success")]
    Completed,
    Failed,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Processing => write!(f, "processing"),
            InvoiceStatus::Completed => write!(f, "completed"),
            InvoiceStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of processing one invoice file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResult {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub amount: String,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub detected_template: Option<String>,
    /// `None` when the invoice never produced a field list (typically failures).
    #[serde(default)]
    pub fields: Option<Vec<ExtractedField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InvoiceResult {
    #[must_use]
    pub fn fields(&self) -> &[ExtractedField] {
        self.fields.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == InvoiceStatus::Failed
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == InvoiceStatus::Completed
    }
}

/// Collection-level counters derived from a set of [`InvoiceResult`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub collection_id: String,
    pub total_invoices: usize,
    pub successful_invoices: usize,
    pub failed_invoices: usize,
    pub total_fields: usize,
    pub valid_fields: usize,
    pub verification_needed_fields: usize,
    pub missing_fields: usize,
    pub overall_status: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /api/process-invoices` and of the downloaded results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub success: bool,
    pub summary: ProcessingSummary,
    #[serde(default)]
    pub invoices: Vec<InvoiceResult>,
}

/// Listing entry for one invoice PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceMetadata {
    pub id: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    pub status: String,
    /// File size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}
