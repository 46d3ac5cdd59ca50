//! Executive summary for a processed collection.

use serde::Serialize;

use crate::types::{InvoiceResult, ProcessingResult, ValidationState};
use crate::validation::FieldCounts;

/// Field names every invoice is expected to carry, matched exactly.
pub const CRITICAL_FIELDS: [&str; 4] = ["vendorName", "invoiceNumber", "totalAmount", "invoiceDate"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallStatus {
    #[serde(rename = "Valid")]
    Valid,
    #[serde(rename = "Valid - Some Review Required")]
    ReviewRequired,
    #[serde(rename = "Invalid")]
    Invalid,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Valid => write!(f, "Valid"),
            OverallStatus::ReviewRequired => write!(f, "Valid - Some Review Required"),
            OverallStatus::Invalid => write!(f, "Invalid"),
        }
    }
}

impl OverallStatus {
    /// Failures and missing data make a collection invalid; otherwise any
    /// field awaiting verification downgrades it to review-required.
    #[must_use]
    pub fn decide(has_failed_invoices: bool, counts: &FieldCounts) -> Self {
        if has_failed_invoices || counts.missing > 0 {
            OverallStatus::Invalid
        } else if counts.needs_review > 0 {
            OverallStatus::ReviewRequired
        } else {
            OverallStatus::Valid
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub is_valid: bool,
    pub status: OverallStatus,
    /// Human-readable explanations, most severe first.
    pub missing_data: Vec<String>,
    pub recommendation: String,
}

/// Derives the overall status, explanations and recommendation.
///
/// Failures come from the invoice list; field counts come from the summary
/// carried in `result`, which the server computes with the same classifier.
#[must_use]
pub fn generate_executive_summary(result: &ProcessingResult) -> ExecutiveSummary {
    let failed: Vec<&InvoiceResult> = result.invoices.iter().filter(|i| i.is_failed()).collect();
    let counts = FieldCounts {
        valid: result.summary.valid_fields,
        needs_review: result.summary.verification_needed_fields,
        missing: result.summary.missing_fields,
    };
    let status = OverallStatus::decide(!failed.is_empty(), &counts);

    let mut missing_data = Vec::new();

    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|i| i.file_name.as_str()).collect();
        missing_data.push(format!(
            "{} failed to process: {}",
            plural(failed.len(), "invoice"),
            names.join(", ")
        ));
    }

    if counts.needs_review > 0 {
        missing_data.push(format!(
            "{} require verification",
            plural(counts.needs_review, "field")
        ));
    }

    if counts.missing > 0 {
        missing_data.push(format!(
            "{} could not be extracted",
            plural(counts.missing, "field")
        ));
    }

    for invoice in &result.invoices {
        let missing = missing_critical_fields(invoice);
        if !missing.is_empty() {
            missing_data.push(format!(
                "{}: Missing critical fields: {}",
                invoice.file_name,
                missing.join(", ")
            ));
        }
    }

    let recommendation = match status {
        OverallStatus::Valid => {
            "All invoices processed successfully and ready for review.".to_string()
        }
        OverallStatus::ReviewRequired => format!(
            "Invoice data extracted successfully. {} require verification.",
            plural(counts.needs_review, "field")
        ),
        OverallStatus::Invalid => {
            "Some invoices require additional review or reprocessing.".to_string()
        }
    };

    ExecutiveSummary {
        is_valid: status == OverallStatus::Valid,
        status,
        missing_data,
        recommendation,
    }
}

/// Critical fields absent from the invoice, or present with an `Undefined`
/// state. Invoices without a field list are not inspected.
#[must_use]
pub fn missing_critical_fields(invoice: &InvoiceResult) -> Vec<&'static str> {
    let Some(fields) = invoice.fields.as_deref() else {
        return Vec::new();
    };

    CRITICAL_FIELDS
        .iter()
        .copied()
        .filter(|name| {
            let present = fields.iter().any(|f| f.field_name == *name);
            let undefined = fields
                .iter()
                .any(|f| f.field_name == *name && f.validation_state == ValidationState::Undefined);
            !present || undefined
        })
        .collect()
}

fn plural(count: usize, noun: &str) -> String {
    if count > 1 {
        format!("{count} {noun}s")
    } else {
        format!("{count} {noun}")
    }
}

#[cfg(test)]
#[path = "executive_test.rs"]
mod tests;
