//! Field bucketing and collection rollup.
//!
//! [`classify_field`] is the single decision table used everywhere a field is
//! colored or counted, so the per-field display and the collection summary
//! always agree on each field's bucket.

use chrono::{DateTime, Utc};

use crate::executive::OverallStatus;
use crate::types::{ExtractedField, InvoiceResult, ProcessingSummary, ValidationState};

/// Review bucket for one extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldBucket {
    Valid,
    NeedsReview,
    Missing,
}

impl std::fmt::Display for FieldBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldBucket::Valid => write!(f, "valid"),
            FieldBucket::NeedsReview => write!(f, "needs review"),
            FieldBucket::Missing => write!(f, "missing"),
        }
    }
}

/// Classifies a field:
///
/// 1. `Valid` state is valid regardless of value.
/// 2. `VerificationNeeded` / `Undefined` with a non-blank value needs review.
/// 3. `VerificationNeeded` / `Undefined` with a blank value is missing.
/// 4. Any other state: non-blank needs review, blank is missing.
#[must_use]
pub fn classify_field(field: &ExtractedField) -> FieldBucket {
    match field.validation_state {
        ValidationState::Valid => FieldBucket::Valid,
        ValidationState::VerificationNeeded
        | ValidationState::Undefined
        | ValidationState::Other(_) => {
            if field.has_value() {
                FieldBucket::NeedsReview
            } else {
                FieldBucket::Missing
            }
        }
    }
}

/// Bucket counts over any number of fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldCounts {
    pub valid: usize,
    pub needs_review: usize,
    pub missing: usize,
}

impl FieldCounts {
    pub fn record(&mut self, bucket: FieldBucket) {
        match bucket {
            FieldBucket::Valid => self.valid += 1,
            FieldBucket::NeedsReview => self.needs_review += 1,
            FieldBucket::Missing => self.missing += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.valid + self.needs_review + self.missing
    }

    /// Counts for a single invoice's fields.
    #[must_use]
    pub fn for_invoice(invoice: &InvoiceResult) -> Self {
        let mut counts = Self::default();
        for field in invoice.fields() {
            counts.record(classify_field(field));
        }
        counts
    }
}

/// Counts every field of every invoice.
#[must_use]
pub fn tally(invoices: &[InvoiceResult]) -> FieldCounts {
    invoices.iter().fold(FieldCounts::default(), |mut acc, invoice| {
        let counts = FieldCounts::for_invoice(invoice);
        acc.valid += counts.valid;
        acc.needs_review += counts.needs_review;
        acc.missing += counts.missing;
        acc
    })
}

/// Builds the collection summary for a finished processing run.
#[must_use]
pub fn summarize(
    collection_id: &str,
    invoices: &[InvoiceResult],
    timestamp: DateTime<Utc>,
) -> ProcessingSummary {
    let counts = tally(invoices);
    let successful_invoices = invoices.iter().filter(|i| i.is_completed()).count();
    let failed_invoices = invoices.iter().filter(|i| i.is_failed()).count();
    let overall_status = OverallStatus::decide(failed_invoices > 0, &counts);

    ProcessingSummary {
        collection_id: collection_id.to_string(),
        total_invoices: invoices.len(),
        successful_invoices,
        failed_invoices,
        total_fields: counts.total(),
        valid_fields: counts.valid,
        verification_needed_fields: counts.needs_review,
        missing_fields: counts.missing,
        overall_status: overall_status.to_string(),
        timestamp,
    }
}
