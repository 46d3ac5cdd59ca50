use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::InvoiceMetadata;
use crate::ConfigError;

/// A named set of invoices with optional per-file hints (vendor, number,
/// date, amount) merged into the file listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCollection {
    pub id: String,
    pub name: String,
    pub description: String,
    pub invoices: Vec<InvoiceMetadata>,
}

impl InvoiceCollection {
    /// Hint entry for `filename`, if the collection describes it.
    #[must_use]
    pub fn hint_for(&self, filename: &str) -> Option<&InvoiceMetadata> {
        self.invoices.iter().find(|i| i.filename == filename)
    }
}

fn sample_invoice(id: &str, filename: &str, vendor: &str, number: &str, date: &str, amount: &str) -> InvoiceMetadata {
    InvoiceMetadata {
        id: id.to_string(),
        filename: filename.to_string(),
        vendor_name: Some(vendor.to_string()),
        invoice_number: Some(number.to_string()),
        date: Some(date.to_string()),
        amount: Some(amount.to_string()),
        status: "pending".to_string(),
        size: None,
        last_modified: None,
    }
}

/// The three sample invoices shipped with the demo.
#[must_use]
pub fn sample_collection() -> InvoiceCollection {
    InvoiceCollection {
        id: "sample-invoices".to_string(),
        name: "Sample Invoice Collection".to_string(),
        description: "Collection of 3 sample invoice templates for demonstration".to_string(),
        invoices: vec![
            sample_invoice(
                "inv-001",
                "Corporate Green Invoice Template.pdf",
                "Corporate Design Solutions",
                "CDS-2024-001",
                "2024-01-15",
                "$2,450.00",
            ),
            sample_invoice(
                "inv-002",
                "Minimalist Purple Invoice Template.pdf",
                "Creative Studio Purple",
                "CSP-2024-002",
                "2024-01-22",
                "$1,875.50",
            ),
            sample_invoice(
                "inv-003",
                "Modern Blue Invoice Template.pdf",
                "Modern Design Co",
                "MDC-2024-003",
                "2024-01-28",
                "$3,200.00",
            ),
        ],
    }
}

/// Load and validate an invoice collection from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_collection(path: &Path) -> Result<InvoiceCollection, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CollectionFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let collection: InvoiceCollection =
        serde_yaml::from_str(&content).map_err(ConfigError::CollectionFileParse)?;

    validate_collection(&collection)?;

    Ok(collection)
}

fn validate_collection(collection: &InvoiceCollection) -> Result<(), ConfigError> {
    if collection.id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "collection id must be non-empty".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();
    let mut seen_files = HashSet::new();

    for invoice in &collection.invoices {
        if invoice.filename.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "invoice '{}' has an empty filename",
                invoice.id
            )));
        }

        if !seen_ids.insert(invoice.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate invoice id: '{}'",
                invoice.id
            )));
        }

        if !seen_files.insert(invoice.filename.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate invoice filename: '{}'",
                invoice.filename
            )));
        }
    }

    Ok(())
}
