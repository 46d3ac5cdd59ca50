use std::path::Path;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use invx_core::{InvoiceCollection, InvoiceMetadata};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct InvoiceListResponse {
    success: bool,
    invoices: Vec<InvoiceMetadata>,
}

pub(super) async fn list_invoices(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let invoices = scan_invoice_files(&state.config.documents_dir, &state.collection)
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %req_id.0,
                documents_dir = %state.config.documents_dir.display(),
                error = %e,
                "failed to list invoice files"
            );
            ApiError::internal("Failed to load invoices")
        })?;

    tracing::debug!(request_id = %req_id.0, count = invoices.len(), "listed invoice files");
    Ok(Json(InvoiceListResponse {
        success: true,
        invoices,
    }))
}

pub(super) fn is_pdf(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Lists the PDF files in `dir`, sorted by filename, with sequential
/// `inv-NNN` ids and any hints `collection` holds for them.
///
/// # Errors
///
/// Returns the I/O error if the directory or an entry's metadata cannot be read.
pub(super) async fn scan_invoice_files(
    dir: &Path,
    collection: &InvoiceCollection,
) -> std::io::Result<Vec<InvoiceMetadata>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files: Vec<(String, u64, Option<DateTime<Utc>>)> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let Ok(filename) = entry.file_name().into_string() else {
            continue;
        };
        if !is_pdf(&filename) {
            continue;
        }
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let last_modified = metadata.modified().ok().map(DateTime::<Utc>::from);
        files.push((filename, metadata.len(), last_modified));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(index, (filename, size, last_modified))| {
            let hint = collection.hint_for(&filename);
            InvoiceMetadata {
                id: format!("inv-{:03}", index + 1),
                vendor_name: hint.and_then(|h| h.vendor_name.clone()),
                invoice_number: hint.and_then(|h| h.invoice_number.clone()),
                date: hint.and_then(|h| h.date.clone()),
                amount: hint.and_then(|h| h.amount.clone()),
                filename,
                status: "pending".to_string(),
                size: Some(size),
                last_modified,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(is_pdf("invoice.pdf"));
        assert!(is_pdf("INVOICE.PDF"));
        assert!(is_pdf("Corporate Green Invoice Template.Pdf"));
        assert!(!is_pdf("notes.txt"));
        assert!(!is_pdf("pdf"));
        assert!(!is_pdf("archive.pdf.zip"));
    }

    #[tokio::test]
    async fn scan_sorts_numbers_and_merges_hints() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("Minimalist Purple Invoice Template.pdf"),
            b"%PDF-purple",
        )
        .expect("write");
        std::fs::write(dir.path().join("Corporate Green Invoice Template.pdf"), b"%PDF")
            .expect("write");
        std::fs::write(dir.path().join("readme.md"), b"ignored").expect("write");
        std::fs::create_dir(dir.path().join("nested.pdf")).expect("mkdir");

        let invoices = scan_invoice_files(dir.path(), &invx_core::sample_collection())
            .await
            .expect("scan");

        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].id, "inv-001");
        assert_eq!(invoices[0].filename, "Corporate Green Invoice Template.pdf");
        assert_eq!(
            invoices[0].vendor_name.as_deref(),
            Some("Corporate Design Solutions")
        );
        assert_eq!(invoices[0].size, Some(4));
        assert!(invoices[0].last_modified.is_some());
        assert_eq!(invoices[1].id, "inv-002");
        assert_eq!(invoices[1].size, Some(11));
        assert!(invoices.iter().all(|i| i.status == "pending"));
    }

    #[tokio::test]
    async fn files_without_hints_have_no_extras() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("unknown.pdf"), b"%PDF").expect("write");

        let invoices = scan_invoice_files(dir.path(), &invx_core::sample_collection())
            .await
            .expect("scan");

        assert_eq!(invoices.len(), 1);
        assert!(invoices[0].vendor_name.is_none());
        assert!(invoices[0].amount.is_none());
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result =
            scan_invoice_files(&dir.path().join("absent"), &invx_core::sample_collection()).await;
        assert!(result.is_err());
    }
}
