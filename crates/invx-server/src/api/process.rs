//! `POST /api/process-invoices`: registers the document templates once, then
//! sends every invoice PDF to the extraction API with bounded concurrency and
//! rolls the per-invoice outcomes up into a [`ProcessingResult`].

use std::path::Path;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use invx_core::resolver::{INVOICE_NUMBER, TOTAL_AMOUNT, VENDOR_NAME};
use invx_core::{
    resolve_field, summarize, CanonicalFieldSpec, ExtractedField, InvoiceMetadata, InvoiceResult,
    InvoiceStatus, ProcessDocumentResponse, ProcessingResult, RegisterComponentRequest,
};
use invx_xtract::XtractClient;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{invoices::scan_invoice_files, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProcessRequest {
    #[serde(default)]
    collection_id: String,
}

pub(super) async fn process_invoices(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessingResult>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!(request_id = %req_id.0, error = %e, "rejected process request body");
        ApiError::bad_request(format!("Invalid request body: {}", e.body_text()))
    })?;

    let collection_id = request.collection_id.trim();
    if collection_id.is_empty() {
        return Err(ApiError::bad_request("collectionId is required"));
    }

    let documents_dir = &state.config.documents_dir;
    let files = scan_invoice_files(documents_dir, &state.collection)
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %req_id.0,
                documents_dir = %documents_dir.display(),
                error = %e,
                "failed to list invoice files"
            );
            ApiError::internal("Failed to load invoice files")
        })?;

    if files.is_empty() {
        return Err(ApiError::not_found("No invoice files found to process"));
    }

    tracing::info!(
        request_id = %req_id.0,
        collection_id,
        invoices = files.len(),
        "processing invoice collection"
    );

    let component_id = state
        .client
        .register_component(&RegisterComponentRequest::with_default_templates())
        .await
        .map_err(|e| {
            tracing::error!(request_id = %req_id.0, error = %e, "template registration failed");
            ApiError::bad_gateway(format!("Failed to register invoice templates: {e}"))
        })?;

    // `buffered` keeps results in listing order.
    let pending: Vec<_> = files
        .iter()
        .map(|meta| process_invoice(&state.client, &component_id, documents_dir, meta))
        .collect();
    let invoices: Vec<InvoiceResult> = stream::iter(pending)
        .buffered(state.config.max_concurrent_extractions.max(1))
        .collect()
        .await;

    let summary = summarize(collection_id, &invoices, Utc::now());
    tracing::info!(
        request_id = %req_id.0,
        collection_id,
        successful = summary.successful_invoices,
        failed = summary.failed_invoices,
        overall_status = %summary.overall_status,
        "invoice collection processed"
    );

    Ok(Json(ProcessingResult {
        success: true,
        summary,
        invoices,
    }))
}

/// Runs one invoice through extraction. Failures never escape: they become a
/// `failed` result carrying the error text.
async fn process_invoice(
    client: &XtractClient,
    component_id: &str,
    documents_dir: &Path,
    meta: &InvoiceMetadata,
) -> InvoiceResult {
    match extract(client, component_id, documents_dir, &meta.filename).await {
        Ok(response) => completed_result(meta, response),
        Err(e) => {
            let message = format!("{e:#}");
            tracing::warn!(file_name = %meta.filename, error = %message, "invoice extraction failed");
            failed_result(meta, message)
        }
    }
}

async fn extract(
    client: &XtractClient,
    component_id: &str,
    documents_dir: &Path,
    filename: &str,
) -> anyhow::Result<ProcessDocumentResponse> {
    let bytes = tokio::fs::read(documents_dir.join(filename))
        .await
        .with_context(|| format!("failed to read {filename}"))?;
    let response = client
        .process_document(component_id, filename, bytes)
        .await
        .with_context(|| format!("extraction failed for {filename}"))?;
    Ok(response)
}

/// Value of the canonical field, falling back to the collection hint when the
/// extraction did not produce one.
fn canonical_value(
    fields: &[ExtractedField],
    spec: &CanonicalFieldSpec,
    hint: Option<&String>,
) -> String {
    resolve_field(fields, spec)
        .filter(|f| f.has_value())
        .map(|f| f.raw_value().trim().to_string())
        .or_else(|| hint.cloned())
        .unwrap_or_default()
}

fn completed_result(meta: &InvoiceMetadata, response: ProcessDocumentResponse) -> InvoiceResult {
    let fields = response.fields.as_deref().unwrap_or_default();
    InvoiceResult {
        id: meta.id.clone(),
        file_name: meta.filename.clone(),
        vendor_name: canonical_value(fields, &VENDOR_NAME, meta.vendor_name.as_ref()),
        invoice_number: canonical_value(fields, &INVOICE_NUMBER, meta.invoice_number.as_ref()),
        amount: canonical_value(fields, &TOTAL_AMOUNT, meta.amount.as_ref()),
        status: InvoiceStatus::Completed,
        detected_template: response.detected_template,
        fields: response.fields,
        error: None,
    }
}

fn failed_result(meta: &InvoiceMetadata, error: String) -> InvoiceResult {
    InvoiceResult {
        id: meta.id.clone(),
        file_name: meta.filename.clone(),
        vendor_name: meta.vendor_name.clone().unwrap_or_default(),
        invoice_number: meta.invoice_number.clone().unwrap_or_default(),
        amount: meta.amount.clone().unwrap_or_default(),
        status: InvoiceStatus::Failed,
        detected_template: None,
        fields: None,
        error: Some(error),
    }
}
