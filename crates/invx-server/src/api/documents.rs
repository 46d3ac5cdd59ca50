use std::io::ErrorKind;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use invx_core::ViewerConfig;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{invoices::is_pdf, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ViewerQuery {
    document: Option<String>,
}

pub(super) async fn viewer_config(
    State(state): State<AppState>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<ViewerConfig>, ApiError> {
    let config = ViewerConfig::new(
        &state.config.viewer_cdn_base_url,
        &state.config.viewer_sdk_version,
    );

    let config = match query.document.as_deref().map(str::trim) {
        None | Some("") => config,
        Some(name) if is_safe_filename(name) => {
            config.with_document(name, state.config.public_base_url.as_deref())
        }
        Some(_) => return Err(ApiError::bad_request("Invalid document name")),
    };

    Ok(Json(config))
}

/// Rejects names that could escape the documents directory.
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}

pub(super) async fn serve_document(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_safe_filename(&filename) {
        tracing::warn!(request_id = %req_id.0, filename, "rejected document path");
        return Err(ApiError::bad_request("Invalid document name"));
    }
    if !is_pdf(&filename) {
        return Err(ApiError::not_found(format!("Document not found: {filename}")));
    }

    let path = state.config.documents_dir.join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(ApiError::not_found(format!("Document not found: {filename}")))
        }
        Err(e) => {
            tracing::error!(
                request_id = %req_id.0,
                path = %path.display(),
                error = %e,
                "failed to read document"
            );
            Err(ApiError::internal("Failed to read document"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_safe() {
        assert!(is_safe_filename("Corporate Green Invoice Template.pdf"));
        assert!(is_safe_filename("inv_2024.pdf"));
    }

    #[test]
    fn traversal_and_separators_are_rejected() {
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("."));
        assert!(!is_safe_filename("../secret.pdf"));
        assert!(!is_safe_filename("..\\secret.pdf"));
        assert!(!is_safe_filename("nested/file.pdf"));
        assert!(!is_safe_filename("bad\0name.pdf"));
    }
}
