//! Client for the invx server's own HTTP API.
//!
//! Every call returns the server's `error` string when it sent one, and a
//! fixed fallback message otherwise.

use anyhow::{bail, Context};
use invx_core::{InvoiceMetadata, ProcessingResult, ViewerConfig};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct InvoiceListBody {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    invoices: Vec<InvoiceMetadata>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessBody<'a> {
    collection_id: &'a str,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerClient {
    client: Client,
    base_url: String,
}

impl ServerClient {
    pub(crate) fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("invx-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetches the invoice PDFs the server can process.
    ///
    /// # Errors
    ///
    /// Fails on network errors, malformed bodies, or `success: false`.
    pub(crate) async fn list_invoices(&self) -> anyhow::Result<Vec<InvoiceMetadata>> {
        let url = self.url("/api/invoices");
        tracing::debug!(url = %url, "fetching invoice list");

        let body: InvoiceListBody = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch invoices")?
            .json()
            .await
            .context("Failed to fetch invoices")?;

        if !body.success {
            bail!(body
                .error
                .unwrap_or_else(|| "Failed to load invoices".to_string()));
        }
        Ok(body.invoices)
    }

    /// Fetches the viewer configuration for one document.
    ///
    /// # Errors
    ///
    /// Fails on network errors, non-2xx statuses, or malformed bodies.
    pub(crate) async fn viewer_config(&self, filename: &str) -> anyhow::Result<ViewerConfig> {
        let url = self.url("/api/viewer-config");
        let response = self
            .client
            .get(&url)
            .query(&[("document", filename)])
            .send()
            .await
            .context("Failed to fetch viewer configuration")?;

        let response = ensure_success(response, "Failed to load viewer configuration").await?;
        response
            .json()
            .await
            .context("Failed to fetch viewer configuration")
    }

    /// Asks the server to process the whole collection.
    ///
    /// # Errors
    ///
    /// Fails on network errors, non-2xx statuses, or malformed bodies.
    pub(crate) async fn process_collection(
        &self,
        collection_id: &str,
    ) -> anyhow::Result<ProcessingResult> {
        let url = self.url("/api/process-invoices");
        tracing::debug!(url = %url, collection_id, "submitting collection for processing");

        let response = self
            .client
            .post(&url)
            .json(&ProcessBody { collection_id })
            .send()
            .await
            .context("Failed to process invoices")?;

        let response = ensure_success(response, "Failed to process invoices").await?;
        response
            .json()
            .await
            .context("Failed to process invoices")
    }
}

/// Passes 2xx responses through; otherwise fails with the body's `error`
/// string or `fallback`.
async fn ensure_success(response: Response, fallback: &str) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| fallback.to_string());
    tracing::debug!(status = status.as_u16(), message = %message, "server returned an error");
    bail!(message)
}
