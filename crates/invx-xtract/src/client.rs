//! HTTP client for the remote document-extraction API.
//!
//! Two endpoints are used: `register-component`, which registers the document
//! templates and returns a component id, and `process`, which classifies one
//! uploaded document and extracts its fields. Non-2xx answers surface as
//! [`XtractError::Api`] carrying the server's message when it sent one.

use std::time::Duration;

use invx_core::{ProcessDocumentResponse, RegisterComponentRequest};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;

use crate::error::XtractError;

const DEFAULT_BASE_URL: &str = "https://api.xtractflow.com/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterComponentResponse {
    component_id: String,
}

/// Client for the extraction API.
///
/// Use [`XtractClient::new`] for the public API or
/// [`XtractClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct XtractClient {
    client: Client,
    auth_token: Option<String>,
    base_url: Url,
}

impl XtractClient {
    /// Creates a client pointed at the public extraction API.
    ///
    /// # Errors
    ///
    /// Returns [`XtractError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(auth_token: &str, timeout_secs: u64) -> Result<Self, XtractError> {
        Self::with_base_url(auth_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// An empty `auth_token` sends requests without an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns [`XtractError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`XtractError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        auth_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, XtractError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("invx/0.1 (invoice-extraction-demo)")
            .build()?;

        // Exactly one trailing slash so that `Url::join` appends to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| XtractError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let auth_token = Some(auth_token.trim().to_string()).filter(|t| !t.is_empty());

        Ok(Self {
            client,
            auth_token,
            base_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Registers document templates and returns the component id used for
    /// subsequent [`process_document`](Self::process_document) calls.
    ///
    /// # Errors
    ///
    /// - [`XtractError::Http`] on network failure.
    /// - [`XtractError::Api`] on a non-2xx status.
    /// - [`XtractError::Deserialize`] if the body has no `componentId`.
    pub async fn register_component(
        &self,
        request: &RegisterComponentRequest,
    ) -> Result<String, XtractError> {
        let url = self.endpoint("api/register-component")?;
        tracing::debug!(
            url = %url,
            templates = request.templates.len(),
            "registering extraction component"
        );

        let response = self
            .authorized(self.client.post(url))
            .json(request)
            .send()
            .await?;
        let body: RegisterComponentResponse =
            Self::read_json(response, "register-component").await?;

        tracing::info!(component_id = %body.component_id, "extraction component registered");
        Ok(body.component_id)
    }

    /// Uploads one document for classification and field extraction.
    ///
    /// # Errors
    ///
    /// - [`XtractError::Http`] on network failure or an invalid upload part.
    /// - [`XtractError::Api`] on a non-2xx status.
    /// - [`XtractError::Deserialize`] if the body does not match
    ///   [`ProcessDocumentResponse`].
    pub async fn process_document(
        &self,
        component_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ProcessDocumentResponse, XtractError> {
        let url = self.endpoint("api/process")?;
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new()
            .text("componentId", component_id.to_string())
            .part("inputFile", part);

        tracing::debug!(url = %url, file_name, size, "submitting document for extraction");

        let response = self
            .authorized(self.client.post(url))
            .multipart(form)
            .send()
            .await?;
        let body: ProcessDocumentResponse =
            Self::read_json(response, &format!("process({file_name})")).await?;

        tracing::debug!(
            file_name,
            detected_template = body.detected_template.as_deref().unwrap_or("none"),
            fields = body.fields.as_ref().map_or(0, Vec::len),
            "document processed"
        );
        Ok(body)
    }

    fn endpoint(&self, path: &str) -> Result<Url, XtractError> {
        self.base_url
            .join(path)
            .map_err(|e| XtractError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Checks the status and parses the body as `T`.
    async fn read_json<T>(response: Response, context: &str) -> Result<T, XtractError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(XtractError::Api {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        serde_json::from_str(&body).map_err(|e| XtractError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// Best-effort human message from an error body: a JSON `error` or `message`
/// string, else the raw text, else the status reason.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(msg) = json.get(key).and_then(serde_json::Value::as_str) {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("unknown error").to_string()
    } else {
        trimmed.chars().take(300).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> XtractClient {
        XtractClient::with_base_url("test-token", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let client = test_client("http://localhost:9000/v2");
        let url = client.endpoint("api/process").expect("endpoint");
        assert_eq!(url.as_str(), "http://localhost:9000/v2/api/process");
    }

    #[test]
    fn endpoint_strips_extra_trailing_slashes() {
        let client = test_client("https://api.xtractflow.com//");
        let url = client.endpoint("api/register-component").expect("endpoint");
        assert_eq!(
            url.as_str(),
            "https://api.xtractflow.com/api/register-component"
        );
    }

    #[test]
    fn blank_token_disables_auth() {
        let client = XtractClient::with_base_url("  ", 30, "http://localhost").expect("client");
        assert!(client.auth_token.is_none());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = XtractClient::with_base_url("t", 30, "not a url").unwrap_err();
        assert!(matches!(err, XtractError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn error_message_prefers_json_error_field() {
        assert_eq!(
            error_message(r#"{"error":"quota exceeded"}"#, Some("Too Many Requests")),
            "quota exceeded"
        );
        assert_eq!(
            error_message(r#"{"message":"bad file"}"#, None),
            "bad file"
        );
    }

    #[test]
    fn error_message_falls_back_to_text_then_reason() {
        assert_eq!(error_message("gateway down", None), "gateway down");
        assert_eq!(error_message("  ", Some("Bad Gateway")), "Bad Gateway");
        assert_eq!(error_message("", None), "unknown error");
    }
}
