//! Configuration handed to the CDN-hosted PDF viewer.
//!
//! The viewer itself is an external script; this module only describes where
//! to load it from, which document to open and which toolbar items to show.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

/// URL path under which invoice PDFs are served.
pub const DOCUMENTS_PATH: &str = "/documents/invoices";

/// Characters escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbarItem {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ToolbarItem {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}

/// The reduced toolbar used for invoice previews.
#[must_use]
pub fn minimal_toolbar() -> Vec<ToolbarItem> {
    ["zoom-out", "zoom-in", "zoom-mode", "search"]
        .into_iter()
        .map(ToolbarItem::new)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    pub sdk_version: String,
    pub script_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    pub toolbar_items: Vec<ToolbarItem>,
}

impl ViewerConfig {
    #[must_use]
    pub fn new(cdn_base_url: &str, sdk_version: &str) -> Self {
        Self {
            sdk_version: sdk_version.to_string(),
            script_url: format!(
                "{}/pspdfkit-web@{sdk_version}/nutrient-viewer.js",
                cdn_base_url.trim_end_matches('/')
            ),
            document_url: None,
            toolbar_items: minimal_toolbar(),
        }
    }

    /// Points the viewer at one invoice PDF.
    #[must_use]
    pub fn with_document(mut self, filename: &str, public_base_url: Option<&str>) -> Self {
        self.document_url = Some(document_url(filename, public_base_url));
        self
    }
}

/// URL of an invoice PDF, relative unless a public base URL is configured.
#[must_use]
pub fn document_url(filename: &str, public_base_url: Option<&str>) -> String {
    let encoded = utf8_percent_encode(filename, PATH_SEGMENT);
    let base = public_base_url.map_or("", |b| b.trim_end_matches('/'));
    format!("{base}{DOCUMENTS_PATH}/{encoded}")
}
