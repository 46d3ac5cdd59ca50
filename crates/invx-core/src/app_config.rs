use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Directory holding the invoice PDFs listed and processed by the server.
    pub documents_dir: PathBuf,
    /// Optional YAML collection overriding the built-in sample hints.
    pub collection_path: Option<PathBuf>,
    /// Prefix for absolute document URLs handed to the viewer.
    pub public_base_url: Option<String>,
    pub xtract_api_url: String,
    /// Empty when no token is configured; requests are then sent unauthenticated.
    pub xtract_auth_token: String,
    pub xtract_request_timeout_secs: u64,
    /// Upper bound on documents sent to the extraction API at once.
    pub max_concurrent_extractions: usize,
    pub viewer_sdk_version: String,
    pub viewer_cdn_base_url: String,
    pub process_rate_limit: usize,
    pub process_rate_window_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn process_rate_window(&self) -> Duration {
        Duration::from_secs(self.process_rate_window_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("documents_dir", &self.documents_dir)
            .field("collection_path", &self.collection_path)
            .field("public_base_url", &self.public_base_url)
            .field("xtract_api_url", &self.xtract_api_url)
            .field(
                "xtract_auth_token",
                &if self.xtract_auth_token.is_empty() {
                    "[unset]"
                } else {
                    "[redacted]"
                },
            )
            .field(
                "xtract_request_timeout_secs",
                &self.xtract_request_timeout_secs,
            )
            .field(
                "max_concurrent_extractions",
                &self.max_concurrent_extractions,
            )
            .field("viewer_sdk_version", &self.viewer_sdk_version)
            .field("viewer_cdn_base_url", &self.viewer_cdn_base_url)
            .field("process_rate_limit", &self.process_rate_limit)
            .field("process_rate_window_secs", &self.process_rate_window_secs)
            .finish()
    }
}
