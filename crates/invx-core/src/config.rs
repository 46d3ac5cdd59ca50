use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a hardcoded fallback, so an empty environment yields a
/// working development configuration pointed at the public extraction API.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("INVX_ENV", "development"))?;

    let bind_addr = parse("INVX_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("INVX_LOG_LEVEL", "info");
    let documents_dir = PathBuf::from(or_default(
        "INVX_DOCUMENTS_DIR",
        "./public/documents/invoices",
    ));
    let collection_path = optional("INVX_COLLECTION_PATH").map(PathBuf::from);
    let public_base_url = optional("INVX_PUBLIC_BASE_URL");

    let xtract_api_url = or_default("XTRACT_API_URL", "https://api.xtractflow.com");
    if !(xtract_api_url.starts_with("http://") || xtract_api_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "XTRACT_API_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{xtract_api_url}'"),
        });
    }
    let xtract_auth_token = or_default("XTRACT_AUTH_TOKEN", "");
    let xtract_request_timeout_secs = parse_u64("XTRACT_REQUEST_TIMEOUT_SECS", "120")?;
    let max_concurrent_extractions = parse_usize("INVX_MAX_CONCURRENT_EXTRACTIONS", "4")?.max(1);

    let viewer_sdk_version = or_default("VIEWER_SDK_VERSION", "1.9.1");
    let viewer_cdn_base_url = or_default("VIEWER_CDN_BASE_URL", "https://cdn.cloud.pspdfkit.com");

    let process_rate_limit = parse_usize("INVX_PROCESS_RATE_LIMIT", "10")?.max(1);
    let process_rate_window_secs = parse_u64("INVX_PROCESS_RATE_WINDOW_SECS", "60")?.max(1);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        documents_dir,
        collection_path,
        public_base_url,
        xtract_api_url,
        xtract_auth_token,
        xtract_request_timeout_secs,
        max_concurrent_extractions,
        viewer_sdk_version,
        viewer_cdn_base_url,
        process_rate_limit,
        process_rate_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "INVX_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
