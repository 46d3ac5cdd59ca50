pub mod app_config;
pub mod collection;
pub mod config;
pub mod executive;
pub mod resolver;
pub mod templates;
pub mod types;
pub mod validation;
pub mod viewer;

pub use app_config::{AppConfig, Environment};
pub use collection::{load_collection, sample_collection, InvoiceCollection};
pub use config::{load_app_config, load_app_config_from_env};
pub use executive::{generate_executive_summary, ExecutiveSummary, OverallStatus};
pub use resolver::{additional_fields, resolve_field, CanonicalFieldSpec, Selection, CANONICAL_FIELDS};
pub use templates::{document_templates, DocumentTemplate, RegisterComponentRequest};
pub use types::{
    ExtractedField, FieldFormat, FieldValue, InvoiceMetadata, InvoiceResult, InvoiceStatus,
    ProcessDocumentResponse, ProcessingResult, ProcessingSummary, ValidationState,
};
pub use validation::{classify_field, summarize, tally, FieldBucket, FieldCounts};
pub use viewer::{ToolbarItem, ViewerConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read collection file {path}: {source}")]
    CollectionFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse collection file: {0}")]
    CollectionFileParse(#[source] serde_yaml::Error),

    #[error("collection validation failed: {0}")]
    Validation(String),
}
