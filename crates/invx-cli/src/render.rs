//! Plain-text rendering of invoice listings and processing reports.
//!
//! Field coloring always goes through [`classify_field`], the same decision
//! table the server uses for the summary counts.

use std::sync::LazyLock;

use invx_core::{
    additional_fields, classify_field, generate_executive_summary, resolve_field, tally,
    ExtractedField, FieldBucket, InvoiceMetadata, InvoiceResult, OverallStatus, ProcessingResult,
    ViewerConfig, CANONICAL_FIELDS,
};
use regex::Regex;

static CAPITAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z])").expect("valid capital regex"));

const MISSING: &str = "Missing";
const EMPTY_VALUE: &str = "\u{2014}";

/// ANSI styling, disabled for pipes and `NO_COLOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Style {
    color: bool,
}

impl Style {
    pub(crate) fn new(color: bool) -> Self {
        Self { color }
    }

    pub(crate) fn detect() -> Self {
        use std::io::IsTerminal;
        let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { color }
    }

    fn paint(self, text: &str, code: &str) -> String {
        if self.color {
            format!("\u{1b}[{code}m{text}\u{1b}[0m")
        } else {
            text.to_string()
        }
    }

    fn bucket(self, text: &str, bucket: FieldBucket) -> String {
        let code = match bucket {
            FieldBucket::Valid => "32",
            FieldBucket::NeedsReview => "33",
            FieldBucket::Missing => "31",
        };
        self.paint(text, code)
    }

    fn bold(self, text: &str) -> String {
        self.paint(text, "1")
    }
}

/// `"vendorTaxId"` -> `"Vendor Tax Id"`.
pub(crate) fn format_field_name(field_name: &str) -> String {
    let spaced = CAPITAL.replace_all(field_name, " $1");
    let mut chars = spaced.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    capitalized.trim().to_string()
}

#[allow(clippy::cast_precision_loss)]
fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

/// Size in MB rounded to two decimals, or `Unknown size`.
pub(crate) fn format_size(size: Option<u64>) -> String {
    match size {
        Some(bytes) if bytes > 0 => {
            format!("{} MB", (megabytes(bytes) * 100.0).round() / 100.0)
        }
        _ => "Unknown size".to_string(),
    }
}

fn total_megabytes(invoices: &[InvoiceMetadata]) -> f64 {
    let total: u64 = invoices.iter().filter_map(|i| i.size).sum();
    (megabytes(total) * 10.0).round() / 10.0
}

/// Joins rendered lines, each terminated by a newline.
fn finish(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

pub(crate) fn render_invoice_list(invoices: &[InvoiceMetadata]) -> String {
    let plural = if invoices.len() == 1 { "" } else { "s" };
    let mut lines = vec![format!(
        "{} invoice{plural} ready for AI processing ({}MB total)",
        invoices.len(),
        total_megabytes(invoices)
    )];
    if invoices.is_empty() {
        return finish(&lines);
    }
    lines.push(String::new());
    lines.push(format!("{:<10}{:<16}{:<30}FILE", "ID", "SIZE", "VENDOR"));
    lines.extend(invoices.iter().map(|invoice| {
        format!(
            "{:<10}{:<16}{:<30}{}",
            invoice.id,
            format_size(invoice.size),
            invoice.vendor_name.as_deref().unwrap_or(EMPTY_VALUE),
            invoice.filename
        )
    }));
    finish(&lines)
}

pub(crate) fn render_viewer_config(config: &ViewerConfig, server_url: &str) -> String {
    let mut lines = vec![format!(
        "Viewer SDK:  {} ({})",
        config.sdk_version, config.script_url
    )];
    if let Some(url) = &config.document_url {
        let absolute = if url.starts_with('/') {
            format!("{}{url}", server_url.trim_end_matches('/'))
        } else {
            url.clone()
        };
        lines.push(format!("Document:    {absolute}"));
    }
    let toolbar: Vec<&str> = config.toolbar_items.iter().map(|t| t.kind.as_str()).collect();
    lines.push(format!("Toolbar:     {}", toolbar.join(", ")));
    finish(&lines)
}

fn status_style(status: OverallStatus) -> FieldBucket {
    match status {
        OverallStatus::Valid => FieldBucket::Valid,
        OverallStatus::ReviewRequired => FieldBucket::NeedsReview,
        OverallStatus::Invalid => FieldBucket::Missing,
    }
}

fn summary_lines(result: &ProcessingResult, style: Style) -> Vec<String> {
    let executive = generate_executive_summary(result);
    let counts = tally(&result.invoices);
    let successful = result.invoices.iter().filter(|i| i.is_completed()).count();

    let mut lines = vec![
        style.bold("Invoice Processing Summary"),
        format!(
            "Status: {}",
            style.bucket(&executive.status.to_string(), status_style(executive.status))
        ),
    ];
    lines.extend(executive.missing_data.iter().map(|line| format!("  - {line}")));
    lines.push(executive.recommendation);
    lines.push(String::new());
    lines.push(format!(
        "Processed Invoices: {successful}/{}   Valid Fields: {}   Need Review: {}   Missing Data: {}",
        result.invoices.len(),
        style.bucket(&counts.valid.to_string(), FieldBucket::Valid),
        style.bucket(&counts.needs_review.to_string(), FieldBucket::NeedsReview),
        style.bucket(&counts.missing.to_string(), FieldBucket::Missing),
    ));
    lines.push(format!(
        "Legend: {}  {}  {}",
        style.bucket("Data is validated", FieldBucket::Valid),
        style.bucket("Present but unable to be validated", FieldBucket::NeedsReview),
        style.bucket("Missing", FieldBucket::Missing),
    ));
    lines
}

fn key_field_lines(fields: &[ExtractedField], style: Style) -> Vec<String> {
    CANONICAL_FIELDS
        .iter()
        .map(|spec| {
            let field = resolve_field(fields, spec);
            let bucket = field.map_or(FieldBucket::Missing, classify_field);
            let value = field
                .map(ExtractedField::raw_value)
                .filter(|v| !v.is_empty())
                .unwrap_or(MISSING);
            format!("    {:<16}{}", spec.label, style.bucket(value, bucket))
        })
        .collect()
}

fn additional_field_lines(fields: &[ExtractedField], style: Style) -> Vec<String> {
    let remaining = additional_fields(fields);
    if remaining.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "    Additional {} extracted fields:",
        remaining.len()
    )];
    lines.extend(remaining.into_iter().map(|field| {
        let value = Some(field.raw_value())
            .filter(|v| !v.is_empty())
            .unwrap_or(EMPTY_VALUE);
        let line = format!("{}: {value}", format_field_name(&field.field_name));
        format!("      {}", style.bucket(&line, classify_field(field)))
    }));
    lines
}

fn invoice_lines(invoice: &InvoiceResult, style: Style) -> Vec<String> {
    let badge = if invoice.is_completed() {
        style.bucket("Processed", FieldBucket::Valid)
    } else {
        style.bucket("Failed", FieldBucket::Missing)
    };
    let mut lines = vec![format!("{} [{badge}]", style.bold(&invoice.file_name))];
    if let Some(template) = &invoice.detected_template {
        lines.push(format!("    Template: {template}"));
    }

    if let Some(error) = &invoice.error {
        lines.push(format!("    {}", style.bucket(error, FieldBucket::Missing)));
    } else if invoice.fields().is_empty() {
        lines.push("    No data extracted from this invoice".to_string());
    } else {
        lines.extend(key_field_lines(invoice.fields(), style));
        lines.extend(additional_field_lines(invoice.fields(), style));
    }
    lines
}

/// Full results report: executive summary, statistics and per-invoice fields.
pub(crate) fn render_report(result: &ProcessingResult, style: Style) -> String {
    let mut lines = vec![
        style.bold("Invoice Processing Complete"),
        format!("{} invoices processed", result.summary.total_invoices),
        String::new(),
    ];
    lines.extend(summary_lines(result, style));
    lines.push(String::new());
    lines.push(style.bold("Invoice Data Extraction Results"));
    for invoice in &result.invoices {
        lines.push(String::new());
        lines.extend(invoice_lines(invoice, style));
    }
    finish(&lines)
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
