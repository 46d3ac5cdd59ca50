use chrono::{TimeZone, Utc};
use invx_core::{
    summarize, FieldFormat, FieldValue, InvoiceStatus, ToolbarItem, ValidationState,
};

use super::*;

fn field(name: &str, value: &str, state: ValidationState) -> ExtractedField {
    ExtractedField {
        field_name: name.to_string(),
        value: Some(FieldValue {
            value: value.to_string(),
            format: FieldFormat::Text,
        }),
        validation_state: state,
    }
}

fn invoice(file_name: &str, status: InvoiceStatus, fields: Option<Vec<ExtractedField>>) -> InvoiceResult {
    InvoiceResult {
        id: format!("id-{file_name}"),
        file_name: file_name.to_string(),
        vendor_name: String::new(),
        invoice_number: String::new(),
        amount: String::new(),
        status,
        detected_template: Some("Standard Invoice".to_string()),
        fields,
        error: (status == InvoiceStatus::Failed).then(|| "extraction failed".to_string()),
    }
}

fn result(invoices: Vec<InvoiceResult>) -> ProcessingResult {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
    ProcessingResult {
        success: true,
        summary: summarize("sample-invoices", &invoices, timestamp),
        invoices,
    }
}

fn metadata(id: &str, filename: &str, size: Option<u64>) -> InvoiceMetadata {
    InvoiceMetadata {
        id: id.to_string(),
        filename: filename.to_string(),
        vendor_name: None,
        invoice_number: None,
        date: None,
        amount: None,
        status: "pending".to_string(),
        size,
        last_modified: None,
    }
}

#[test]
fn format_field_name_splits_camel_case() {
    assert_eq!(format_field_name("vendorTaxId"), "Vendor Tax Id");
    assert_eq!(format_field_name("paymentTerms"), "Payment Terms");
    assert_eq!(format_field_name("IBAN"), "I B A N");
    assert_eq!(format_field_name("notes"), "Notes");
    assert_eq!(format_field_name(""), "");
}

#[test]
fn format_size_rounds_to_two_decimals() {
    assert_eq!(format_size(Some(1_048_576)), "1 MB");
    assert_eq!(format_size(Some(1_572_864)), "1.5 MB");
    assert_eq!(format_size(Some(123_456)), "0.12 MB");
    assert_eq!(format_size(Some(0)), "Unknown size");
    assert_eq!(format_size(None), "Unknown size");
}

#[test]
fn invoice_list_shows_count_and_sizes() {
    let invoices = vec![
        metadata("inv-001", "a.pdf", Some(1_048_576)),
        metadata("inv-002", "b.pdf", None),
    ];
    let out = render_invoice_list(&invoices);
    assert!(out.starts_with("2 invoices ready for AI processing (1MB total)"));
    assert!(out.contains("inv-001"));
    assert!(out.contains("1 MB"));
    assert!(out.contains("Unknown size"));
}

#[test]
fn empty_invoice_list_is_a_single_line() {
    let out = render_invoice_list(&[]);
    assert_eq!(out, "0 invoices ready for AI processing (0MB total)\n");
}

#[test]
fn viewer_config_resolves_relative_document_url() {
    let config = ViewerConfig {
        sdk_version: "1.9.1".to_string(),
        script_url: "https://cdn/pspdfkit-web@1.9.1/nutrient-viewer.js".to_string(),
        document_url: Some("/documents/invoices/a.pdf".to_string()),
        toolbar_items: vec![ToolbarItem {
            kind: "zoom-in".to_string(),
        }],
    };
    let out = render_viewer_config(&config, "http://localhost:3000/");
    assert!(out.contains("Document:    http://localhost:3000/documents/invoices/a.pdf"));
    assert!(out.contains("Toolbar:     zoom-in"));
}

#[test]
fn report_without_color_has_no_escape_codes() {
    let report = render_report(
        &result(vec![invoice(
            "a.pdf",
            InvoiceStatus::Completed,
            Some(vec![field("vendorName", "Acme", ValidationState::Valid)]),
        )]),
        Style::new(false),
    );
    assert!(!report.contains('\u{1b}'));
    assert!(report.contains("Status: Valid"));
    assert!(report.contains("All invoices processed successfully and ready for review."));
}

#[test]
fn report_colors_fields_by_bucket() {
    let report = render_report(
        &result(vec![invoice(
            "a.pdf",
            InvoiceStatus::Completed,
            Some(vec![
                field("vendorName", "Acme", ValidationState::Valid),
                field("invoiceNumber", "A-1", ValidationState::VerificationNeeded),
            ]),
        )]),
        Style::new(true),
    );
    assert!(report.contains("\u{1b}[32mAcme\u{1b}[0m"));
    assert!(report.contains("\u{1b}[33mA-1\u{1b}[0m"));
    // Unresolved canonical fields render as missing.
    assert!(report.contains("\u{1b}[31mMissing\u{1b}[0m"));
}

#[test]
fn report_shows_failures_and_invalid_status() {
    let report = render_report(
        &result(vec![
            invoice(
                "good.pdf",
                InvoiceStatus::Completed,
                Some(vec![field("vendorName", "Acme", ValidationState::Valid)]),
            ),
            invoice("bad.pdf", InvoiceStatus::Failed, None),
        ]),
        Style::new(false),
    );
    assert!(report.contains("Status: Invalid"));
    assert!(report.contains("1 invoice failed to process: bad.pdf"));
    assert!(report.contains("bad.pdf [Failed]"));
    assert!(report.contains("    extraction failed"));
    assert!(report.contains("Processed Invoices: 1/2"));
}

#[test]
fn report_lists_additional_fields_with_placeholder() {
    let report = render_report(
        &result(vec![invoice(
            "a.pdf",
            InvoiceStatus::Completed,
            Some(vec![
                field("vendorName", "Acme", ValidationState::Valid),
                field("paymentTerms", "", ValidationState::Undefined),
                field("customerName", "Bob", ValidationState::Valid),
            ]),
        )]),
        Style::new(false),
    );
    assert!(report.contains("Additional 2 extracted fields:"));
    assert!(report.contains("Payment Terms: \u{2014}"));
    assert!(report.contains("Customer Name: Bob"));
    assert!(report.contains("Missing Data: 1"));
}

#[test]
fn report_notes_invoices_without_fields() {
    let report = render_report(
        &result(vec![invoice("empty.pdf", InvoiceStatus::Completed, Some(Vec::new()))]),
        Style::new(false),
    );
    assert!(report.contains("No data extracted from this invoice"));
}

#[test]
fn report_sections_are_separated_by_blank_lines() {
    let report = render_report(
        &result(vec![invoice(
            "a.pdf",
            InvoiceStatus::Completed,
            Some(vec![field("vendorName", "Acme", ValidationState::Valid)]),
        )]),
        Style::new(false),
    );
    assert!(report.starts_with(
        "Invoice Processing Complete\n1 invoices processed\n\nInvoice Processing Summary\nStatus: Valid\n"
    ));
    assert!(report.contains(
        "\n\nInvoice Data Extraction Results\n\na.pdf [Processed]\n    Template: Standard Invoice\n"
    ));
    assert!(report.contains("    Vendor Name     Acme\n"));
    assert!(report.ends_with('\n'));
    assert!(!report.ends_with("\n\n"));
}
