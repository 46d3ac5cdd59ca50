//! Document templates registered with the extraction API.

use serde::{Deserialize, Serialize};

use crate::types::FieldFormat;

/// Integrity check the extraction API applies to a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationMethod {
    PostalAddressIntegrity,
    #[serde(rename = "IBANIntegrity")]
    IbanIntegrity,
    CreditCardNumberIntegrity,
    VehicleIdentificationNumberIntegrity,
    EmailIntegrity,
    #[serde(rename = "URIIntegrity")]
    UriIntegrity,
    #[serde(rename = "VATIdIntegrity")]
    VatIdIntegrity,
    PhoneNumberIntegrity,
    CurrencyIntegrity,
    DateIntegrity,
    NumberIntegrity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateField {
    pub name: String,
    pub semantic_description: String,
    pub format: FieldFormat,
    /// Serialized as `null` when the field has no integrity check.
    pub validation_method: Option<ValidationMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTemplate {
    pub name: String,
    pub identifier: String,
    pub semantic_description: String,
    pub fields: Vec<TemplateField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterComponentRequest {
    pub enable_classifier: bool,
    pub enable_extraction: bool,
    pub templates: Vec<DocumentTemplate>,
}

impl RegisterComponentRequest {
    /// Classifier plus extraction over the built-in templates.
    #[must_use]
    pub fn with_default_templates() -> Self {
        Self {
            enable_classifier: true,
            enable_extraction: true,
            templates: document_templates(),
        }
    }
}

type FieldRow = (&'static str, &'static str, FieldFormat, Option<ValidationMethod>);

fn template(
    name: &str,
    identifier: &str,
    description: &str,
    rows: Vec<FieldRow>,
) -> DocumentTemplate {
    DocumentTemplate {
        name: name.to_string(),
        identifier: identifier.to_string(),
        semantic_description: description.to_string(),
        fields: rows
            .into_iter()
            .map(|(name, description, format, validation_method)| TemplateField {
                name: name.to_string(),
                semantic_description: description.to_string(),
                format,
                validation_method,
            })
            .collect(),
    }
}

/// The five document types the demo classifies and extracts.
#[must_use]
pub fn document_templates() -> Vec<DocumentTemplate> {
    use FieldFormat::{Currency, Date, Number, Text};
    use ValidationMethod::{
        CurrencyIntegrity, DateIntegrity, NumberIntegrity, PostalAddressIntegrity,
    };

    vec![
        template(
            "Standard Invoice",
            "standard_invoice",
            "Standard business invoice for goods or services",
            vec![
                ("vendorName", "Name of the vendor or supplier company", Text, None),
                ("vendorAddress", "Address of the vendor or supplier", Text, Some(PostalAddressIntegrity)),
                ("vendorTaxId", "Vendor tax ID or business registration number", Text, None),
                ("customerName", "Name of the customer or buyer", Text, None),
                ("customerAddress", "Customer billing or shipping address", Text, Some(PostalAddressIntegrity)),
                ("invoiceNumber", "Unique invoice number or identifier", Text, None),
                ("invoiceDate", "Date the invoice was issued", Date, Some(DateIntegrity)),
                ("dueDate", "Payment due date", Date, Some(DateIntegrity)),
                ("subtotal", "Subtotal amount before taxes", Currency, Some(CurrencyIntegrity)),
                ("taxAmount", "Total tax amount", Currency, Some(CurrencyIntegrity)),
                ("totalAmount", "Total amount due including taxes", Currency, Some(CurrencyIntegrity)),
                ("paymentTerms", "Payment terms and conditions", Text, None),
            ],
        ),
        template(
            "Purchase Order",
            "purchase_order",
            "Purchase order document for procurement",
            vec![
                ("poNumber", "Purchase order number", Text, None),
                ("vendorName", "Name of the vendor or supplier", Text, None),
                ("buyerName", "Name of the purchasing company", Text, None),
                ("orderDate", "Date the purchase order was created", Date, Some(DateIntegrity)),
                ("totalAmount", "Total order amount", Currency, Some(CurrencyIntegrity)),
            ],
        ),
        template(
            "Receipt",
            "receipt",
            "Receipt for goods or services purchased",
            vec![
                ("merchantName", "Name of the merchant or business", Text, None),
                ("merchantAddress", "Address of the merchant", Text, Some(PostalAddressIntegrity)),
                ("receiptNumber", "Receipt or transaction number", Text, None),
                ("transactionDate", "Date of the transaction", Date, Some(DateIntegrity)),
                ("totalAmount", "Total amount paid", Currency, Some(CurrencyIntegrity)),
                ("taxAmount", "Tax amount charged", Currency, Some(CurrencyIntegrity)),
                ("paymentMethod", "Method of payment (cash, card, etc.)", Text, None),
            ],
        ),
        template(
            "Utility Bill",
            "utility_bill",
            "Utility bill for services like electricity, gas, water",
            vec![
                ("serviceProvider", "Name of the utility company", Text, None),
                ("accountNumber", "Customer account number", Text, None),
                ("customerName", "Name of the customer", Text, None),
                ("serviceAddress", "Service address", Text, Some(PostalAddressIntegrity)),
                ("billingPeriodStart", "Start date of billing period", Date, Some(DateIntegrity)),
                ("billingPeriodEnd", "End date of billing period", Date, Some(DateIntegrity)),
                ("dueDate", "Payment due date", Date, Some(DateIntegrity)),
                ("amountDue", "Total amount due", Currency, Some(CurrencyIntegrity)),
            ],
        ),
        template(
            "Service Invoice",
            "service_invoice",
            "Invoice for professional services rendered",
            vec![
                ("serviceProvider", "Name of the service provider or consultant", Text, None),
                ("clientName", "Name of the client receiving services", Text, None),
                ("invoiceNumber", "Service invoice number", Text, None),
                ("serviceDate", "Date services were provided", Date, Some(DateIntegrity)),
                ("serviceDescription", "Description of services provided", Text, None),
                ("hoursWorked", "Number of hours worked", Number, Some(NumberIntegrity)),
                ("hourlyRate", "Hourly rate for services", Currency, Some(CurrencyIntegrity)),
                ("totalAmount", "Total amount for services", Currency, Some(CurrencyIntegrity)),
            ],
        ),
    ]
}
