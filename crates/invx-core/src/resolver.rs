//! Canonical field resolution.
//!
//! The extraction API names fields freely (`vendor`, `supplierName`,
//! `totalIncVat`, ...). [`resolve_field`] maps an invoice's field list onto the
//! four canonical attributes in [`CANONICAL_FIELDS`] by case-insensitive,
//! bidirectional substring matching against alias and exclusion terms.

use crate::types::ExtractedField;

/// How a canonical field picks among several matching extracted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The first non-excluded match in field order.
    First,
    /// The non-excluded match with the largest numeric value.
    LargestAmount,
}

/// Static description of one canonical invoice attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalFieldSpec {
    pub label: &'static str,
    pub aliases: &'static [&'static str],
    pub exclusions: &'static [&'static str],
    pub selection: Selection,
}

pub const VENDOR_NAME: CanonicalFieldSpec = CanonicalFieldSpec {
    label: "Vendor Name",
    aliases: &[
        "vendorName",
        "vendor",
        "supplier",
        "companyName",
        "businessName",
        "from",
    ],
    exclusions: &[
        "address",
        "vendorAddress",
        "supplierAddress",
        "street",
        "boulevard",
        "avenue",
        "road",
    ],
    selection: Selection::First,
};

pub const INVOICE_NUMBER: CanonicalFieldSpec = CanonicalFieldSpec {
    label: "Invoice Number",
    aliases: &[
        "invoiceNumber",
        "invoice",
        "invoiceNo",
        "billNumber",
        "documentNumber",
        "number",
    ],
    exclusions: &["phone", "phoneNumber", "contact", "zip", "postal"],
    selection: Selection::First,
};

pub const TOTAL_AMOUNT: CanonicalFieldSpec = CanonicalFieldSpec {
    label: "Total Amount",
    aliases: &[
        "totalAmount",
        "total",
        "grandTotal",
        "finalAmount",
        "amountDue",
        "totalWithTax",
        "totalIncVat",
        "totalIncludingTax",
        "amountTotal",
        "invoiceTotal",
    ],
    exclusions: &[
        "subtotal",
        "taxAmount",
        "vatAmount",
        "discountAmount",
        "shippingAmount",
        "netAmount",
        "beforeTax",
        "preTax",
        "partial",
    ],
    selection: Selection::LargestAmount,
};

pub const INVOICE_DATE: CanonicalFieldSpec = CanonicalFieldSpec {
    label: "Invoice Date",
    aliases: &[
        "invoiceDate",
        "date",
        "issueDate",
        "billDate",
        "documentDate",
        "createdDate",
    ],
    exclusions: &["dueDate", "paymentDate", "shipDate", "deliveryDate"],
    selection: Selection::First,
};

/// The canonical attributes, in display order.
pub const CANONICAL_FIELDS: [CanonicalFieldSpec; 4] =
    [VENDOR_NAME, INVOICE_NUMBER, TOTAL_AMOUNT, INVOICE_DATE];

impl CanonicalFieldSpec {
    /// `true` if `field_name` overlaps any alias and no exclusion.
    #[must_use]
    pub fn accepts(&self, field_name: &str) -> bool {
        let name = field_name.to_lowercase();
        !overlaps_any(&name, self.exclusions) && overlaps_any(&name, self.aliases)
    }
}

/// Picks the extracted field that best represents `spec`, if any.
///
/// Exclusion terms always win over alias terms. For
/// [`Selection::LargestAmount`] the fold starts from "no candidate" valued at
/// zero and only a strictly greater amount replaces the current pick, so ties
/// keep the earlier field and non-positive or unparseable amounts never win.
#[must_use]
pub fn resolve_field<'a>(
    fields: &'a [ExtractedField],
    spec: &CanonicalFieldSpec,
) -> Option<&'a ExtractedField> {
    let mut candidates = fields.iter().filter(|f| spec.accepts(&f.field_name));

    match spec.selection {
        Selection::First => candidates.next(),
        Selection::LargestAmount => {
            candidates
                .fold((None, 0.0_f64), |(best, best_amount), field| {
                    let amount = parse_amount(field.raw_value());
                    if amount > best_amount {
                        (Some(field), amount)
                    } else {
                        (best, best_amount)
                    }
                })
                .0
        }
    }
}

/// Fields whose names match no alias of any canonical attribute.
///
/// Exclusion terms are not consulted, so a `vendorAddress` field is neither
/// the vendor nor an additional field.
#[must_use]
pub fn additional_fields(fields: &[ExtractedField]) -> Vec<&ExtractedField> {
    fields
        .iter()
        .filter(|f| {
            let name = f.field_name.to_lowercase();
            !CANONICAL_FIELDS
                .iter()
                .any(|spec| overlaps_any(&name, spec.aliases))
        })
        .collect()
}

/// Numeric reading of a money-like string.
///
/// Every character other than ASCII digits, `.` and `-` is dropped, then the
/// longest leading decimal literal is parsed. Returns `NaN` when no literal is
/// present, so the result never compares greater than anything.
#[must_use]
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let bytes = cleaned.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    cleaned[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn overlaps_any(name_lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| {
        let term = term.to_lowercase();
        name_lower.contains(&term) || term.contains(name_lower)
    })
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
