use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::identifier::CanonicalIdentifier;

/// A named party on a document (vendor or customer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Party {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }
}

/// Declared totals from the invoice footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: BigDecimal,
    pub total: BigDecimal,
}

/// One row of an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    /// Unique within the invoice, order-significant
    pub line_number: u32,

    pub description: String,

    /// Raw NDC or GTIN text as extracted; normalized on comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,

    pub quantity: i64,

    pub unit_price: BigDecimal,

    pub total_price: BigDecimal,
}

impl InvoiceLineItem {
    pub fn new(
        line_number: u32,
        description: impl Into<String>,
        quantity: i64,
        unit_price: BigDecimal,
        total_price: BigDecimal,
    ) -> Self {
        Self {
            line_number,
            description: description.into(),
            identifier: None,
            lot_number: None,
            expiry_date: None,
            quantity,
            unit_price,
            total_price,
        }
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn with_lot(mut self, lot: impl Into<String>) -> Self {
        self.lot_number = Some(lot.into());
        self
    }

    #[must_use]
    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry_date = Some(expiry);
        self
    }

    /// Normalized identifier, when the line carries one
    #[must_use]
    pub fn canonical_identifier(&self) -> Option<CanonicalIdentifier> {
        self.identifier.as_deref().map(CanonicalIdentifier::parse)
    }
}

/// A structured invoice, as produced by the upstream extraction collaborator.
///
/// The engine never parses raw files; it consumes this record as-is. The
/// `po_number` is a hint from the document text, not a guarantee that the
/// referenced purchase order exists or matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,

    pub invoice_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,

    pub vendor: Party,

    pub customer: Party,

    /// Ordered as they appear on the document
    pub items: Vec<InvoiceLineItem>,

    pub totals: InvoiceTotals,
}

impl Invoice {
    /// Sum of line-item totals, for comparison against the declared subtotal.
    /// Disagreement is a signal, never enforced.
    #[must_use]
    pub fn line_total_sum(&self) -> BigDecimal {
        let mut sum = BigDecimal::from(0);
        for item in &self.items {
            sum = sum + &item.total_price;
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_line_total_sum() {
        let invoice = Invoice {
            invoice_number: "INV-1001".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            po_number: None,
            vendor: Party::new("McKesson"),
            customer: Party::new("Main Street Pharmacy"),
            items: vec![
                InvoiceLineItem::new(1, "Amoxicillin 500mg", 48, dec("23.79"), dec("1141.92")),
                InvoiceLineItem::new(2, "Lisinopril 10mg", 10, dec("4.50"), dec("45.00")),
            ],
            totals: InvoiceTotals {
                subtotal: dec("1186.92"),
                total: dec("1186.92"),
            },
        };

        assert_eq!(invoice.line_total_sum(), dec("1186.92"));
    }

    #[test]
    fn test_canonical_identifier() {
        let item = InvoiceLineItem::new(1, "Amoxicillin", 1, dec("1.00"), dec("1.00"))
            .with_identifier("55150-188-10");
        let id = item.canonical_identifier().unwrap();
        assert_eq!(id.ndc.as_deref(), Some("55150-0188-10"));

        let bare = InvoiceLineItem::new(2, "No code", 1, dec("1.00"), dec("1.00"));
        assert!(bare.canonical_identifier().is_none());
    }

    #[test]
    fn test_serde_field_names() {
        let item = InvoiceLineItem::new(1, "Amoxicillin", 48, dec("23.79"), dec("1141.92"))
            .with_lot("A12345");
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("lineNumber").is_some());
        assert!(json.get("unitPrice").is_some());
        assert!(json.get("lotNumber").is_some());
        assert!(json.get("expiryDate").is_none());
    }
}
