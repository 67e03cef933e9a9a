//! Pre-flight validation of caller-supplied documents.
//!
//! A malformed document is rejected as a single structured error before any
//! matching begins; the engine never partially processes bad input.

use std::collections::HashSet;

use bigdecimal::BigDecimal;

use crate::core::invoice::Invoice;
use crate::core::purchase_order::PurchaseOrder;

/// Malformed input, surfaced to the caller before matching
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invoice line {line}: negative quantity {quantity}")]
    NegativeQuantity { line: u32, quantity: i64 },

    #[error("invoice line {line}: negative {field} {value}")]
    NegativePrice {
        line: u32,
        field: &'static str,
        value: BigDecimal,
    },

    #[error("invoice declares duplicate line number {line}")]
    DuplicateLineNumber { line: u32 },

    #[error("purchase order {po} line {line}: negative quantity {quantity}")]
    PoNegativeQuantity {
        po: String,
        line: u32,
        quantity: i64,
    },

    #[error("purchase order {po} line {line}: negative unit price {value}")]
    PoNegativePrice {
        po: String,
        line: u32,
        value: BigDecimal,
    },

    #[error("purchase order {po} declares duplicate line number {line}")]
    PoDuplicateLineNumber { po: String, line: u32 },
}

/// Validate an invoice before matching.
///
/// # Errors
///
/// Returns the first [`InputError`] found: a negative quantity or price, or
/// a line number repeated within the document.
pub fn validate_invoice(invoice: &Invoice) -> Result<(), InputError> {
    let zero = BigDecimal::from(0);
    let mut seen: HashSet<u32> = HashSet::new();

    for item in &invoice.items {
        if !seen.insert(item.line_number) {
            return Err(InputError::DuplicateLineNumber {
                line: item.line_number,
            });
        }
        if item.quantity < 0 {
            return Err(InputError::NegativeQuantity {
                line: item.line_number,
                quantity: item.quantity,
            });
        }
        if item.unit_price < zero {
            return Err(InputError::NegativePrice {
                line: item.line_number,
                field: "unit price",
                value: item.unit_price.clone(),
            });
        }
        if item.total_price < zero {
            return Err(InputError::NegativePrice {
                line: item.line_number,
                field: "total price",
                value: item.total_price.clone(),
            });
        }
    }

    Ok(())
}

/// Validate a candidate purchase order before matching.
///
/// # Errors
///
/// Returns the first [`InputError`] found, tagged with the order id.
pub fn validate_purchase_order(po: &PurchaseOrder) -> Result<(), InputError> {
    let zero = BigDecimal::from(0);
    let mut seen: HashSet<u32> = HashSet::new();

    for item in &po.items {
        if !seen.insert(item.line_number) {
            return Err(InputError::PoDuplicateLineNumber {
                po: po.id.to_string(),
                line: item.line_number,
            });
        }
        if item.quantity < 0 {
            return Err(InputError::PoNegativeQuantity {
                po: po.id.to_string(),
                line: item.line_number,
                quantity: item.quantity,
            });
        }
        if item.unit_price < zero {
            return Err(InputError::PoNegativePrice {
                po: po.id.to_string(),
                line: item.line_number,
                value: item.unit_price.clone(),
            });
        }
    }

    Ok(())
}
