use std::collections::HashMap;

use bigdecimal::ToPrimitive;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::invoice::{Invoice, InvoiceLineItem};
use crate::core::purchase_order::{PurchaseOrder, PurchaseOrderLineItem};
use crate::core::types::{DiscrepancyKind, Severity};
use crate::matching::align::{lot_eq, LineItemMatch};
use crate::matching::engine::ReconcileConfig;

/// Absolute floor on the subtotal tolerance
const SUBTOTAL_ABS_TOLERANCE: f64 = 0.01;
/// Relative subtotal tolerance: half a percent of the declared subtotal
const SUBTOTAL_REL_TOLERANCE: f64 = 0.005;

/// A typed discrepancy found while walking the final assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,

    pub severity: Severity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_line_ref: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_line_ref: Option<u32>,

    /// Human-readable detail for the review screen
    pub detail: String,
}

impl Discrepancy {
    /// A header-level issue not tied to any line
    pub(crate) fn header(kind: DiscrepancyKind, severity: Severity, detail: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            invoice_line_ref: None,
            po_line_ref: None,
            detail: detail.into(),
        }
    }
}

/// Walk the final assignment against the winning candidate and emit typed
/// issues, annotating each [`LineItemMatch`] with the kinds that apply to it.
///
/// Issue ordering is finalized by the engine via [`sort_issues`] after any
/// header-level issues are added.
pub fn diagnose(
    invoice: &Invoice,
    po: &PurchaseOrder,
    mut matches: Vec<LineItemMatch>,
    config: &ReconcileConfig,
    as_of: NaiveDate,
) -> (Vec<LineItemMatch>, Vec<Discrepancy>) {
    let inv_by_line: HashMap<u32, &InvoiceLineItem> =
        invoice.items.iter().map(|i| (i.line_number, i)).collect();
    let po_by_line: HashMap<u32, &PurchaseOrderLineItem> =
        po.items.iter().map(|i| (i.line_number, i)).collect();

    let mut issues = Vec::new();

    for m in &mut matches {
        match (m.invoice_line_ref, m.po_line_ref) {
            (Some(inv_line), Some(po_line)) => {
                let (Some(inv_item), Some(po_item)) = (
                    inv_by_line.get(&inv_line).copied(),
                    po_by_line.get(&po_line).copied(),
                ) else {
                    continue;
                };
                check_pair(inv_item, po_item, m, &mut issues, config);
            }
            (Some(inv_line), None) => issues.push(Discrepancy {
                kind: DiscrepancyKind::UnmatchedInvoiceLine,
                severity: Severity::Error,
                invoice_line_ref: Some(inv_line),
                po_line_ref: None,
                detail: format!(
                    "invoice line {inv_line} has no counterpart on purchase order {}",
                    po.po_number
                ),
            }),
            (None, Some(po_line)) => issues.push(Discrepancy {
                kind: DiscrepancyKind::UnmatchedPoLine,
                severity: Severity::Error,
                invoice_line_ref: None,
                po_line_ref: Some(po_line),
                detail: format!(
                    "purchase order line {po_line} has no counterpart on invoice {}",
                    invoice.invoice_number
                ),
            }),
            (None, None) => {}
        }

        // Expiry applies to every invoice-side line, matched or not
        if let Some(inv_line) = m.invoice_line_ref {
            if let Some(inv_item) = inv_by_line.get(&inv_line).copied() {
                if let Some(issue) = expiry_issue(inv_item, as_of) {
                    m.push_issue(DiscrepancyKind::LotExpired);
                    issues.push(issue);
                }
            }
        }
    }

    if let Some(issue) = totals_issue(invoice) {
        issues.push(issue);
    }

    (matches, issues)
}

fn check_pair(
    inv: &InvoiceLineItem,
    po: &PurchaseOrderLineItem,
    m: &mut LineItemMatch,
    issues: &mut Vec<Discrepancy>,
    config: &ReconcileConfig,
) {
    let refs = (Some(inv.line_number), Some(po.line_number));

    // Quantity: any difference is reportable; size picks the severity
    if inv.quantity != po.quantity {
        let ratio = ratio_of(inv.quantity - po.quantity, po.quantity);
        let severity = if ratio > config.variance_error {
            Severity::Error
        } else {
            Severity::Warning
        };
        m.push_issue(DiscrepancyKind::QuantityMismatch);
        issues.push(Discrepancy {
            kind: DiscrepancyKind::QuantityMismatch,
            severity,
            invoice_line_ref: refs.0,
            po_line_ref: refs.1,
            detail: format!(
                "invoiced quantity {} vs {} ordered",
                inv.quantity, po.quantity
            ),
        });
    }

    // Unit price: variance beyond the warning threshold is reportable
    let pi = inv.unit_price.to_f64().unwrap_or(0.0);
    let pp = po.unit_price.to_f64().unwrap_or(0.0);
    let price_ratio = (pi - pp).abs() / pp.max(0.01);
    if price_ratio > config.price_variance_warning {
        let severity = if price_ratio > config.variance_error {
            Severity::Error
        } else {
            Severity::Warning
        };
        m.push_issue(DiscrepancyKind::PriceVariance);
        issues.push(Discrepancy {
            kind: DiscrepancyKind::PriceVariance,
            severity,
            invoice_line_ref: refs.0,
            po_line_ref: refs.1,
            detail: format!(
                "invoiced unit price {} vs {} ordered ({:.1}% variance)",
                inv.unit_price,
                po.unit_price,
                price_ratio * 100.0
            ),
        });
    }

    // Identifier: only when both sides parsed cleanly; a low-confidence side
    // differing is expected degradation, not a finding
    if let Some(inv_id) = inv.canonical_identifier() {
        let po_id = po.canonical_identifier();
        if let (Some(a), Some(b)) = (&inv_id.ndc, &po_id.ndc) {
            if a != b {
                m.push_issue(DiscrepancyKind::IdentifierMismatch);
                issues.push(Discrepancy {
                    kind: DiscrepancyKind::IdentifierMismatch,
                    severity: Severity::Warning,
                    invoice_line_ref: refs.0,
                    po_line_ref: refs.1,
                    detail: format!("identifier {a} on invoice vs {b} ordered"),
                });
            }
        }
    }

    // Lot: both sides carry one and they disagree
    if let (Some(inv_lot), Some(po_lot)) = (inv.lot_number.as_deref(), po.lot_number.as_deref()) {
        if !lot_eq(inv_lot, po_lot) {
            m.push_issue(DiscrepancyKind::LotMismatch);
            issues.push(Discrepancy {
                kind: DiscrepancyKind::LotMismatch,
                severity: Severity::Warning,
                invoice_line_ref: refs.0,
                po_line_ref: refs.1,
                detail: format!("lot {inv_lot} on invoice vs {po_lot} ordered"),
            });
        }
    }
}

/// Expired-lot check against the reconciliation date. Independent of match
/// outcome: an expired product on the invoice needs review even when the
/// line paired cleanly.
pub(crate) fn expiry_issue(item: &InvoiceLineItem, as_of: NaiveDate) -> Option<Discrepancy> {
    let expiry = item.expiry_date?;
    if expiry >= as_of {
        return None;
    }
    let lot = item.lot_number.as_deref().unwrap_or("unspecified");
    Some(Discrepancy {
        kind: DiscrepancyKind::LotExpired,
        severity: Severity::Error,
        invoice_line_ref: Some(item.line_number),
        po_line_ref: None,
        detail: format!("lot {lot} expired {expiry}, reconciled as of {as_of}"),
    })
}

/// Subtotal signal: the sum of line totals should approximate the declared
/// subtotal. Disagreement is informational, never enforced.
pub(crate) fn totals_issue(invoice: &Invoice) -> Option<Discrepancy> {
    let declared = invoice.totals.subtotal.to_f64().unwrap_or(0.0);
    let summed = invoice.line_total_sum().to_f64().unwrap_or(0.0);
    let tolerance = SUBTOTAL_ABS_TOLERANCE.max(declared.abs() * SUBTOTAL_REL_TOLERANCE);
    if (summed - declared).abs() <= tolerance {
        return None;
    }
    Some(Discrepancy::header(
        DiscrepancyKind::TotalsDisagree,
        Severity::Info,
        format!(
            "line totals sum to {summed:.2} but the invoice declares a subtotal of {declared:.2}"
        ),
    ))
}

/// All invoice-level issues, for the path where no candidate exists and
/// there is no assignment to walk.
pub(crate) fn invoice_level_issues(invoice: &Invoice, as_of: NaiveDate) -> Vec<Discrepancy> {
    let mut issues: Vec<Discrepancy> = invoice
        .items
        .iter()
        .filter_map(|item| expiry_issue(item, as_of))
        .collect();
    if let Some(issue) = totals_issue(invoice) {
        issues.push(issue);
    }
    issues
}

/// Order issues for output: header-level first, then invoice line-number
/// order; issues keyed only to a PO line sort after all invoice-keyed ones.
pub(crate) fn sort_issues(issues: &mut [Discrepancy]) {
    issues.sort_by_key(|d| match (d.invoice_line_ref, d.po_line_ref) {
        (None, None) => (0u8, 0u32, 0u32),
        (Some(inv), po) => (1, inv, po.unwrap_or(0)),
        (None, Some(po)) => (2, po, 0),
    });
}

#[allow(clippy::cast_precision_loss)]
fn ratio_of(diff: i64, base: i64) -> f64 {
    (diff.abs() as f64) / (base.max(1) as f64)
}
