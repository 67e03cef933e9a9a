use bigdecimal::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::core::identifier::CanonicalIdentifier;
use crate::core::invoice::InvoiceLineItem;
use crate::core::purchase_order::PurchaseOrderLineItem;
use crate::core::types::DiscrepancyKind;
use crate::matching::engine::ReconcileConfig;
use crate::normalize::text;

/// One slot of the final assignment between invoice lines and PO lines.
///
/// A `None` ref on either side means the other side's line went unmatched.
/// References are by line number, never by live pointer, so the result can
/// outlive the input documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemMatch {
    /// Invoice line number; `None` for an unmatched PO line
    pub invoice_line_ref: Option<u32>,

    /// PO line number; `None` for an unmatched invoice line
    pub po_line_ref: Option<u32>,

    /// Pair similarity in [0, 1]; 0.0 on unmatched slots
    pub similarity: f64,

    /// Issue kinds attached to this slot, ordered, deduplicated
    pub issues: Vec<DiscrepancyKind>,
}

impl LineItemMatch {
    pub(crate) fn push_issue(&mut self, kind: DiscrepancyKind) {
        if !self.issues.contains(&kind) {
            self.issues.push(kind);
        }
    }
}

/// Similarity of a single (invoice line, PO line) pair: a weighted sum of
/// independent field scores. The lot component only participates when the
/// PO line carries a lot number; its weight is otherwise redistributed
/// across the remaining components.
#[must_use]
pub fn pair_similarity(
    inv: &InvoiceLineItem,
    po: &PurchaseOrderLineItem,
    config: &ReconcileConfig,
) -> f64 {
    let weights = config.pair_weights.normalized();

    let id_score = identifier_score(inv, po, config);
    let quantity_score = quantity_closeness(inv.quantity, po.quantity);
    let price_score = price_closeness(&inv.unit_price, &po.unit_price);

    let mut acc = weights.identifier * id_score
        + weights.quantity * quantity_score
        + weights.unit_price * price_score;
    let mut total_weight = weights.identifier + weights.quantity + weights.unit_price;

    if let Some(lot_score) = lot_score(inv, po) {
        acc += weights.lot * lot_score;
        total_weight += weights.lot;
    }

    if total_weight > 0.0 {
        acc / total_weight
    } else {
        0.0
    }
}

/// Identifier agreement: binary on canonical equality, with half credit when
/// one side is absent or unparseable but the descriptions clearly agree.
fn identifier_score(
    inv: &InvoiceLineItem,
    po: &PurchaseOrderLineItem,
    config: &ReconcileConfig,
) -> f64 {
    let po_id = po.canonical_identifier();
    let inv_id = inv.canonical_identifier();

    if let Some(inv_id) = &inv_id {
        if inv_id.same_product(&po_id) {
            return 1.0;
        }
    }

    let degraded = inv_id
        .as_ref()
        .map_or(true, CanonicalIdentifier::is_low_confidence)
        || po_id.is_low_confidence();
    if degraded
        && text::similarity(&inv.description, &po.description)
            >= config.description_credit_threshold
    {
        return 0.5;
    }

    0.0
}

/// Lot agreement; `None` when the PO line carries no lot number and the
/// component should not participate in the pair score.
fn lot_score(inv: &InvoiceLineItem, po: &PurchaseOrderLineItem) -> Option<f64> {
    let po_lot = po.lot_number.as_deref()?;
    let agrees = inv
        .lot_number
        .as_deref()
        .is_some_and(|inv_lot| lot_eq(inv_lot, po_lot));
    Some(if agrees { 1.0 } else { 0.0 })
}

/// Lot numbers compare case- and whitespace-insensitively
pub(crate) fn lot_eq(a: &str, b: &str) -> bool {
    let clean = |s: &str| {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect::<String>()
    };
    clean(a) == clean(b)
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn quantity_closeness(invoice_qty: i64, po_qty: i64) -> f64 {
    let denom = po_qty.max(1) as f64;
    let diff = (invoice_qty - po_qty).abs() as f64;
    1.0 - (diff / denom).min(1.0)
}

pub(crate) fn price_closeness(
    invoice_price: &bigdecimal::BigDecimal,
    po_price: &bigdecimal::BigDecimal,
) -> f64 {
    let pi = invoice_price.to_f64().unwrap_or(0.0);
    let pp = po_price.to_f64().unwrap_or(0.0);
    let denom = pp.max(0.01);
    1.0 - ((pi - pp).abs() / denom).min(1.0)
}

/// Align invoice lines to PO lines.
///
/// Builds the full similarity matrix, then assigns greedily: the globally
/// best remaining pair wins each round until either side is exhausted or the
/// best remaining similarity falls below the floor. Below the floor, lines
/// stay unmatched rather than being forced into a poor pairing; greedy with
/// a floor favors precision over match count, which is what compliance
/// review needs. Ties prefer the smaller invoice line number, then the
/// smaller PO line number, so the assignment is reproducible.
#[must_use]
pub fn align(
    invoice_items: &[InvoiceLineItem],
    po_items: &[PurchaseOrderLineItem],
    config: &ReconcileConfig,
) -> Vec<LineItemMatch> {
    let n = invoice_items.len();
    let m = po_items.len();

    let mut sim = vec![vec![0.0f64; m]; n];
    for (i, inv) in invoice_items.iter().enumerate() {
        for (j, po) in po_items.iter().enumerate() {
            sim[i][j] = pair_similarity(inv, po, config);
        }
    }

    let mut invoice_used = vec![false; n];
    let mut po_used = vec![false; m];
    // invoice index -> (po index, similarity)
    let mut assigned: Vec<Option<(usize, f64)>> = vec![None; n];

    loop {
        let mut best: Option<(f64, usize, usize)> = None;
        for i in 0..n {
            if invoice_used[i] {
                continue;
            }
            for j in 0..m {
                if po_used[j] {
                    continue;
                }
                let s = sim[i][j];
                let candidate = (s, i, j);
                best = Some(match best {
                    None => candidate,
                    Some(current) if beats(candidate, current, invoice_items, po_items) => {
                        candidate
                    }
                    Some(current) => current,
                });
            }
        }

        match best {
            Some((s, i, j)) if s >= config.assignment_floor => {
                invoice_used[i] = true;
                po_used[j] = true;
                assigned[i] = Some((j, s));
            }
            _ => break,
        }
    }

    let mut out = Vec::with_capacity(n + m);
    for (i, inv) in invoice_items.iter().enumerate() {
        match assigned[i] {
            Some((j, s)) => out.push(LineItemMatch {
                invoice_line_ref: Some(inv.line_number),
                po_line_ref: Some(po_items[j].line_number),
                similarity: s,
                issues: Vec::new(),
            }),
            None => out.push(LineItemMatch {
                invoice_line_ref: Some(inv.line_number),
                po_line_ref: None,
                similarity: 0.0,
                issues: vec![DiscrepancyKind::UnmatchedInvoiceLine],
            }),
        }
    }
    for (j, po) in po_items.iter().enumerate() {
        if !po_used[j] {
            out.push(LineItemMatch {
                invoice_line_ref: None,
                po_line_ref: Some(po.line_number),
                similarity: 0.0,
                issues: vec![DiscrepancyKind::UnmatchedPoLine],
            });
        }
    }
    out
}

/// Strict improvement, with deterministic tie-breaking on line numbers
fn beats(
    candidate: (f64, usize, usize),
    current: (f64, usize, usize),
    invoice_items: &[InvoiceLineItem],
    po_items: &[PurchaseOrderLineItem],
) -> bool {
    let (cs, ci, cj) = candidate;
    let (bs, bi, bj) = current;
    if cs != bs {
        return cs > bs;
    }
    let cand_key = (
        invoice_items[ci].line_number,
        po_items[cj].line_number,
    );
    let curr_key = (
        invoice_items[bi].line_number,
        po_items[bj].line_number,
    );
    cand_key < curr_key
}
