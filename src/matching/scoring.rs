use crate::core::invoice::Invoice;
use crate::core::purchase_order::PurchaseOrder;
use crate::core::types::Confidence;
use crate::matching::align::LineItemMatch;
use crate::matching::engine::ReconcileConfig;
use crate::normalize::text;

/// Safely convert usize to f64 for ratio calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Aggregate score for one candidate purchase order
#[derive(Debug, Clone)]
pub struct CandidateScore {
    /// Mean similarity across matched pairs; 0.0 when nothing matched
    pub mean_pair_similarity: f64,

    /// Header-level agreement: vendor name similarity and PO-number equality
    pub header_agreement: f64,

    /// `matched_lines / max(invoice_lines, po_lines)`
    pub coverage: f64,

    /// Weighted composite score
    pub composite: f64,

    /// Confidence level derived from the composite
    pub confidence: Confidence,
}

impl CandidateScore {
    /// Score a candidate from its line alignment and header fields.
    /// Deterministic: identical inputs always produce identical scores.
    #[must_use]
    pub fn calculate(
        invoice: &Invoice,
        po: &PurchaseOrder,
        matches: &[LineItemMatch],
        config: &ReconcileConfig,
    ) -> Self {
        let matched: Vec<f64> = matches
            .iter()
            .filter(|m| m.invoice_line_ref.is_some() && m.po_line_ref.is_some())
            .map(|m| m.similarity)
            .collect();

        let mean_pair_similarity = if matched.is_empty() {
            0.0
        } else {
            matched.iter().sum::<f64>() / count_to_f64(matched.len())
        };

        let header_agreement = header_agreement(invoice, po);

        let line_count = invoice.items.len().max(po.items.len()).max(1);
        let coverage = count_to_f64(matched.len()) / count_to_f64(line_count);

        let weights = config.aggregate_weights.normalized();
        let composite = weights.line_items * mean_pair_similarity
            + weights.header * header_agreement
            + weights.coverage * coverage;

        Self {
            mean_pair_similarity,
            header_agreement,
            coverage,
            composite,
            confidence: Confidence::from_score(composite),
        }
    }
}

/// Header agreement between an invoice and a candidate PO.
///
/// When the invoice declares a PO number, vendor similarity and number
/// equality average; without a declared number there is no signal to
/// disagree with, so vendor similarity stands alone.
pub(crate) fn header_agreement(invoice: &Invoice, po: &PurchaseOrder) -> f64 {
    let vendor = text::similarity(&invoice.vendor.name, &po.vendor.name);
    match invoice.po_number.as_deref() {
        Some(declared) => {
            let number = if text::eq_canonical(declared, &po.po_number) {
                1.0
            } else {
                0.0
            };
            (vendor + number) / 2.0
        }
        None => vendor,
    }
}
