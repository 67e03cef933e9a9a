use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::invoice::Invoice;
use crate::core::purchase_order::PurchaseOrder;
use crate::core::types::{DiscrepancyKind, PurchaseOrderId, Severity};
use crate::matching::align::{self, LineItemMatch};
use crate::matching::diagnosis::{self, Discrepancy};
use crate::matching::scoring::CandidateScore;
use crate::utils::validation::{validate_invoice, validate_purchase_order, InputError};

/// Default floor below which a pair is left unmatched
pub const DEFAULT_ASSIGNMENT_FLOOR: f64 = 0.35;

/// Default minimum composite score for accepting a candidate
pub const DEFAULT_MIN_MATCH_SCORE: f64 = 0.5;

/// Weights for the per-pair field scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairWeights {
    /// Identifier equality after normalization
    pub identifier: f64,
    /// Lot-number equality; redistributed when the PO line carries no lot
    pub lot: f64,
    /// Quantity closeness
    pub quantity: f64,
    /// Unit-price closeness
    pub unit_price: f64,
}

impl Default for PairWeights {
    fn default() -> Self {
        Self {
            identifier: 0.45,
            lot: 0.15,
            quantity: 0.20,
            unit_price: 0.20,
        }
    }
}

impl PairWeights {
    /// Normalize weights to sum to 1.0
    #[must_use]
    pub fn normalized(&self) -> Self {
        let total = self.identifier + self.lot + self.quantity + self.unit_price;
        if total <= 0.0 {
            return Self::default();
        }
        Self {
            identifier: self.identifier / total,
            lot: self.lot / total,
            quantity: self.quantity / total,
            unit_price: self.unit_price / total,
        }
    }
}

/// Weights for combining line, header, and coverage signals per candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateWeights {
    /// Mean similarity across matched pairs
    pub line_items: f64,
    /// Vendor-name similarity and PO-number equality
    pub header: f64,
    /// Matched lines over the larger document's line count
    pub coverage: f64,
}

impl Default for AggregateWeights {
    fn default() -> Self {
        Self {
            line_items: 0.7,
            header: 0.2,
            coverage: 0.1,
        }
    }
}

impl AggregateWeights {
    /// Normalize weights to sum to 1.0
    #[must_use]
    pub fn normalized(&self) -> Self {
        let total = self.line_items + self.header + self.coverage;
        if total <= 0.0 {
            return Self::default();
        }
        Self {
            line_items: self.line_items / total,
            header: self.header / total,
            coverage: self.coverage / total,
        }
    }
}

/// Configuration for one reconciliation call.
///
/// Everything that shapes scoring lives here and is passed explicitly, never
/// read from ambient state, so tests can vary thresholds per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    pub pair_weights: PairWeights,

    pub aggregate_weights: AggregateWeights,

    /// Pairs below this similarity are never assigned
    pub assignment_floor: f64,

    /// Best candidates below this composite score report no confident match
    pub min_match_score: f64,

    /// Description similarity required for the half-credit identifier score
    pub description_credit_threshold: f64,

    /// Unit-price variance (fraction of PO price) above which a
    /// `price-variance` issue is reported
    pub price_variance_warning: f64,

    /// Quantity or price variance above which the issue escalates to error
    pub variance_error: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            pair_weights: PairWeights::default(),
            aggregate_weights: AggregateWeights::default(),
            assignment_floor: DEFAULT_ASSIGNMENT_FLOOR,
            min_match_score: DEFAULT_MIN_MATCH_SCORE,
            description_credit_threshold: 0.8,
            price_variance_warning: 0.02,
            variance_error: 0.10,
        }
    }
}

/// The result of one reconciliation call: the JSON contract handed to the
/// persistence collaborator. References into the inputs are by value (line
/// numbers, order id), never live pointers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// `None` when no candidate cleared the acceptance threshold
    pub matched_purchase_order_id: Option<PurchaseOrderId>,

    /// Composite score of the best candidate, in [0, 1]
    pub match_score: f64,

    /// Final assignment, invoice lines first in document order, then
    /// unmatched PO lines
    pub line_item_matches: Vec<LineItemMatch>,

    /// Typed discrepancies: header-level first, then invoice line order
    pub issues: Vec<Discrepancy>,
}

/// The reconciliation engine.
///
/// Stateless per call: one invocation consumes one invoice and a bounded
/// candidate list and produces one [`MatchResult`]. Concurrent calls share
/// nothing and need no locking.
#[derive(Debug, Clone, Default)]
pub struct ReconcileEngine {
    config: ReconcileConfig,
}

impl ReconcileEngine {
    /// Create an engine with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom configuration
    #[must_use]
    pub fn with_config(config: ReconcileConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile an invoice against candidate purchase orders.
    ///
    /// `as_of` is the reconciliation date used for lot-expiry checks; it is
    /// explicit so results are reproducible.
    ///
    /// An empty candidate list and a below-threshold best candidate are both
    /// normal outcomes reported as `no-confident-match`, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when a document is malformed (negative
    /// quantity or price, duplicate line numbers); nothing is partially
    /// processed.
    pub fn reconcile(
        &self,
        invoice: &Invoice,
        candidates: &[PurchaseOrder],
        as_of: NaiveDate,
    ) -> Result<MatchResult, InputError> {
        validate_invoice(invoice)?;
        for po in candidates {
            validate_purchase_order(po)?;
        }

        let Some((best_po, best_matches, best_score)) = self.best_candidate(invoice, candidates)
        else {
            tracing::info!(
                invoice = %invoice.invoice_number,
                "no candidate purchase orders to match against"
            );
            let mut issues = diagnosis::invoice_level_issues(invoice, as_of);
            issues.push(Discrepancy::header(
                DiscrepancyKind::NoConfidentMatch,
                Severity::Error,
                "no candidate purchase orders to match against",
            ));
            diagnosis::sort_issues(&mut issues);
            return Ok(MatchResult {
                matched_purchase_order_id: None,
                match_score: 0.0,
                line_item_matches: Vec::new(),
                issues,
            });
        };

        let (line_item_matches, mut issues) =
            diagnosis::diagnose(invoice, best_po, best_matches, &self.config, as_of);

        let matched_purchase_order_id = if best_score.composite < self.config.min_match_score {
            issues.push(Discrepancy::header(
                DiscrepancyKind::NoConfidentMatch,
                Severity::Error,
                format!(
                    "best candidate {} scored {:.2}, below the acceptance threshold {:.2}",
                    best_po.id, best_score.composite, self.config.min_match_score
                ),
            ));
            None
        } else {
            Some(best_po.id.clone())
        };

        diagnosis::sort_issues(&mut issues);

        tracing::info!(
            invoice = %invoice.invoice_number,
            matched = ?matched_purchase_order_id,
            score = best_score.composite,
            issues = issues.len(),
            "reconciliation complete"
        );

        Ok(MatchResult {
            matched_purchase_order_id,
            match_score: best_score.composite,
            line_item_matches,
            issues,
        })
    }

    /// Align and score every candidate, keeping the best. Ties resolve to
    /// the earlier candidate in selection order, so the outcome is
    /// deterministic.
    fn best_candidate<'a>(
        &self,
        invoice: &Invoice,
        candidates: &'a [PurchaseOrder],
    ) -> Option<(&'a PurchaseOrder, Vec<LineItemMatch>, CandidateScore)> {
        let mut best: Option<(&PurchaseOrder, Vec<LineItemMatch>, CandidateScore)> = None;

        for po in candidates {
            let matches = align::align(&invoice.items, &po.items, &self.config);
            let score = CandidateScore::calculate(invoice, po, &matches, &self.config);
            tracing::debug!(
                po = %po.id,
                composite = score.composite,
                mean_pair = score.mean_pair_similarity,
                header = score.header_agreement,
                coverage = score.coverage,
                "scored candidate"
            );
            let improves = best
                .as_ref()
                .map_or(true, |(_, _, b)| score.composite > b.composite);
            if improves {
                best = Some((po, matches, score));
            }
        }

        best
    }
}
