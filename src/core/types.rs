use serde::{Deserialize, Serialize};

/// Opaque identifier for a purchase order, owned by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PurchaseOrderId(pub String);

impl PurchaseOrderId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for PurchaseOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a reported discrepancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Kind of discrepancy found during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscrepancyKind {
    /// Matched pair, quantities differ
    QuantityMismatch,
    /// Matched pair, unit price differs beyond tolerance
    PriceVariance,
    /// Matched pair, normalized identifiers differ despite matching on other fields
    IdentifierMismatch,
    /// Matched pair, both sides carry a lot number and they differ
    LotMismatch,
    /// Invoice line expiry date is earlier than the reconciliation date
    LotExpired,
    /// Invoice line has no purchase-order counterpart
    UnmatchedInvoiceLine,
    /// Purchase-order line has no invoice counterpart
    UnmatchedPoLine,
    /// Sum of line totals disagrees with the declared subtotal
    TotalsDisagree,
    /// No candidate purchase order cleared the acceptance threshold
    NoConfidentMatch,
}

impl std::fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::QuantityMismatch => "quantity-mismatch",
            Self::PriceVariance => "price-variance",
            Self::IdentifierMismatch => "identifier-mismatch",
            Self::LotMismatch => "lot-mismatch",
            Self::LotExpired => "lot-expired",
            Self::UnmatchedInvoiceLine => "unmatched-invoice-line",
            Self::UnmatchedPoLine => "unmatched-po-line",
            Self::TotalsDisagree => "totals-disagree",
            Self::NoConfidentMatch => "no-confident-match",
        };
        write!(f, "{s}")
    }
}

/// Confidence level derived from a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
    Exact,
}

impl Confidence {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 1.0 {
            Self::Exact
        } else if score >= 0.95 {
            Self::High
        } else if score >= 0.80 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}
