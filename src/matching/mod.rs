//! The reconciliation engine: alignment, scoring, and diagnosis.
//!
//! This module provides the core matching functionality:
//!
//! - [`ReconcileEngine`]: main entry point, one call per invoice
//! - [`align`](align::align): bipartite alignment of invoice lines to PO lines
//! - [`CandidateScore`]: aggregate scoring of one candidate
//! - [`Discrepancy`]: typed issues emitted from the final assignment
//!
//! ## Matching Algorithm
//!
//! 1. **Pair similarity**: each (invoice line, PO line) pair scores a
//!    weighted sum of identifier, lot, quantity, and price agreement
//! 2. **Greedy assignment**: the globally best remaining pair wins each
//!    round, stopping at a similarity floor; sub-floor lines stay unmatched
//! 3. **Candidate aggregation**: mean pair similarity, header agreement,
//!    and coverage combine into one composite score per candidate
//! 4. **Diagnosis**: the winning assignment is walked for quantity, price,
//!    identifier, lot, and coverage discrepancies
//!
//! Greedy-with-floor rather than optimal bipartite matching is deliberate:
//! it is deterministic, cheap, and favors precision over match count, which
//! is what compliance review needs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rx_recon::{Invoice, ReconcileEngine};
//!
//! # fn load_invoice() -> Invoice { unimplemented!() }
//! # fn load_candidates() -> Vec<rx_recon::PurchaseOrder> { unimplemented!() }
//! let invoice = load_invoice();
//! let candidates = load_candidates();
//!
//! let engine = ReconcileEngine::new();
//! let as_of = chrono::Utc::now().date_naive();
//! let result = engine.reconcile(&invoice, &candidates, as_of).unwrap();
//!
//! for issue in &result.issues {
//!     println!("[{}] {}: {}", issue.severity, issue.kind, issue.detail);
//! }
//! ```

pub mod align;
pub mod diagnosis;
pub mod engine;
pub mod scoring;

pub use align::LineItemMatch;
pub use diagnosis::Discrepancy;
pub use engine::{MatchResult, ReconcileConfig, ReconcileEngine};
pub use scoring::CandidateScore;
