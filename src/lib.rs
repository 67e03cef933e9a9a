//! # rx-recon
//!
//! A library for reconciling pharmaceutical invoices against purchase orders.
//!
//! Supply-chain documents rarely agree letter-for-letter: the same product
//! appears as a hyphenated NDC on one document and a GTIN on another, vendor
//! names differ in punctuation, quantities and prices drift between order
//! and fulfillment. `rx-recon` takes a structured invoice extraction and a
//! set of candidate purchase orders, finds the best-matching order, aligns
//! line items, and reports typed discrepancies for compliance and
//! accounts-payable review.
//!
//! ## Features
//!
//! - **Identifier normalization**: GTIN and NDC forms canonicalize to 5-4-2
//!   before comparison, with an explicit low-confidence path for codes that
//!   fit no recognized shape
//! - **Fuzzy line alignment**: weighted identifier/lot/quantity/price
//!   similarity with greedy assignment and a precision-preserving floor
//! - **Candidate scoring**: line, header, and coverage signals combine into
//!   one composite score per candidate purchase order
//! - **Typed discrepancies**: quantity and price variances, identifier and
//!   lot mismatches, expired lots, unmatched lines, each with a severity
//! - **Deterministic**: identical inputs always produce identical results;
//!   the engine holds no state between calls
//!
//! ## Example
//!
//! ```rust,no_run
//! use rx_recon::{CandidateSelector, JsonOrderStore, ReconcileEngine};
//!
//! # fn main() -> anyhow::Result<()> {
//! let invoice: rx_recon::Invoice =
//!     serde_json::from_str(&std::fs::read_to_string("invoice.json")?)?;
//! let store = JsonOrderStore::load_from_file(std::path::Path::new("orders.json"))?;
//!
//! let candidates = CandidateSelector::new(&store).select(&invoice, &[])?;
//!
//! let engine = ReconcileEngine::new();
//! let result = engine.reconcile(&invoice, &candidates, chrono::Utc::now().date_naive())?;
//!
//! match &result.matched_purchase_order_id {
//!     Some(id) => println!("matched {id} at {:.1}%", result.match_score * 100.0),
//!     None => println!("no confident match"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: invoice/purchase-order data model and identifier normalization
//! - [`normalize`]: date and free-text canonicalization
//! - [`orders`]: purchase-order source trait, JSON store, candidate selector
//! - [`matching`]: alignment, scoring, and diagnosis
//! - [`cli`]: command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod normalize;
pub mod orders;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::identifier::{CanonicalIdentifier, IdentifierKind};
pub use core::invoice::{Invoice, InvoiceLineItem, InvoiceTotals, Party};
pub use core::purchase_order::{PurchaseOrder, PurchaseOrderLineItem};
pub use core::types::{Confidence, DiscrepancyKind, PurchaseOrderId, Severity};
pub use matching::align::LineItemMatch;
pub use matching::diagnosis::Discrepancy;
pub use matching::engine::{MatchResult, ReconcileConfig, ReconcileEngine};
pub use orders::selector::CandidateSelector;
pub use orders::store::{JsonOrderStore, OrderStoreError, PurchaseOrderSource};
pub use utils::validation::InputError;
