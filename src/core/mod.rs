//! Core data types for invoice/purchase-order reconciliation.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Invoice`], [`InvoiceLineItem`]: the structured invoice produced by the
//!   upstream extraction collaborator
//! - [`PurchaseOrder`], [`PurchaseOrderLineItem`]: candidate documents loaded
//!   from the persistence collaborator
//! - [`CanonicalIdentifier`]: NDC/GTIN normalization with an explicit
//!   `Unknown` case
//! - [`PurchaseOrderId`], [`Severity`], [`DiscrepancyKind`], [`Confidence`]:
//!   shared result types
//!
//! ## Identifier Normalization
//!
//! Pharmaceutical documents identify products inconsistently:
//!
//! | Form | Example | Canonical |
//! |------|---------|-----------|
//! | NDC 5-4-2 | 55150-0188-10 | 55150-0188-10 |
//! | NDC 5-3-2 | 55150-188-10  | 55150-0188-10 |
//! | GTIN-14   | 00551500188109 | 55150-0188-10 |
//!
//! Comparison always happens on the canonical 5-4-2 form; identifiers that
//! fit no recognized shape are compared by cleaned text as a degraded signal.

pub mod identifier;
pub mod invoice;
pub mod purchase_order;
pub mod types;

pub use identifier::{CanonicalIdentifier, IdentifierKind};
pub use invoice::{Invoice, InvoiceLineItem, InvoiceTotals, Party};
pub use purchase_order::{PurchaseOrder, PurchaseOrderLineItem};
pub use types::{Confidence, DiscrepancyKind, PurchaseOrderId, Severity};
