//! Command-line interface for rx-recon.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **reconcile**: Reconcile an invoice against a purchase-order store
//! - **normalize**: Show how an identifier or date canonicalizes
//! - **orders**: List or show purchase orders from a store
//!
//! ## Usage
//!
//! ```text
//! # Reconcile an invoice against explicit purchase orders
//! rx-recon reconcile invoice.json --orders orders.json --po po-2024-0042
//!
//! # Let the selector find candidates from the invoice's PO number / vendor
//! rx-recon reconcile invoice.json --orders orders.json
//!
//! # JSON output for scripting, pinned reconciliation date
//! rx-recon reconcile invoice.json --orders orders.json --format json --as-of 2024-06-01
//!
//! # Debug identifier normalization
//! rx-recon normalize 00551500188109
//! rx-recon normalize "15-MAR-24" --date
//!
//! # Inspect a store
//! rx-recon orders list --orders orders.json
//! ```

use clap::{Parser, Subcommand};

pub mod normalize;
pub mod orders;
pub mod reconcile;

#[derive(Parser)]
#[command(name = "rx-recon")]
#[command(version)]
#[command(about = "Reconcile pharmaceutical invoices against purchase orders")]
#[command(
    long_about = "rx-recon matches a structured invoice against candidate purchase orders.\n\nIt aligns invoice line items to purchase-order line items, scores each candidate, and reports typed discrepancies (quantity and price variances, identifier and lot mismatches, expired lots, unmatched lines) for compliance and accounts-payable review."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile an invoice against a purchase-order store
    Reconcile(reconcile::ReconcileArgs),

    /// Show how an identifier or date canonicalizes
    Normalize(normalize::NormalizeArgs),

    /// List or show purchase orders from a store
    Orders(orders::OrdersArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
