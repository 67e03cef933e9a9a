use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::invoice::Invoice;
use crate::core::types::{Confidence, PurchaseOrderId};
use crate::matching::engine::{AggregateWeights, MatchResult, ReconcileConfig, ReconcileEngine};
use crate::orders::selector::{CandidateSelector, DEFAULT_CANDIDATE_WINDOW};
use crate::orders::store::JsonOrderStore;

#[derive(Args)]
pub struct ReconcileArgs {
    /// Structured invoice JSON, as produced by the extraction pipeline
    #[arg(required = true)]
    pub invoice: PathBuf,

    /// Purchase-order store JSON
    #[arg(long)]
    pub orders: PathBuf,

    /// Explicit purchase-order ids to match against; when omitted,
    /// candidates are found from the invoice's PO number and vendor
    #[arg(long = "po")]
    pub po_ids: Vec<String>,

    /// Reconciliation date for lot-expiry checks (defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Maximum candidates considered in fallback selection
    #[arg(long, default_value_t = DEFAULT_CANDIDATE_WINDOW)]
    pub window: usize,

    /// Minimum composite score to accept a candidate
    #[arg(long, default_value_t = crate::matching::engine::DEFAULT_MIN_MATCH_SCORE)]
    pub min_score: f64,

    // === Aggregate weight options ===
    /// Weight for mean line-item similarity (0-100, default 70)
    #[arg(long, default_value = "70", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_lines: u32,

    /// Weight for header agreement (0-100, default 20)
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_header: u32,

    /// Weight for line coverage (0-100, default 10)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_coverage: u32,
}

/// Execute the reconcile subcommand
///
/// # Errors
///
/// Returns an error when the invoice or store cannot be loaded, or the
/// invoice is malformed.
pub fn run(args: ReconcileArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let invoice_text = std::fs::read_to_string(&args.invoice)?;
    let invoice: Invoice = serde_json::from_str(&invoice_text)?;

    let store = JsonOrderStore::load_from_file(&args.orders)?;
    if verbose {
        eprintln!(
            "Loaded {} purchase orders, invoice {} with {} lines",
            store.len(),
            invoice.invoice_number,
            invoice.items.len()
        );
    }

    let explicit: Vec<PurchaseOrderId> =
        args.po_ids.iter().map(PurchaseOrderId::new).collect();
    let selector = CandidateSelector::new(&store).with_window(args.window);
    let candidates = selector.select(&invoice, &explicit)?;

    if verbose {
        eprintln!("Matching against {} candidates", candidates.len());
    }

    let config = ReconcileConfig {
        aggregate_weights: AggregateWeights {
            line_items: f64::from(args.weight_lines) / 100.0,
            header: f64::from(args.weight_header) / 100.0,
            coverage: f64::from(args.weight_coverage) / 100.0,
        },
        min_match_score: args.min_score,
        ..ReconcileConfig::default()
    };

    let as_of = args
        .as_of
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let engine = ReconcileEngine::with_config(config);
    let result = engine.reconcile(&invoice, &candidates, as_of)?;

    match format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}

fn print_text(result: &MatchResult) {
    match &result.matched_purchase_order_id {
        Some(id) => println!(
            "Matched purchase order: {id} (score {:.1}%, confidence {:?})",
            result.match_score * 100.0,
            Confidence::from_score(result.match_score)
        ),
        None => println!(
            "No confident match (best score {:.1}%)",
            result.match_score * 100.0
        ),
    }

    let matched = result
        .line_item_matches
        .iter()
        .filter(|m| m.invoice_line_ref.is_some() && m.po_line_ref.is_some())
        .count();
    println!(
        "Line items: {matched} matched, {} total slots",
        result.line_item_matches.len()
    );

    if result.issues.is_empty() {
        println!("No discrepancies.");
        return;
    }

    println!("Discrepancies:");
    for issue in &result.issues {
        let line = issue
            .invoice_line_ref
            .map(|l| format!("invoice line {l}"))
            .or_else(|| issue.po_line_ref.map(|l| format!("po line {l}")))
            .unwrap_or_else(|| "header".to_string());
        println!(
            "  [{}] {} ({line}): {}",
            issue.severity, issue.kind, issue.detail
        );
    }
}
