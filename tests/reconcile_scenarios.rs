//! End-to-end reconciliation scenarios against the public API.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

use rx_recon::{
    DiscrepancyKind, Invoice, InvoiceLineItem, InvoiceTotals, Party, PurchaseOrder,
    PurchaseOrderId, PurchaseOrderLineItem, ReconcileEngine, Severity,
};

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2024-06-01, fixed so expiry checks are reproducible
fn as_of() -> NaiveDate {
    ymd(2024, 6, 1)
}

fn invoice_with_items(items: Vec<InvoiceLineItem>) -> Invoice {
    let subtotal = items
        .iter()
        .fold(BigDecimal::from(0), |acc, i| acc + &i.total_price);
    Invoice {
        invoice_number: "INV-1001".to_string(),
        invoice_date: ymd(2024, 3, 15),
        po_number: Some("PO-2024-0042".to_string()),
        vendor: Party::new("McKesson"),
        customer: Party::new("Main Street Pharmacy"),
        items,
        totals: InvoiceTotals {
            subtotal: subtotal.clone(),
            total: subtotal,
        },
    }
}

fn amoxicillin_invoice_line(line: u32, qty: i64) -> InvoiceLineItem {
    let price = dec("23.79");
    let total = &price * BigDecimal::from(qty);
    InvoiceLineItem::new(line, "Amoxicillin 500mg Capsules", qty, price, total)
        .with_identifier("55150-0188-10")
}

fn amoxicillin_po_line(line: u32, qty: i64) -> PurchaseOrderLineItem {
    PurchaseOrderLineItem::new(
        line,
        "55150-188-10",
        "Amoxicillin 500mg Capsules",
        qty,
        dec("23.79"),
    )
}

fn po_with_items(items: Vec<PurchaseOrderLineItem>) -> PurchaseOrder {
    PurchaseOrder::new("po-42", "PO-2024-0042", Party::new("McKesson")).with_items(items)
}

#[test]
fn scenario_a_identical_single_line_scores_high_with_no_issues() {
    let invoice = invoice_with_items(vec![amoxicillin_invoice_line(1, 48)]);
    let po = po_with_items(vec![amoxicillin_po_line(1, 48)]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[po], as_of())
        .unwrap();

    assert_eq!(
        result.matched_purchase_order_id,
        Some(PurchaseOrderId::new("po-42"))
    );
    assert!(result.match_score >= 0.95, "score {}", result.match_score);
    assert!(
        result.issues.iter().all(|i| i.severity == Severity::Info),
        "unexpected issues: {:?}",
        result.issues
    );
}

#[test]
fn scenario_b_quantity_variance_is_a_warning() {
    let invoice = invoice_with_items(vec![amoxicillin_invoice_line(1, 50)]);
    let po = po_with_items(vec![amoxicillin_po_line(1, 48)]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[po], as_of())
        .unwrap();

    // Still a matched pair
    assert!(result.matched_purchase_order_id.is_some());
    let pair = &result.line_item_matches[0];
    assert_eq!(pair.invoice_line_ref, Some(1));
    assert_eq!(pair.po_line_ref, Some(1));
    assert!(pair.issues.contains(&DiscrepancyKind::QuantityMismatch));

    let qty: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.kind == DiscrepancyKind::QuantityMismatch)
        .collect();
    assert_eq!(qty.len(), 1);
    assert_eq!(qty[0].severity, Severity::Warning);
}

#[test]
fn scenario_c_no_candidates_yields_null_match() {
    let item = InvoiceLineItem::new(
        1,
        "Unlabeled compound",
        10,
        dec("5.00"),
        dec("50.00"),
    );
    let invoice = invoice_with_items(vec![item]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[], as_of())
        .unwrap();

    assert_eq!(result.matched_purchase_order_id, None);
    assert!(result.line_item_matches.is_empty());
    assert!(result
        .issues
        .iter()
        .any(|i| i.kind == DiscrepancyKind::NoConfidentMatch));
}

#[test]
fn scenario_d_extra_po_line_reported_without_unmatched_invoice_lines() {
    // Every invoice line is covered; the PO carries one extra unrelated line
    let invoice = invoice_with_items(vec![
        amoxicillin_invoice_line(1, 48),
        InvoiceLineItem::new(2, "Lisinopril 10mg Tablets", 30, dec("4.50"), dec("135.00"))
            .with_identifier("00781-1506-10"),
    ]);
    let po = po_with_items(vec![
        amoxicillin_po_line(1, 48),
        PurchaseOrderLineItem::new(2, "00781-1506-10", "Lisinopril 10mg Tablets", 30, dec("4.50")),
        PurchaseOrderLineItem::new(3, "00093-4155-73", "Metformin 850mg Tablets", 60, dec("2.10")),
    ]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[po], as_of())
        .unwrap();

    let unmatched_po = result
        .issues
        .iter()
        .filter(|i| i.kind == DiscrepancyKind::UnmatchedPoLine)
        .count();
    let unmatched_invoice = result
        .issues
        .iter()
        .filter(|i| i.kind == DiscrepancyKind::UnmatchedInvoiceLine)
        .count();
    assert_eq!(unmatched_po, 1);
    assert_eq!(unmatched_invoice, 0);

    let matched = result
        .line_item_matches
        .iter()
        .filter(|m| m.invoice_line_ref.is_some() && m.po_line_ref.is_some())
        .count();
    assert_eq!(matched, 2);
}

#[test]
fn scenario_d_single_line_variant() {
    let invoice = invoice_with_items(vec![amoxicillin_invoice_line(1, 48)]);
    let po = po_with_items(vec![
        amoxicillin_po_line(1, 48),
        PurchaseOrderLineItem::new(2, "00093-4155-73", "Metformin 850mg Tablets", 60, dec("2.10")),
    ]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[po], as_of())
        .unwrap();

    let matched = result
        .line_item_matches
        .iter()
        .filter(|m| m.invoice_line_ref.is_some() && m.po_line_ref.is_some())
        .count();
    assert_eq!(matched, 1);
    assert_eq!(
        result
            .issues
            .iter()
            .filter(|i| i.kind == DiscrepancyKind::UnmatchedPoLine)
            .count(),
        1
    );
    assert_eq!(
        result
            .issues
            .iter()
            .filter(|i| i.kind == DiscrepancyKind::UnmatchedInvoiceLine)
            .count(),
        0
    );
}

#[test]
fn scenario_e_expired_lot_is_an_error_regardless_of_match() {
    let invoice = invoice_with_items(vec![amoxicillin_invoice_line(1, 48)
        .with_lot("A123")
        .with_expiry(ymd(2024, 1, 31))]);
    let po = po_with_items(vec![amoxicillin_po_line(1, 48)]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[po], as_of())
        .unwrap();

    // The pair matches cleanly; the expiry still fires
    assert!(result.matched_purchase_order_id.is_some());
    let expired: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.kind == DiscrepancyKind::LotExpired)
        .collect();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].severity, Severity::Error);
    assert_eq!(expired[0].invoice_line_ref, Some(1));

    // Also fires when there is no candidate at all
    let invoice = invoice_with_items(vec![amoxicillin_invoice_line(1, 48)
        .with_lot("A123")
        .with_expiry(ymd(2024, 1, 31))]);
    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[], as_of())
        .unwrap();
    assert!(result
        .issues
        .iter()
        .any(|i| i.kind == DiscrepancyKind::LotExpired));
}

#[test]
fn reconcile_is_deterministic() {
    let invoice = invoice_with_items(vec![
        amoxicillin_invoice_line(1, 50),
        InvoiceLineItem::new(2, "Lisinopril 10mg Tablets", 30, dec("4.65"), dec("139.50"))
            .with_identifier("00781-1506-10"),
    ]);
    let candidates = vec![
        po_with_items(vec![
            amoxicillin_po_line(1, 48),
            PurchaseOrderLineItem::new(2, "00781-1506-10", "Lisinopril 10mg Tablets", 30, dec("4.50")),
        ]),
        PurchaseOrder::new("po-other", "PO-2024-0051", Party::new("McKesson Corp.")).with_items(
            vec![amoxicillin_po_line(1, 48)],
        ),
    ];

    let engine = ReconcileEngine::new();
    let first = engine.reconcile(&invoice, &candidates, as_of()).unwrap();
    for _ in 0..5 {
        let again = engine.reconcile(&invoice, &candidates, as_of()).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }
}

#[test]
fn assigned_pairs_never_fall_below_the_floor() {
    // A grab-bag of partially-similar lines
    let invoice = invoice_with_items(vec![
        amoxicillin_invoice_line(1, 48),
        InvoiceLineItem::new(2, "Lisinopril 10mg Tablets", 30, dec("4.50"), dec("135.00")),
        InvoiceLineItem::new(3, "Atorvastatin 20mg", 90, dec("6.75"), dec("607.50"))
            .with_identifier("bad-code"),
    ]);
    let po = po_with_items(vec![
        amoxicillin_po_line(1, 48),
        PurchaseOrderLineItem::new(2, "00781-1506-10", "Lisinopril 10mg Tablets", 28, dec("4.55")),
        PurchaseOrderLineItem::new(3, "00071-0156-23", "Atorvastatin 20mg", 90, dec("6.75")),
    ]);

    let engine = ReconcileEngine::new();
    let floor = engine.config().assignment_floor;
    let result = engine.reconcile(&invoice, &[po], as_of()).unwrap();

    for m in &result.line_item_matches {
        if m.invoice_line_ref.is_some() && m.po_line_ref.is_some() {
            assert!(m.similarity >= floor, "pair below floor: {m:?}");
        }
    }
}

#[test]
fn matched_count_bounded_by_smaller_side() {
    let invoice = invoice_with_items(vec![
        amoxicillin_invoice_line(1, 48),
        amoxicillin_invoice_line(2, 24),
        amoxicillin_invoice_line(3, 12),
        amoxicillin_invoice_line(4, 6),
    ]);
    let po = po_with_items(vec![amoxicillin_po_line(1, 48), amoxicillin_po_line(2, 24)]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[po], as_of())
        .unwrap();

    let matched = result
        .line_item_matches
        .iter()
        .filter(|m| m.invoice_line_ref.is_some() && m.po_line_ref.is_some())
        .count();
    assert!(matched <= 2);
}

#[test]
fn header_issues_sort_before_line_issues() {
    // A weak candidate: unmatched lines plus a no-confident-match header
    let invoice = invoice_with_items(vec![amoxicillin_invoice_line(1, 48)]);
    let po = PurchaseOrder::new("po-x", "PO-9999", Party::new("Cardinal Health")).with_items(vec![
        PurchaseOrderLineItem::new(1, "00093-4155-73", "Metformin 850mg Tablets", 60, dec("2.10")),
    ]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[po], as_of())
        .unwrap();

    assert_eq!(result.matched_purchase_order_id, None);
    assert_eq!(result.issues[0].kind, DiscrepancyKind::NoConfidentMatch);
    let kinds: Vec<DiscrepancyKind> = result.issues.iter().map(|i| i.kind).collect();
    assert!(kinds.contains(&DiscrepancyKind::UnmatchedInvoiceLine));
    assert!(kinds.contains(&DiscrepancyKind::UnmatchedPoLine));
}

#[test]
fn gtin_invoice_matches_ndc_purchase_order() {
    let item = InvoiceLineItem::new(
        1,
        "Amoxicillin 500mg Capsules",
        48,
        dec("23.79"),
        dec("1141.92"),
    )
    .with_identifier("00551500188109");
    let invoice = invoice_with_items(vec![item]);
    let po = po_with_items(vec![amoxicillin_po_line(1, 48)]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[po], as_of())
        .unwrap();

    assert!(result.matched_purchase_order_id.is_some());
    assert!(result
        .issues
        .iter()
        .all(|i| i.kind != DiscrepancyKind::IdentifierMismatch));
}

#[test]
fn totals_disagreement_is_informational_only() {
    let mut invoice = invoice_with_items(vec![amoxicillin_invoice_line(1, 48)]);
    invoice.totals.subtotal = dec("9999.99");
    let po = po_with_items(vec![amoxicillin_po_line(1, 48)]);

    let result = ReconcileEngine::new()
        .reconcile(&invoice, &[po], as_of())
        .unwrap();

    // Match outcome unaffected
    assert!(result.matched_purchase_order_id.is_some());
    let totals: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.kind == DiscrepancyKind::TotalsDisagree)
        .collect();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].severity, Severity::Info);
}
