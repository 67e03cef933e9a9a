use crate::core::invoice::Invoice;
use crate::core::purchase_order::PurchaseOrder;
use crate::core::types::PurchaseOrderId;
use crate::normalize::text;
use crate::orders::store::{OrderStoreError, PurchaseOrderSource};

/// Default bound on the fallback candidate window; keeps matcher cost
/// proportional to the window, not the store.
pub const DEFAULT_CANDIDATE_WINDOW: usize = 10;

/// Selects the purchase orders to reconcile an invoice against.
///
/// The common path is explicit ids, chosen by a human or an upstream step;
/// those load as given. Without explicit ids, the selector falls back to the
/// invoice's declared PO number and vendor-name similarity, ranked and
/// truncated to a bounded window.
pub struct CandidateSelector<'a, S: PurchaseOrderSource + ?Sized> {
    source: &'a S,
    window: usize,
}

impl<'a, S: PurchaseOrderSource + ?Sized> CandidateSelector<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            window: DEFAULT_CANDIDATE_WINDOW,
        }
    }

    #[must_use]
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Select candidates for an invoice. An empty result is not an error;
    /// it signals "no candidate" and the engine reports it as
    /// `no-confident-match`.
    ///
    /// # Errors
    ///
    /// Propagates [`OrderStoreError`] from the backing source.
    pub fn select(
        &self,
        invoice: &Invoice,
        explicit_ids: &[PurchaseOrderId],
    ) -> Result<Vec<PurchaseOrder>, OrderStoreError> {
        if !explicit_ids.is_empty() {
            let loaded = self.source.load(explicit_ids)?;
            tracing::debug!(
                requested = explicit_ids.len(),
                loaded = loaded.len(),
                "loaded explicit candidates"
            );
            return Ok(loaded);
        }

        let mut found = self
            .source
            .find_by_number_or_vendor(invoice.po_number.as_deref(), &invoice.vendor.name)?;

        // Rank: declared-number hits first, then vendor similarity, with the
        // PO number as a stable final key so selection is reproducible.
        let hint = invoice.po_number.as_deref();
        found.sort_by(|a, b| {
            let a_key = rank_key(a, hint, &invoice.vendor.name);
            let b_key = rank_key(b, hint, &invoice.vendor.name);
            a_key
                .0
                .cmp(&b_key.0)
                .then_with(|| b_key.1.partial_cmp(&a_key.1).unwrap_or(std::cmp::Ordering::Equal))
                .then_with(|| a.po_number.cmp(&b.po_number))
        });
        found.truncate(self.window);

        tracing::debug!(
            candidates = found.len(),
            window = self.window,
            "selected fallback candidates"
        );
        Ok(found)
    }
}

fn rank_key(order: &PurchaseOrder, hint: Option<&str>, vendor_name: &str) -> (u8, f64) {
    let number_hit = hint.is_some_and(|n| text::eq_canonical(n, &order.po_number));
    let vendor_sim = text::similarity(vendor_name, &order.vendor.name);
    (u8::from(!number_hit), vendor_sim)
}
