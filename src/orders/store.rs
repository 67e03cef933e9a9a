use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::purchase_order::PurchaseOrder;
use crate::core::types::PurchaseOrderId;
use crate::normalize::text;

#[derive(Error, Debug)]
pub enum OrderStoreError {
    #[error("Failed to read order store: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse order store: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Store format version for compatibility checking
pub const STORE_VERSION: &str = "1.0.0";

/// Vendor-name similarity floor for fallback lookup; anything below this is
/// noise, not a candidate.
const VENDOR_LOOKUP_FLOOR: f64 = 0.5;

/// Serializable store format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStoreData {
    pub version: String,
    pub created_at: String,
    pub orders: Vec<PurchaseOrder>,
}

/// The candidate source abstraction the engine works against.
///
/// The engine does not own a database connection; the persistence
/// collaborator provides lookups through this trait. Any blocking or
/// suspension happens behind it, never inside the matcher.
pub trait PurchaseOrderSource {
    /// Load the given orders, preserving the requested order. Unknown ids
    /// are skipped, not errors: id validity belongs to the collaborator.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be consulted at all.
    fn load(&self, ids: &[PurchaseOrderId]) -> Result<Vec<PurchaseOrder>, OrderStoreError>;

    /// Find orders by declared PO number or vendor-name similarity.
    /// An empty result is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be consulted at all.
    fn find_by_number_or_vendor(
        &self,
        po_number: Option<&str>,
        vendor_name: &str,
    ) -> Result<Vec<PurchaseOrder>, OrderStoreError>;
}

/// A JSON-file-backed purchase-order source, used by the CLI and by tests.
/// Production deployments implement [`PurchaseOrderSource`] over their own
/// persistence instead.
#[derive(Debug)]
pub struct JsonOrderStore {
    /// All known orders
    pub orders: Vec<PurchaseOrder>,

    /// Index: order id -> index in orders vec
    id_to_index: HashMap<PurchaseOrderId, usize>,
}

impl JsonOrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            id_to_index: HashMap::new(),
        }
    }

    /// Load a store from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError`] when the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, OrderStoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a store from a JSON string
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::ParseError`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, OrderStoreError> {
        let data: OrderStoreData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != STORE_VERSION {
            tracing::warn!(
                expected = STORE_VERSION,
                found = %data.version,
                "order store version mismatch"
            );
        }

        let mut store = Self::new();
        for order in data.orders {
            store.add_order(order);
        }

        Ok(store)
    }

    /// Add an order to the store
    pub fn add_order(&mut self, order: PurchaseOrder) {
        let index = self.orders.len();
        self.id_to_index.insert(order.id.clone(), index);
        self.orders.push(order);
    }

    /// Get an order by id
    pub fn get(&self, id: &PurchaseOrderId) -> Option<&PurchaseOrder> {
        self.id_to_index.get(id).map(|&idx| &self.orders[idx])
    }

    /// Export the store to JSON
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::ParseError`] if serialization fails.
    pub fn to_json(&self) -> Result<String, OrderStoreError> {
        let data = OrderStoreData {
            version: STORE_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            orders: self.orders.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of orders in the store
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for JsonOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PurchaseOrderSource for JsonOrderStore {
    fn load(&self, ids: &[PurchaseOrderId]) -> Result<Vec<PurchaseOrder>, OrderStoreError> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(id) {
                Some(order) => out.push(order.clone()),
                None => tracing::warn!(po = %id, "purchase order not found, skipping"),
            }
        }
        Ok(out)
    }

    fn find_by_number_or_vendor(
        &self,
        po_number: Option<&str>,
        vendor_name: &str,
    ) -> Result<Vec<PurchaseOrder>, OrderStoreError> {
        let hits = self
            .orders
            .iter()
            .filter(|order| {
                po_number.is_some_and(|n| text::eq_canonical(n, &order.po_number))
                    || text::similarity(vendor_name, &order.vendor.name) >= VENDOR_LOOKUP_FLOOR
            })
            .cloned()
            .collect();
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invoice::Party;
    use crate::core::purchase_order::PurchaseOrderLineItem;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn sample_store() -> JsonOrderStore {
        let mut store = JsonOrderStore::new();
        store.add_order(
            PurchaseOrder::new("po-1", "PO-2024-0042", Party::new("McKesson Corp.")).with_items(
                vec![PurchaseOrderLineItem::new(
                    1,
                    "55150-188-10",
                    "Amoxicillin 500mg",
                    48,
                    BigDecimal::from_str("23.79").unwrap(),
                )],
            ),
        );
        store.add_order(PurchaseOrder::new(
            "po-2",
            "PO-2024-0051",
            Party::new("Cardinal Health"),
        ));
        store
    }

    #[test]
    fn test_get_by_id() {
        let store = sample_store();
        assert_eq!(store.len(), 2);
        assert!(store.get(&PurchaseOrderId::new("po-1")).is_some());
        assert!(store.get(&PurchaseOrderId::new("po-9")).is_none());
    }

    #[test]
    fn test_load_skips_unknown_ids() {
        let store = sample_store();
        let loaded = store
            .load(&[
                PurchaseOrderId::new("po-2"),
                PurchaseOrderId::new("missing"),
                PurchaseOrderId::new("po-1"),
            ])
            .unwrap();
        // Order preserved, unknown skipped
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, PurchaseOrderId::new("po-2"));
        assert_eq!(loaded[1].id, PurchaseOrderId::new("po-1"));
    }

    #[test]
    fn test_find_by_number() {
        let store = sample_store();
        let hits = store
            .find_by_number_or_vendor(Some("po 2024 0042"), "Unrelated Vendor Inc")
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, PurchaseOrderId::new("po-1"));
    }

    #[test]
    fn test_find_by_vendor_similarity() {
        let store = sample_store();
        let hits = store.find_by_number_or_vendor(None, "mckesson").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, PurchaseOrderId::new("po-1"));
    }

    #[test]
    fn test_json_round_trip() {
        let store = sample_store();
        let json = store.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("PO-2024-0042"));

        let reloaded = JsonOrderStore::from_json(&json).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.get(&PurchaseOrderId::new("po-1")).unwrap().po_number,
            "PO-2024-0042"
        );
    }
}
