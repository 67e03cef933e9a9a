use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::core::identifier::CanonicalIdentifier;
use crate::core::invoice::Party;
use crate::core::types::PurchaseOrderId;

/// One row of a purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLineItem {
    /// Unique within the purchase order, order-significant
    pub line_number: u32,

    /// NDC or GTIN text; normalized on comparison
    pub identifier: String,

    pub description: String,

    /// Quantity ordered
    pub quantity: i64,

    pub unit_price: BigDecimal,

    /// Present when the order was placed against a specific lot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
}

impl PurchaseOrderLineItem {
    pub fn new(
        line_number: u32,
        identifier: impl Into<String>,
        description: impl Into<String>,
        quantity: i64,
        unit_price: BigDecimal,
    ) -> Self {
        Self {
            line_number,
            identifier: identifier.into(),
            description: description.into(),
            quantity,
            unit_price,
            lot_number: None,
        }
    }

    #[must_use]
    pub fn with_lot(mut self, lot: impl Into<String>) -> Self {
        self.lot_number = Some(lot.into());
        self
    }

    #[must_use]
    pub fn canonical_identifier(&self) -> CanonicalIdentifier {
        CanonicalIdentifier::parse(&self.identifier)
    }
}

/// A purchase order loaded from the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    /// Opaque id owned by the persistence layer
    pub id: PurchaseOrderId,

    pub po_number: String,

    pub vendor: Party,

    /// Ordered as placed
    pub items: Vec<PurchaseOrderLineItem>,
}

impl PurchaseOrder {
    pub fn new(id: impl Into<String>, po_number: impl Into<String>, vendor: Party) -> Self {
        Self {
            id: PurchaseOrderId::new(id),
            po_number: po_number.into(),
            vendor,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<PurchaseOrderLineItem>) -> Self {
        self.items = items;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_builder() {
        let po = PurchaseOrder::new("po-77", "PO-2024-0042", Party::new("McKesson")).with_items(
            vec![PurchaseOrderLineItem::new(
                1,
                "55150-188-10",
                "Amoxicillin 500mg",
                48,
                dec("23.79"),
            )],
        );

        assert_eq!(po.id, PurchaseOrderId::new("po-77"));
        assert_eq!(po.items.len(), 1);
        assert_eq!(
            po.items[0].canonical_identifier().ndc.as_deref(),
            Some("55150-0188-10")
        );
    }

    #[test]
    fn test_serde_field_names() {
        let item = PurchaseOrderLineItem::new(1, "55150-188-10", "Amoxicillin", 48, dec("23.79"));
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("lineNumber").is_some());
        assert!(json.get("unitPrice").is_some());
        assert!(json.get("lotNumber").is_none());
    }
}
