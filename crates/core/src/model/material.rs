//! Stocked materials.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::{MaterialId, StockState};

/// A stocked material line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default, alias = "_id")]
    pub id: MaterialId,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub sap_code: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub material_type: Option<String>,
    /// Quantity currently on hand.
    #[serde(default, deserialize_with = "de::lenient_quantity")]
    pub stock_keeping_unit: Decimal,
    /// Reorder threshold.
    #[serde(default, deserialize_with = "de::lenient_quantity")]
    pub minimum_stock: Decimal,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_decimal")]
    pub unit_price: Option<Decimal>,
}

impl Material {
    /// Current stock level.
    ///
    /// Exactly one state holds for every material: out of stock at zero or
    /// below, low stock while under the reorder threshold, otherwise in stock.
    #[must_use]
    pub fn stock_state(&self) -> StockState {
        if self.stock_keeping_unit <= Decimal::ZERO {
            StockState::OutOfStock
        } else if self.stock_keeping_unit < self.minimum_stock {
            StockState::LowStock
        } else {
            StockState::InStock
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn material(quantity: i64, minimum: i64) -> Material {
        Material {
            stock_keeping_unit: Decimal::from(quantity),
            minimum_stock: Decimal::from(minimum),
            ..Material::default()
        }
    }

    #[test]
    fn test_stock_states() {
        assert_eq!(material(0, 5).stock_state(), StockState::OutOfStock);
        assert_eq!(material(-2, 5).stock_state(), StockState::OutOfStock);
        assert_eq!(material(4, 5).stock_state(), StockState::LowStock);
        assert_eq!(material(5, 5).stock_state(), StockState::InStock);
        assert_eq!(material(3, 0).stock_state(), StockState::InStock);
    }

    #[test]
    fn test_fractional_stock_below_minimum_is_low() {
        let m: Material =
            serde_json::from_str(r#"{"_id":"m3","stockKeepingUnit":0.5,"minimumStock":5}"#)
                .unwrap();
        assert_eq!(m.stock_keeping_unit, Decimal::new(5, 1));
        assert_eq!(m.stock_state(), StockState::LowStock);

        let topped_up: Material =
            serde_json::from_str(r#"{"_id":"m4","stockKeepingUnit":"5.0","minimumStock":"4.5"}"#)
                .unwrap();
        assert_eq!(topped_up.stock_state(), StockState::InStock);
    }

    #[test]
    fn test_material_from_json_with_numeric_price() {
        let m: Material = serde_json::from_str(
            r#"{"_id":"m1","sapCode":"SAP1-A","stockKeepingUnit":"12","minimumStock":20,"unitPrice":2.5}"#,
        )
        .unwrap();
        assert_eq!(m.stock_keeping_unit, Decimal::from(12));
        assert_eq!(m.stock_state(), StockState::LowStock);
        assert_eq!(m.unit_price, Some(Decimal::new(25, 1)));
    }

    #[test]
    fn test_material_with_malformed_price() {
        let m: Material = serde_json::from_str(r#"{"_id":"m2","unitPrice":"n/a"}"#).unwrap();
        assert!(m.unit_price.is_none());
        assert_eq!(m.stock_state(), StockState::OutOfStock);
    }
}
