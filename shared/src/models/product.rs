//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Unit;

/// A product in the catalog
///
/// `unit_price` is the reference price kept on the record itself; once purchases
/// exist, the quantity-weighted average purchase price is the authoritative cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub category: String,
    pub unit: Unit,
    pub unit_price: Decimal,
    pub current_stock: Decimal,
    pub min_stock_level: Decimal,
    /// Supplier lead time in days
    pub lead_time: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// A product is low on stock when at or below its reorder threshold
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock_level
    }

    /// Severity of a low-stock condition
    pub fn stock_status(&self) -> StockStatus {
        if self.current_stock <= Decimal::ZERO {
            return StockStatus::Critical;
        }
        if self.min_stock_level <= Decimal::ZERO {
            return StockStatus::Reorder;
        }
        let ratio = self.current_stock / self.min_stock_level;
        if ratio < Decimal::new(5, 1) {
            StockStatus::Low
        } else {
            StockStatus::Reorder
        }
    }
}

/// Input for adding a product to the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub barcode: Option<String>,
    pub category: String,
    pub unit: Unit,
    pub unit_price: Decimal,
    pub current_stock: Decimal,
    pub min_stock_level: Decimal,
    pub lead_time: i32,
    pub notes: Option<String>,
}

/// Severity of a low-stock alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// Stock is exhausted
    Critical,
    /// Below half of the reorder threshold
    Low,
    /// At or below the reorder threshold
    Reorder,
}

/// A low-stock alert row for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub product_id: Uuid,
    pub product_name: String,
    pub current_stock: Decimal,
    pub min_stock_level: Decimal,
    pub status: StockStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(current: i64, min: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Cinnamon".to_string(),
            barcode: None,
            category: "Spices".to_string(),
            unit: Unit::Kg,
            unit_price: Decimal::new(200, 2),
            current_stock: Decimal::from(current),
            min_stock_level: Decimal::from(min),
            lead_time: 3,
            notes: None,
            added_date: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn low_stock_boundary_is_inclusive() {
        assert!(product(5, 5).is_low_stock());
        assert!(product(4, 5).is_low_stock());
        assert!(!product(6, 5).is_low_stock());
    }

    #[test]
    fn stock_status_thresholds() {
        assert_eq!(product(0, 5).stock_status(), StockStatus::Critical);
        assert_eq!(product(2, 5).stock_status(), StockStatus::Low);
        assert_eq!(product(3, 5).stock_status(), StockStatus::Reorder);
        assert_eq!(product(5, 5).stock_status(), StockStatus::Reorder);
    }

    #[test]
    fn stock_status_with_zero_threshold_never_divides() {
        assert_eq!(product(1, 0).stock_status(), StockStatus::Reorder);
        assert_eq!(product(0, 0).stock_status(), StockStatus::Critical);
    }

    #[test]
    fn product_serializes_camel_case() {
        let json = serde_json::to_value(product(10, 5)).unwrap();
        assert!(json.get("currentStock").is_some());
        assert!(json.get("minStockLevel").is_some());
        assert!(json.get("current_stock").is_none());
    }

    proptest::proptest! {
        #[test]
        fn alert_statuses_imply_low_stock(current in 0i64..10_000, min in 0i64..10_000) {
            let p = product(current, min);
            match p.stock_status() {
                StockStatus::Critical | StockStatus::Low => proptest::prop_assert!(p.is_low_stock()),
                StockStatus::Reorder => {}
            }
        }
    }
}
