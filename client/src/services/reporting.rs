//! Dashboard and report computations
//!
//! Pure read-side views over the inventory container: dashboard metrics,
//! purchase history slices, supplier performance and the low-stock reorder
//! report, plus CSV export of any serializable row set.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::InventoryService;
use shared::models::Purchase;
use shared::types::{ChartPeriod, DateRange};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_products: usize,
    pub total_suppliers: usize,
    pub total_inventory_value: Decimal,
    pub low_stock_count: usize,
    pub purchases_this_month: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPerformance {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub order_count: usize,
    pub total_spend: Decimal,
    pub last_order_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub current_stock: Decimal,
    pub min_stock_level: Decimal,
    /// Quantity needed to land at twice the reorder threshold
    pub suggested_quantity: Decimal,
    pub lead_time_days: i32,
    pub expected_arrival: NaiveDate,
}

pub struct ReportingService {
    inventory: Arc<InventoryService>,
}

impl ReportingService {
    pub fn new(inventory: Arc<InventoryService>) -> Self {
        Self { inventory }
    }

    /// Headline numbers for the dashboard
    pub async fn dashboard_metrics(&self) -> DashboardMetrics {
        let products = self.inventory.products().await;
        let suppliers = self.inventory.suppliers().await;
        let purchases = self.inventory.purchases().await;

        let today = Utc::now().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);

        DashboardMetrics {
            total_products: products.len(),
            total_suppliers: suppliers.len(),
            total_inventory_value: products
                .iter()
                .map(|p| p.current_stock * p.unit_price)
                .sum(),
            low_stock_count: products.iter().filter(|p| p.is_low_stock()).count(),
            purchases_this_month: purchases
                .iter()
                .filter(|p| p.date >= month_start)
                .map(|p| p.total_price)
                .sum(),
        }
    }

    /// Purchases dated within the range, newest first
    pub async fn purchase_history(&self, range: DateRange) -> Vec<Purchase> {
        let mut purchases: Vec<Purchase> = self
            .inventory
            .purchases()
            .await
            .into_iter()
            .filter(|p| p.date >= range.start && p.date <= range.end)
            .collect();
        purchases.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        purchases
    }

    /// Total purchase spend over a chart period ending today
    pub async fn spend_over_period(&self, period: ChartPeriod) -> Decimal {
        self.inventory
            .recent_purchases(period.days())
            .await
            .iter()
            .map(|p| p.total_price)
            .sum()
    }

    /// Per-supplier order counts and spend, biggest spend first
    pub async fn supplier_performance(&self) -> Vec<SupplierPerformance> {
        let suppliers = self.inventory.suppliers().await;
        let purchases = self.inventory.purchases().await;

        let mut rows: Vec<SupplierPerformance> = suppliers
            .into_iter()
            .map(|supplier| {
                let orders: Vec<&Purchase> = purchases
                    .iter()
                    .filter(|p| p.supplier_id == supplier.id)
                    .collect();
                SupplierPerformance {
                    supplier_id: supplier.id,
                    supplier_name: supplier.name,
                    order_count: orders.len(),
                    total_spend: orders.iter().map(|p| p.total_price).sum(),
                    last_order_date: orders.iter().map(|p| p.date).max(),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.total_spend.cmp(&a.total_spend));
        rows
    }

    /// Reorder sheet for every product at or below its threshold
    pub async fn low_stock_report(&self) -> Vec<ReorderLine> {
        let today = Utc::now().date_naive();
        self.inventory
            .low_stock_products()
            .await
            .into_iter()
            .map(|p| {
                let target = p.min_stock_level * Decimal::from(2);
                ReorderLine {
                    product_id: p.id,
                    product_name: p.name,
                    current_stock: p.current_stock,
                    min_stock_level: p.min_stock_level,
                    suggested_quantity: (target - p.current_stock).max(Decimal::ZERO),
                    lead_time_days: p.lead_time,
                    expected_arrival: today + Duration::days(p.lead_time.max(0) as i64),
                }
            })
            .collect()
    }

    /// Render any report rows as a CSV document
    pub fn export_to_csv<T: Serialize>(&self, rows: &[T]) -> AppResult<String> {
        let mut writer = csv::Writer::from_writer(vec![]);
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| AppError::Internal(format!("CSV serialization failed: {e}")))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer flush failed: {e}")))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding failed: {e}")))
    }
}
