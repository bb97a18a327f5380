//! Purchase transaction models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::PaymentMethod;

/// A recorded purchase of inbound stock
///
/// Immutable once recorded. `product_name` and `supplier_name` are copied onto
/// the record at entry time so the history stays accurate even after the
/// referenced product or supplier is renamed or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub date: NaiveDate,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
    /// Price paid per unit at the time of purchase
    pub unit_price: Decimal,
    /// quantity x unit_price, computed at entry and stored
    pub total_price: Decimal,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchase {
    /// Defaults to today when omitted
    pub date: Option<NaiveDate>,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub supplier_id: Uuid,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}
