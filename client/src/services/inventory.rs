//! Inventory state container
//!
//! Single authoritative in-memory holder of products, suppliers and purchases
//! for the session. All collections sit behind one async mutex, so every
//! logical operation (including the purchase lookup/stock-increment pair) is
//! serialized; two overlapping purchase recordings cannot lose an update.
//!
//! Persistence is fire-and-forget: a failed write is logged and retained as a
//! user-facing error string, but the in-memory mutation stands. In-memory and
//! persisted state may diverge until the next successful write.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::sample;
use crate::store::{Change, Collections, InventoryBackend};
use shared::models::{
    NewProduct, NewPurchase, NewSupplier, Product, Purchase, StockAlert, Supplier,
};
use shared::validation;

/// Inventory service owning the session's collections
pub struct InventoryService {
    state: Mutex<Collections>,
    backend: Arc<dyn InventoryBackend>,
    last_error: Mutex<Option<String>>,
}

impl InventoryService {
    /// Create an empty container over a persistence backend
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self {
            state: Mutex::new(Collections::default()),
            backend,
            last_error: Mutex::new(None),
        }
    }

    /// Load collections from the backend
    ///
    /// Nothing persisted yet means the built-in sample data. A storage-level
    /// read failure also falls back to sample data and retains a non-fatal
    /// error message; a remote-gateway failure propagates so the caller can
    /// offer a retry.
    pub async fn hydrate(&self) -> AppResult<()> {
        let loaded = match self.backend.load().await {
            Ok(loaded) => loaded,
            Err(err @ AppError::Database(_)) => return Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load saved inventory");
                self.set_error("Failed to load saved data. Using default data.")
                    .await;
                None
            }
        };

        let mut state = self.state.lock().await;
        *state = loaded.unwrap_or_else(sample::default_collections);
        tracing::info!(
            products = state.products.len(),
            suppliers = state.suppliers.len(),
            purchases = state.purchases.len(),
            "inventory hydrated"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    /// Add a product to the catalog
    pub async fn add_product(&self, input: NewProduct) -> AppResult<Product> {
        Self::validate_product_numbers(
            input.unit_price,
            input.current_stock,
            input.min_stock_level,
            input.lead_time,
        )?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name,
            barcode: input.barcode,
            category: input.category,
            unit: input.unit,
            unit_price: input.unit_price,
            current_stock: input.current_stock,
            min_stock_level: input.min_stock_level,
            lead_time: input.lead_time,
            notes: input.notes,
            added_date: now,
            last_updated: now,
        };

        let mut state = self.state.lock().await;
        state.products.push(product.clone());
        self.persist(Change::ProductAdded(product.clone()), &state)
            .await;
        Ok(product)
    }

    /// Replace the product whose identifier matches, refreshing its
    /// last-updated timestamp
    pub async fn update_product(&self, mut product: Product) -> AppResult<Product> {
        Self::validate_product_numbers(
            product.unit_price,
            product.current_stock,
            product.min_stock_level,
            product.lead_time,
        )?;

        let mut state = self.state.lock().await;
        let slot = state
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(AppError::ReferenceNotFound {
                entity: "product",
                id: product.id,
            })?;
        product.last_updated = Utc::now();
        *slot = product.clone();
        self.persist(Change::ProductUpdated(product.clone()), &state)
            .await;
        Ok(product)
    }

    /// Remove a product from the catalog
    ///
    /// Purchases referencing it are kept untouched; their denormalized copies
    /// of the name and price stay valid.
    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        if state.products.len() == before {
            return Err(AppError::ReferenceNotFound {
                entity: "product",
                id,
            });
        }
        self.persist(Change::ProductDeleted(id), &state).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Suppliers
    // ------------------------------------------------------------------

    /// Add a supplier to the directory
    pub async fn add_supplier(&self, input: NewSupplier) -> AppResult<Supplier> {
        let now = Utc::now();
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: input.name,
            contact_person: input.contact_person,
            email: input.email,
            phone: input.phone,
            address: input.address,
            notes: input.notes,
            added_date: now,
            last_updated: now,
        };

        let mut state = self.state.lock().await;
        state.suppliers.push(supplier.clone());
        self.persist(Change::SupplierAdded(supplier.clone()), &state)
            .await;
        Ok(supplier)
    }

    /// Replace the supplier whose identifier matches
    pub async fn update_supplier(&self, mut supplier: Supplier) -> AppResult<Supplier> {
        let mut state = self.state.lock().await;
        let slot = state
            .suppliers
            .iter_mut()
            .find(|s| s.id == supplier.id)
            .ok_or(AppError::ReferenceNotFound {
                entity: "supplier",
                id: supplier.id,
            })?;
        supplier.last_updated = Utc::now();
        *slot = supplier.clone();
        self.persist(Change::SupplierUpdated(supplier.clone()), &state)
            .await;
        Ok(supplier)
    }

    /// Remove a supplier from the directory
    pub async fn delete_supplier(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let before = state.suppliers.len();
        state.suppliers.retain(|s| s.id != id);
        if state.suppliers.len() == before {
            return Err(AppError::ReferenceNotFound {
                entity: "supplier",
                id,
            });
        }
        self.persist(Change::SupplierDeleted(id), &state).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------

    /// Record an inbound purchase
    ///
    /// Denormalizes the product and supplier names onto the record, stores the
    /// total price computed at entry, and increments the product's current
    /// stock by the purchase quantity, atomically with the lookup under the
    /// state lock. Purchases are immutable once recorded; no decrement
    /// operation exists anywhere.
    pub async fn add_purchase(&self, input: NewPurchase) -> AppResult<Purchase> {
        if let Err(message) = validation::validate_quantity(input.quantity) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: message.to_string(),
            });
        }
        if let Err(message) = validation::validate_price(input.unit_price) {
            return Err(AppError::Validation {
                field: "unitPrice".to_string(),
                message: message.to_string(),
            });
        }

        let mut state = self.state.lock().await;

        let product_name = state
            .products
            .iter()
            .find(|p| p.id == input.product_id)
            .map(|p| p.name.clone())
            .ok_or(AppError::ReferenceNotFound {
                entity: "product",
                id: input.product_id,
            })?;
        let supplier_name = state
            .suppliers
            .iter()
            .find(|s| s.id == input.supplier_id)
            .map(|s| s.name.clone())
            .ok_or(AppError::ReferenceNotFound {
                entity: "supplier",
                id: input.supplier_id,
            })?;

        let purchase = Purchase {
            id: Uuid::new_v4(),
            date: input.date.unwrap_or_else(|| Utc::now().date_naive()),
            product_id: input.product_id,
            product_name,
            quantity: input.quantity,
            unit_price: input.unit_price,
            total_price: input.quantity * input.unit_price,
            supplier_id: input.supplier_id,
            supplier_name,
            payment_method: input.payment_method,
            notes: input.notes,
            created_at: Utc::now(),
        };
        state.purchases.push(purchase.clone());

        // Increment-by-delta against the single source of truth; the lock is
        // still held, so this cannot interleave with another purchase.
        let updated = {
            let product = state
                .products
                .iter_mut()
                .find(|p| p.id == purchase.product_id)
                .ok_or(AppError::ReferenceNotFound {
                    entity: "product",
                    id: purchase.product_id,
                })?;
            product.current_stock += purchase.quantity;
            product.last_updated = Utc::now();
            product.clone()
        };

        self.persist(
            Change::PurchaseAdded {
                purchase: purchase.clone(),
                product: updated,
            },
            &state,
        )
        .await;
        Ok(purchase)
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Snapshot of the product collection
    pub async fn products(&self) -> Vec<Product> {
        self.state.lock().await.products.clone()
    }

    /// Snapshot of the supplier collection
    pub async fn suppliers(&self) -> Vec<Supplier> {
        self.state.lock().await.suppliers.clone()
    }

    /// Snapshot of the purchase collection
    pub async fn purchases(&self) -> Vec<Purchase> {
        self.state.lock().await.purchases.clone()
    }

    /// Products at or below their reorder threshold, in collection order
    pub async fn low_stock_products(&self) -> Vec<Product> {
        self.state
            .lock()
            .await
            .products
            .iter()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect()
    }

    /// Alert rows for the low-stock products
    pub async fn stock_alerts(&self) -> Vec<StockAlert> {
        self.state
            .lock()
            .await
            .products
            .iter()
            .filter(|p| p.is_low_stock())
            .map(|p| StockAlert {
                product_id: p.id,
                product_name: p.name.clone(),
                current_stock: p.current_stock,
                min_stock_level: p.min_stock_level,
                status: p.stock_status(),
            })
            .collect()
    }

    /// Purchases dated within `days` calendar days of today, in collection
    /// order. `days = 0` means "dated today or later".
    pub async fn recent_purchases(&self, days: i64) -> Vec<Purchase> {
        let cutoff = Utc::now().date_naive() - Duration::days(days);
        self.state
            .lock()
            .await
            .purchases
            .iter()
            .filter(|p| p.date >= cutoff)
            .cloned()
            .collect()
    }

    /// Quantity-weighted mean unit price across the product's purchases,
    /// falling back to the reference price when no purchases exist
    pub async fn average_purchase_price(&self, product_id: Uuid) -> AppResult<Decimal> {
        let state = self.state.lock().await;
        let product = state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or(AppError::ReferenceNotFound {
                entity: "product",
                id: product_id,
            })?;

        let mut total_value = Decimal::ZERO;
        let mut total_quantity = Decimal::ZERO;
        for purchase in state.purchases.iter().filter(|p| p.product_id == product_id) {
            total_value += purchase.total_price;
            total_quantity += purchase.quantity;
        }

        if total_quantity > Decimal::ZERO {
            Ok(total_value / total_quantity)
        } else {
            Ok(product.unit_price)
        }
    }

    // ------------------------------------------------------------------
    // Error state
    // ------------------------------------------------------------------

    /// Last persistence failure, retained for the presentation layer
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.lock().await.clone()
    }

    /// Clear the retained error after the user has seen it
    pub async fn clear_error(&self) {
        *self.last_error.lock().await = None;
    }

    async fn set_error(&self, message: &str) {
        *self.last_error.lock().await = Some(message.to_string());
    }

    /// Push a committed mutation to the backend without rolling back on failure
    async fn persist(&self, change: Change, snapshot: &Collections) {
        match self.backend.persist(&change, snapshot).await {
            Ok(()) => self.clear_error().await,
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist inventory change");
                self.set_error(&err.user_message()).await;
            }
        }
    }

    fn validate_product_numbers(
        unit_price: Decimal,
        current_stock: Decimal,
        min_stock_level: Decimal,
        lead_time: i32,
    ) -> AppResult<()> {
        let checks = [
            ("unitPrice", validation::validate_price(unit_price)),
            ("currentStock", validation::validate_stock_level(current_stock)),
            (
                "minStockLevel",
                validation::validate_stock_level(min_stock_level),
            ),
            ("leadTime", validation::validate_lead_time(lead_time)),
        ];
        for (field, result) in checks {
            if let Err(message) = result {
                return Err(AppError::Validation {
                    field: field.to_string(),
                    message: message.to_string(),
                });
            }
        }
        Ok(())
    }
}
