//! Remote data gateway
//!
//! Thin client to the hosted table backend: three tables (`products`,
//! `suppliers`, `purchases`) whose lower-snake-case columns are mapped
//! field-by-field onto the domain records. Lists order products and suppliers
//! by name and purchases by date descending; inserts return the stored row.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{Change, Collections, InventoryBackend};
use shared::models::{Product, Purchase, Supplier};
use shared::types::{PaymentMethod, Unit};

/// Gateway to the hosted table backend
#[derive(Clone)]
pub struct RemoteGateway {
    db: PgPool,
}

/// Wire representation of a product row
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    barcode: Option<String>,
    category: String,
    unit: String,
    unit_price: Decimal,
    current_stock: Decimal,
    min_stock_level: Decimal,
    lead_time: i32,
    notes: Option<String>,
    added_date: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> AppResult<Self> {
        let unit = Unit::parse(&row.unit).ok_or_else(|| {
            AppError::Internal(format!("unknown unit '{}' on product {}", row.unit, row.id))
        })?;
        Ok(Product {
            id: row.id,
            name: row.name,
            barcode: row.barcode,
            category: row.category,
            unit,
            unit_price: row.unit_price,
            current_stock: row.current_stock,
            min_stock_level: row.min_stock_level,
            lead_time: row.lead_time,
            notes: row.notes,
            added_date: row.added_date,
            last_updated: row.last_updated,
        })
    }
}

/// Wire representation of a supplier row
#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    contact_person: Option<String>,
    email: Option<String>,
    phone: String,
    address: Option<String>,
    notes: Option<String>,
    added_date: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            contact_person: row.contact_person,
            email: row.email,
            phone: row.phone,
            address: row.address,
            notes: row.notes,
            added_date: row.added_date,
            last_updated: row.last_updated,
        }
    }
}

/// Wire representation of a purchase row
#[derive(Debug, FromRow)]
struct PurchaseRow {
    id: Uuid,
    date: NaiveDate,
    product_id: Uuid,
    product_name: String,
    quantity: Decimal,
    unit_price: Decimal,
    total_price: Decimal,
    supplier_id: Uuid,
    supplier_name: String,
    payment_method: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = AppError;

    fn try_from(row: PurchaseRow) -> AppResult<Self> {
        let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
            AppError::Internal(format!(
                "unknown payment method '{}' on purchase {}",
                row.payment_method, row.id
            ))
        })?;
        Ok(Purchase {
            id: row.id,
            date: row.date,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            payment_method,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

impl RemoteGateway {
    /// Create a gateway over an established connection pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List products ordered by name
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, barcode, category, unit, unit_price, current_stock,
                   min_stock_level, lead_time, notes, added_date, last_updated
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Insert a product and return the stored row
    pub async fn insert_product(&self, product: &Product) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (
                id, name, barcode, category, unit, unit_price, current_stock,
                min_stock_level, lead_time, notes, added_date, last_updated
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, name, barcode, category, unit, unit_price, current_stock,
                      min_stock_level, lead_time, notes, added_date, last_updated
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(&product.category)
        .bind(product.unit.as_str())
        .bind(product.unit_price)
        .bind(product.current_stock)
        .bind(product.min_stock_level)
        .bind(product.lead_time)
        .bind(&product.notes)
        .bind(product.added_date)
        .bind(product.last_updated)
        .fetch_one(&self.db)
        .await?;

        Product::try_from(row)
    }

    /// Update a product in place
    pub async fn update_product(&self, product: &Product) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $2, barcode = $3, category = $4, unit = $5, unit_price = $6,
                current_stock = $7, min_stock_level = $8, lead_time = $9, notes = $10,
                last_updated = $11
            WHERE id = $1
            RETURNING id, name, barcode, category, unit, unit_price, current_stock,
                      min_stock_level, lead_time, notes, added_date, last_updated
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(&product.category)
        .bind(product.unit.as_str())
        .bind(product.unit_price)
        .bind(product.current_stock)
        .bind(product.min_stock_level)
        .bind(product.lead_time)
        .bind(&product.notes)
        .bind(product.last_updated)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::ReferenceNotFound {
            entity: "product",
            id: product.id,
        })?;

        Product::try_from(row)
    }

    /// Delete a product by identifier
    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ReferenceNotFound {
                entity: "product",
                id,
            });
        }
        Ok(())
    }

    /// List suppliers ordered by name
    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, name, contact_person, email, phone, address, notes,
                   added_date, last_updated
            FROM suppliers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    /// Insert a supplier and return the stored row
    pub async fn insert_supplier(&self, supplier: &Supplier) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (
                id, name, contact_person, email, phone, address, notes,
                added_date, last_updated
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, contact_person, email, phone, address, notes,
                      added_date, last_updated
            "#,
        )
        .bind(supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact_person)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(&supplier.notes)
        .bind(supplier.added_date)
        .bind(supplier.last_updated)
        .fetch_one(&self.db)
        .await?;

        Ok(Supplier::from(row))
    }

    /// Update a supplier in place
    pub async fn update_supplier(&self, supplier: &Supplier) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            UPDATE suppliers
            SET name = $2, contact_person = $3, email = $4, phone = $5,
                address = $6, notes = $7, last_updated = $8
            WHERE id = $1
            RETURNING id, name, contact_person, email, phone, address, notes,
                      added_date, last_updated
            "#,
        )
        .bind(supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact_person)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(&supplier.notes)
        .bind(supplier.last_updated)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::ReferenceNotFound {
            entity: "supplier",
            id: supplier.id,
        })?;

        Ok(Supplier::from(row))
    }

    /// Delete a supplier by identifier
    pub async fn delete_supplier(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ReferenceNotFound {
                entity: "supplier",
                id,
            });
        }
        Ok(())
    }

    /// List purchases, most recent first
    pub async fn list_purchases(&self) -> AppResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT id, date, product_id, product_name, quantity, unit_price,
                   total_price, supplier_id, supplier_name, payment_method,
                   notes, created_at
            FROM purchases
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Purchase::try_from).collect()
    }

    /// Insert a purchase and return the stored row with its server timestamp
    pub async fn insert_purchase(&self, purchase: &Purchase) -> AppResult<Purchase> {
        let row = sqlx::query_as::<_, PurchaseRow>(
            r#"
            INSERT INTO purchases (
                id, date, product_id, product_name, quantity, unit_price,
                total_price, supplier_id, supplier_name, payment_method, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, date, product_id, product_name, quantity, unit_price,
                      total_price, supplier_id, supplier_name, payment_method,
                      notes, created_at
            "#,
        )
        .bind(purchase.id)
        .bind(purchase.date)
        .bind(purchase.product_id)
        .bind(&purchase.product_name)
        .bind(purchase.quantity)
        .bind(purchase.unit_price)
        .bind(purchase.total_price)
        .bind(purchase.supplier_id)
        .bind(&purchase.supplier_name)
        .bind(purchase.payment_method.as_str())
        .bind(&purchase.notes)
        .fetch_one(&self.db)
        .await?;

        Purchase::try_from(row)
    }
}

#[async_trait]
impl InventoryBackend for RemoteGateway {
    async fn load(&self) -> AppResult<Option<Collections>> {
        let products = self.list_products().await?;
        let suppliers = self.list_suppliers().await?;
        let purchases = self.list_purchases().await?;

        Ok(Some(Collections {
            products,
            suppliers,
            purchases,
        }))
    }

    async fn persist(&self, change: &Change, _snapshot: &Collections) -> AppResult<()> {
        match change {
            Change::ProductAdded(product) => {
                self.insert_product(product).await?;
            }
            Change::ProductUpdated(product) => {
                self.update_product(product).await?;
            }
            Change::ProductDeleted(id) => {
                self.delete_product(*id).await?;
            }
            Change::SupplierAdded(supplier) => {
                self.insert_supplier(supplier).await?;
            }
            Change::SupplierUpdated(supplier) => {
                self.update_supplier(supplier).await?;
            }
            Change::SupplierDeleted(id) => {
                self.delete_supplier(*id).await?;
            }
            Change::PurchaseAdded { purchase, product } => {
                self.insert_purchase(purchase).await?;
                self.update_product(product).await?;
            }
        }
        Ok(())
    }
}
