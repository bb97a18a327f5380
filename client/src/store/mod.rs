//! Persistence seam for the inventory collections
//!
//! The inventory container owns the in-memory collections and pushes every
//! committed mutation through an [`InventoryBackend`]: either the local JSON
//! key-value store or the remote table gateway. The two strategies are mutually
//! exclusive per application instance.

pub mod local;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use shared::models::{Product, Purchase, Supplier};

/// Snapshot of every collection owned by the inventory container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Collections {
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
    pub purchases: Vec<Purchase>,
}

/// A single committed mutation
///
/// Backends that persist whole collections use the accompanying snapshot;
/// backends that persist per record act on the change itself.
#[derive(Debug, Clone)]
pub enum Change {
    ProductAdded(Product),
    ProductUpdated(Product),
    ProductDeleted(Uuid),
    SupplierAdded(Supplier),
    SupplierUpdated(Supplier),
    SupplierDeleted(Uuid),
    /// A purchase also carries the product whose stock it incremented
    PurchaseAdded {
        purchase: Purchase,
        product: Product,
    },
}

/// Durable home of the inventory collections
#[async_trait]
pub trait InventoryBackend: Send + Sync {
    /// Load all collections; `None` means nothing has been persisted yet and
    /// the caller should fall back to built-in sample data
    async fn load(&self) -> AppResult<Option<Collections>>;

    /// Persist one committed mutation. `snapshot` reflects the collections
    /// after the mutation was applied in memory.
    async fn persist(&self, change: &Change, snapshot: &Collections) -> AppResult<()>;
}
