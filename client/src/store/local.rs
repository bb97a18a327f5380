//! Local durable key-value store
//!
//! One JSON file per named key under a data directory, mirroring the keys the
//! application persists: `products`, `suppliers`, `purchases`, `user`,
//! `authToken`, `registeredUsers`, `rememberUser`. A missing key reads as
//! `None`; callers substitute built-in defaults.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};
use crate::store::{Change, Collections, InventoryBackend};

/// Store key constants
pub mod keys {
    pub const PRODUCTS: &str = "products";
    pub const SUPPLIERS: &str = "suppliers";
    pub const PURCHASES: &str = "purchases";
    pub const USER: &str = "user";
    pub const AUTH_TOKEN: &str = "authToken";
    pub const REGISTERED_USERS: &str = "registeredUsers";
    pub const REMEMBER_USER: &str = "rememberUser";
}

/// File-backed key-value store
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| AppError::Storage(format!("cannot create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read and deserialize the value stored under `key`
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let value = serde_json::from_slice(&bytes)?;
        Ok(Some(value))
    }

    /// Serialize and write `value` under `key`
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let path = self.path_for(key);
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            AppError::Storage(format!("failed to write {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Remove the value stored under `key`; absent keys are not an error
    pub async fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl InventoryBackend for LocalStore {
    async fn load(&self) -> AppResult<Option<Collections>> {
        let products = self.get(keys::PRODUCTS).await?;
        let suppliers = self.get(keys::SUPPLIERS).await?;
        let purchases = self.get(keys::PURCHASES).await?;

        if products.is_none() && suppliers.is_none() && purchases.is_none() {
            return Ok(None);
        }

        Ok(Some(Collections {
            products: products.unwrap_or_default(),
            suppliers: suppliers.unwrap_or_default(),
            purchases: purchases.unwrap_or_default(),
        }))
    }

    async fn persist(&self, change: &Change, snapshot: &Collections) -> AppResult<()> {
        // Full-collection writes, but only of the collections the change touched
        match change {
            Change::ProductAdded(_) | Change::ProductUpdated(_) | Change::ProductDeleted(_) => {
                self.put(keys::PRODUCTS, &snapshot.products).await
            }
            Change::SupplierAdded(_)
            | Change::SupplierUpdated(_)
            | Change::SupplierDeleted(_) => {
                self.put(keys::SUPPLIERS, &snapshot.suppliers).await
            }
            Change::PurchaseAdded { .. } => {
                self.put(keys::PURCHASES, &snapshot.purchases).await?;
                self.put(keys::PRODUCTS, &snapshot.products).await
            }
        }
    }
}
