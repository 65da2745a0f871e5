//! Single-writer access to an inventory shared between tasks.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::{ImportError, InventoryError};
use super::store::{Inventory, ItemHandle};
use crate::models::{GroceryItem, RawItem};
use crate::sources::ReceiptScanner;

/// Cloneable handle to one inventory. Every mutation runs under the same
/// lock, so handle-based edits and batch inserts never interleave.
#[derive(Debug, Clone, Default)]
pub struct SharedInventory {
    inner: Arc<Mutex<Inventory>>,
}

impl SharedInventory {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inventory)),
        }
    }

    pub async fn add(&self, item: GroceryItem) -> ItemHandle {
        self.inner.lock().await.add(item)
    }

    /// Validate `raw` with the store's policy and append it.
    pub async fn add_raw(&self, raw: &RawItem, today: NaiveDate) -> Result<ItemHandle, InventoryError> {
        self.inner.lock().await.add_raw(raw, today)
    }

    pub async fn update_raw(
        &self,
        handle: ItemHandle,
        raw: &RawItem,
        today: NaiveDate,
    ) -> Result<GroceryItem, InventoryError> {
        self.inner.lock().await.update_raw(handle, raw, today)
    }

    pub async fn update(&self, handle: ItemHandle, item: GroceryItem) -> Result<(), InventoryError> {
        self.inner.lock().await.update(handle, item)
    }

    pub async fn remove(&self, handle: ItemHandle) -> Result<GroceryItem, InventoryError> {
        self.inner.lock().await.remove(handle)
    }

    pub async fn bulk_add(
        &self,
        raw_items: &[RawItem],
        today: NaiveDate,
    ) -> Result<Vec<ItemHandle>, InventoryError> {
        self.inner.lock().await.bulk_add(raw_items, today)
    }

    /// Run a read-only closure against the current state.
    pub async fn read<R>(&self, f: impl FnOnce(&Inventory) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&*guard)
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> Inventory {
        self.inner.lock().await.clone()
    }

    /// Wait for `scanner`, then add everything it found as one batch.
    ///
    /// The lock is only taken once the scan has finished.
    pub async fn import_scan<S: ReceiptScanner>(
        &self,
        scanner: &S,
        today: NaiveDate,
    ) -> Result<Vec<ItemHandle>, ImportError> {
        let raw_items = scanner.scan().await?;
        let handles = self.bulk_add(&raw_items, today).await?;
        tracing::info!(count = handles.len(), "Imported scanned items");
        Ok(handles)
    }
}
