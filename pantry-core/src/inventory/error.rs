//! Inventory error types.

use thiserror::Error;

use super::ItemHandle;
use crate::models::ValidationError;
use crate::sources::CollaboratorError;

/// Errors returned by inventory mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The handle does not refer to a live item (already removed, or from another store)
    #[error("Item not found: {0}")]
    NotFound(ItemHandle),

    /// A single record failed validation
    #[error("Invalid item: {0}")]
    Invalid(#[from] ValidationError),

    /// A batch was refused as a whole; `index` is the first failing record (0-based)
    #[error("Batch rejected at item {}: {source}", .index + 1)]
    BatchRejected {
        index: usize,
        source: ValidationError,
    },
}

/// Errors from importing a scan into a shared inventory.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Scan failed: {0}")]
    Scan(#[from] CollaboratorError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}
