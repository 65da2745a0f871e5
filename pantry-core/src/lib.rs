//! Pantry Core Library
//!
//! In-memory grocery inventory: item validation, freshness classification,
//! dashboard summaries and recipe availability. Callers always pass the
//! reference time explicitly; nothing in here reads the clock except the
//! `validate` convenience used for a default purchase date.

pub mod freshness;
pub mod inventory;
pub mod matcher;
pub mod models;
pub mod sources;
pub mod summary;

pub use freshness::{classify, classify_on, start_of_day, Freshness, FreshnessStatus};
pub use inventory::{Entry, ImportError, Inventory, InventoryError, ItemHandle, SharedInventory};
pub use matcher::{rank, rank_by_availability, Availability, RankedRecipe};
pub use models::{
    Category, CategoryFilter, CategoryPolicy, Difficulty, Field, GroceryItem, RawItem, Recipe,
    ValidationError,
};
pub use sources::{CollaboratorError, ReceiptScanner, RecipeGenerator};
pub use summary::{summarize, summarize_with_limit, DashboardSummary, ExpiringItem};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
