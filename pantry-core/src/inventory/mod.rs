mod error;
mod shared;
mod store;

pub use error::{ImportError, InventoryError};
pub use shared::SharedInventory;
pub use store::{Entry, Inventory, ItemHandle};
