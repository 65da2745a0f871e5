mod category;
mod grocery_item;
mod recipe;

pub use category::{Category, CategoryFilter, CategoryPolicy};
pub use grocery_item::{Field, GroceryItem, RawItem, ValidationError, DATE_FORMAT};
pub use recipe::{Difficulty, Recipe};
