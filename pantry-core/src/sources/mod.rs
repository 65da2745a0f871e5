//! External collaborators that feed the engine.
//!
//! A receipt scanner produces raw item records and a recipe generator
//! produces recipe suggestions. Both answer asynchronously after an
//! arbitrary delay; the engine only consumes what they return.

mod sample;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::models::{GroceryItem, RawItem, Recipe};

pub use sample::{
    demo_pantry, sample_recipes, sample_scanned_items, SampleReceiptScanner,
    SampleRecipeGenerator,
};

/// Errors reported by collaborators.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Failed to read '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse '{0}': {1}")]
    Parse(PathBuf, String),

    #[error("{0} did not answer within {1:?}")]
    Timeout(&'static str, Duration),
}

/// Source of parsed receipt lines.
pub trait ReceiptScanner {
    fn scan(&self) -> impl Future<Output = Result<Vec<RawItem>, CollaboratorError>> + Send;
}

/// Source of recipe suggestions for the current pantry.
pub trait RecipeGenerator {
    fn generate(
        &self,
        pantry: &[GroceryItem],
    ) -> impl Future<Output = Result<Vec<Recipe>, CollaboratorError>> + Send;
}
