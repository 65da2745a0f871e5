//! File-backed collaborators and session seeding.
//!
//! Item and recipe files are YAML or JSON lists; JSON is read through the
//! YAML parser as well.

use chrono::NaiveDate;
use pantry_core::sources::{demo_pantry, SampleReceiptScanner, SampleRecipeGenerator};
use pantry_core::{
    CollaboratorError, GroceryItem, Inventory, RawItem, ReceiptScanner, Recipe, RecipeGenerator,
};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;

/// Reads "scanned" receipt lines from a file.
#[derive(Debug, Clone)]
pub struct FileReceiptScanner {
    path: PathBuf,
}

impl FileReceiptScanner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReceiptScanner for FileReceiptScanner {
    async fn scan(&self) -> Result<Vec<RawItem>, CollaboratorError> {
        read_list(&self.path).await
    }
}

/// Serves recipes from a catalog file, whatever the pantry holds.
#[derive(Debug, Clone)]
pub struct CatalogRecipeGenerator {
    path: PathBuf,
}

impl CatalogRecipeGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecipeGenerator for CatalogRecipeGenerator {
    async fn generate(&self, _pantry: &[GroceryItem]) -> Result<Vec<Recipe>, CollaboratorError> {
        read_list(&self.path).await
    }
}

/// Scanner chosen by the command line: a file if given, otherwise the sample receipt.
pub enum Scanner {
    File(FileReceiptScanner),
    Sample(SampleReceiptScanner),
}

impl Scanner {
    pub fn from_config(file: Option<&Path>, config: &Config) -> Self {
        match file {
            Some(path) => Scanner::File(FileReceiptScanner::new(path)),
            None => Scanner::Sample(SampleReceiptScanner::new(config.scan_delay())),
        }
    }
}

impl ReceiptScanner for Scanner {
    async fn scan(&self) -> Result<Vec<RawItem>, CollaboratorError> {
        match self {
            Scanner::File(scanner) => scanner.scan().await,
            Scanner::Sample(scanner) => scanner.scan().await,
        }
    }
}

/// Recipe generator chosen by configuration.
pub enum Generator {
    Catalog(CatalogRecipeGenerator),
    Sample(SampleRecipeGenerator),
}

impl Generator {
    pub fn from_config(config: &Config) -> Self {
        match &config.recipe_catalog.value {
            Some(path) => Generator::Catalog(CatalogRecipeGenerator::new(path)),
            None => Generator::Sample(SampleRecipeGenerator::new(config.recipe_delay())),
        }
    }
}

impl RecipeGenerator for Generator {
    async fn generate(&self, pantry: &[GroceryItem]) -> Result<Vec<Recipe>, CollaboratorError> {
        match self {
            Generator::Catalog(generator) => generator.generate(pantry).await,
            Generator::Sample(generator) => generator.generate(pantry).await,
        }
    }
}

/// Wraps a collaborator so every call gives up after `limit`.
pub struct Timed<C> {
    inner: C,
    limit: Duration,
}

impl<C> Timed<C> {
    pub fn new(inner: C, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

impl<C: ReceiptScanner + Sync> ReceiptScanner for Timed<C> {
    async fn scan(&self) -> Result<Vec<RawItem>, CollaboratorError> {
        with_timeout("receipt scanner", self.limit, self.inner.scan()).await
    }
}

impl<C: RecipeGenerator + Sync> RecipeGenerator for Timed<C> {
    async fn generate(&self, pantry: &[GroceryItem]) -> Result<Vec<Recipe>, CollaboratorError> {
        with_timeout("recipe generator", self.limit, self.inner.generate(pantry)).await
    }
}

/// Await a collaborator, giving up after `limit`.
pub async fn with_timeout<T>(
    what: &'static str,
    limit: Duration,
    call: impl Future<Output = Result<T, CollaboratorError>>,
) -> Result<T, CollaboratorError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(collaborator = what, ?limit, "Collaborator timed out");
            Err(CollaboratorError::Timeout(what, limit))
        }
    }
}

/// Build the starting inventory: the demo pantry, an items file, or nothing.
pub async fn load_seed(
    items_file: Option<&Path>,
    demo: bool,
    config: &Config,
    today: NaiveDate,
) -> Result<Inventory, Box<dyn std::error::Error>> {
    let mut inventory = Inventory::with_policy(config.unknown_category.value);

    if demo {
        for item in demo_pantry() {
            inventory.add(item);
        }
        return Ok(inventory);
    }

    let seed = items_file.or(config.seed_file.value.as_deref());
    if let Some(path) = seed {
        let raw_items: Vec<RawItem> = read_list(path).await?;
        let handles = inventory.bulk_add(&raw_items, today)?;
        tracing::info!(count = handles.len(), path = %path.display(), "Loaded inventory");
    }

    Ok(inventory)
}

async fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CollaboratorError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CollaboratorError::Io(path.to_path_buf(), e))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| CollaboratorError::Parse(path.to_path_buf(), e.to_string()))
}
