//! Canned collaborators for demos and tests.

use chrono::NaiveDate;
use std::time::Duration;

use super::{CollaboratorError, ReceiptScanner, RecipeGenerator};
use crate::models::{Category, Difficulty, GroceryItem, RawItem, Recipe};

/// Pretends to read a receipt, answering with fixed items after `delay`.
#[derive(Debug, Clone)]
pub struct SampleReceiptScanner {
    pub delay: Duration,
}

impl SampleReceiptScanner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SampleReceiptScanner {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

impl ReceiptScanner for SampleReceiptScanner {
    async fn scan(&self) -> Result<Vec<RawItem>, CollaboratorError> {
        tokio::time::sleep(self.delay).await;
        let items = sample_scanned_items();
        tracing::debug!(count = items.len(), "Sample receipt scanned");
        Ok(items)
    }
}

/// Pretends to generate recipes, answering with fixed suggestions after `delay`.
#[derive(Debug, Clone)]
pub struct SampleRecipeGenerator {
    pub delay: Duration,
}

impl SampleRecipeGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SampleRecipeGenerator {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

impl RecipeGenerator for SampleRecipeGenerator {
    async fn generate(&self, pantry: &[GroceryItem]) -> Result<Vec<Recipe>, CollaboratorError> {
        tokio::time::sleep(self.delay).await;
        tracing::debug!(pantry_size = pantry.len(), "Sample recipes generated");
        Ok(sample_recipes())
    }
}

/// Items found on the sample receipt.
pub fn sample_scanned_items() -> Vec<RawItem> {
    vec![
        RawItem::new("Organic Bananas", "Fruits", "2024-06-08")
            .with_quantity("6 pieces")
            .with_purchase_date("2024-06-01"),
        RawItem::new("Whole Milk", "Dairy", "2024-06-10")
            .with_quantity("1 liter")
            .with_purchase_date("2024-06-01"),
        RawItem::new("Bread", "Grains", "2024-06-05")
            .with_quantity("1 loaf")
            .with_purchase_date("2024-06-01"),
    ]
}

/// The pantry a fresh demo session starts with.
pub fn demo_pantry() -> Vec<GroceryItem> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        GroceryItem::new("Bananas", Category::Fruits, date(2024, 6, 3))
            .with_quantity("6 pieces")
            .with_purchase_date(date(2024, 5, 30)),
        GroceryItem::new("Milk", Category::Dairy, date(2024, 6, 5))
            .with_quantity("1 liter")
            .with_purchase_date(date(2024, 5, 28)),
        GroceryItem::new("Chicken Breast", Category::Meat, date(2024, 6, 2))
            .with_quantity("500g")
            .with_purchase_date(date(2024, 5, 30)),
        GroceryItem::new("Bread", Category::Grains, date(2024, 6, 4))
            .with_quantity("1 loaf")
            .with_purchase_date(date(2024, 6, 1)),
    ]
}

pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("Quick Vegetable Stir-Fry")
            .with_description("A healthy and quick meal using fresh vegetables from your pantry")
            .with_cook_time(15)
            .with_difficulty(Difficulty::Easy)
            .with_servings(2)
            .with_ingredients(["Vegetables", "Oil", "Garlic", "Soy sauce"])
            .with_instructions([
                "Heat oil in a large wok or skillet over high heat",
                "Add garlic and stir-fry for 30 seconds until fragrant",
                "Add vegetables starting with harder ones first",
                "Stir-fry for 3-5 minutes until vegetables are crisp-tender",
                "Add soy sauce and toss to combine",
                "Serve immediately over rice",
            ]),
        Recipe::new("Creamy Pasta with Available Ingredients")
            .with_description("Delicious pasta dish using dairy and pantry items you have")
            .with_cook_time(20)
            .with_difficulty(Difficulty::Medium)
            .with_servings(3)
            .with_ingredients(["Pasta", "Milk", "Cheese", "Herbs"])
            .with_instructions([
                "Cook pasta according to package directions",
                "In a large pan, warm milk over medium heat",
                "Add cheese and stir until melted",
                "Add cooked pasta and toss with sauce",
                "Season with herbs and serve hot",
            ]),
        Recipe::new("Fresh Fruit Smoothie Bowl")
            .with_description("Healthy breakfast using fruits nearing expiration")
            .with_cook_time(5)
            .with_difficulty(Difficulty::Easy)
            .with_servings(1)
            .with_ingredients(["Fruits", "Yogurt", "Honey", "Granola"])
            .with_instructions([
                "Blend fruits with yogurt until smooth",
                "Pour into a bowl",
                "Drizzle with honey",
                "Top with granola and additional fruit pieces",
            ]),
    ]
}
