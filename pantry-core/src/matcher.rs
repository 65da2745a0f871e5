//! Recipe availability against the current pantry.
//!
//! Ingredient and item text are lower-cased and split into alphanumeric
//! words. An ingredient is on hand when its words appear, contiguously and
//! in order, among the words of some item's name or category. So "garlic"
//! matches "Fresh Garlic", "vegetables" matches "Mixed Vegetables" or any
//! item in the Vegetables category, and "oil" does not match "Foil".

use serde::Serialize;
use std::fmt;

use crate::models::{GroceryItem, Recipe};

/// Badge severity for a recipe's ingredient coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Everything on hand
    Full,
    /// At least 70% on hand
    Most,
    Few,
}

impl Availability {
    pub fn from_counts(available: usize, total: usize) -> Self {
        if available >= total {
            Availability::Full
        } else if available * 10 >= total * 7 {
            Availability::Most
        } else {
            Availability::Few
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Full => write!(f, "full"),
            Availability::Most => write!(f, "most"),
            Availability::Few => write!(f, "few"),
        }
    }
}

/// A recipe annotated with how much of it the pantry covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecipe {
    pub recipe: Recipe,
    pub available_count: usize,
    pub total_count: usize,
    /// Required ingredients with no matching item, in recipe order
    pub missing: Vec<String>,
    pub availability: Availability,
}

impl RankedRecipe {
    /// Share of ingredients on hand; 1.0 for a recipe without ingredients.
    pub fn ratio(&self) -> f64 {
        if self.total_count == 0 {
            1.0
        } else {
            self.available_count as f64 / self.total_count as f64
        }
    }
}

/// Annotate each recipe with its availability, keeping the input order.
pub fn rank<'a>(
    recipes: &[Recipe],
    items: impl IntoIterator<Item = &'a GroceryItem>,
) -> Vec<RankedRecipe> {
    let pantry = PantryWords::new(items);

    recipes
        .iter()
        .map(|recipe| {
            let missing: Vec<String> = recipe
                .ingredients
                .iter()
                .filter(|ingredient| !pantry.has(ingredient))
                .cloned()
                .collect();
            let total_count = recipe.ingredients.len();
            let available_count = total_count - missing.len();

            RankedRecipe {
                recipe: recipe.clone(),
                available_count,
                total_count,
                missing,
                availability: Availability::from_counts(available_count, total_count),
            }
        })
        .collect()
}

/// Same as [`rank`], then stable-sorted by coverage, best first.
pub fn rank_by_availability<'a>(
    recipes: &[Recipe],
    items: impl IntoIterator<Item = &'a GroceryItem>,
) -> Vec<RankedRecipe> {
    let mut ranked = rank(recipes, items);
    ranked.sort_by(|a, b| b.ratio().total_cmp(&a.ratio()));
    ranked
}

/// Whether a single ingredient is on hand.
pub fn ingredient_available<'a>(
    ingredient: &str,
    items: impl IntoIterator<Item = &'a GroceryItem>,
) -> bool {
    PantryWords::new(items).has(ingredient)
}

/// Pre-split name and category words of every item.
struct PantryWords {
    texts: Vec<Vec<String>>,
}

impl PantryWords {
    fn new<'a>(items: impl IntoIterator<Item = &'a GroceryItem>) -> Self {
        let texts = items
            .into_iter()
            .flat_map(|item| [words(&item.name), words(item.category.as_str())])
            .collect();
        Self { texts }
    }

    fn has(&self, ingredient: &str) -> bool {
        let needle = words(ingredient);
        if needle.is_empty() {
            return false;
        }
        self.texts
            .iter()
            .any(|text| text.windows(needle.len()).any(|w| w == needle.as_slice()))
    }
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
