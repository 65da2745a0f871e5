//! Text and JSON rendering shared by the commands.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use pantry_core::{classify, DashboardSummary, Entry, GroceryItem, RankedRecipe, RawItem};

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One pantry line: row number, name, category, quantity, expiry and badge.
pub fn format_item_row(row: usize, item: &GroceryItem, reference: DateTime<Utc>) -> String {
    let freshness = classify(item, reference);
    format!(
        "{:>3}. {:<24} {:<11} {:<12} {}  [{}]",
        row,
        item.name,
        item.category.to_string(),
        item.quantity.as_deref().unwrap_or("-"),
        item.expiration_date,
        freshness.label()
    )
}

pub fn print_items(entries: &[&Entry], reference: DateTime<Utc>, total: usize) {
    if entries.is_empty() {
        println!("No items found.");
        if total == 0 {
            println!("\nStart by adding some groceries to your pantry.");
        } else {
            println!("\nTry adjusting your search or filters.");
        }
        return;
    }

    for (i, entry) in entries.iter().enumerate() {
        println!("{}", format_item_row(i + 1, entry.item(), reference));
    }
    println!("{}", "-".repeat(44));
    println!("{} of {} items", entries.len(), total);
}

/// Preview of scanned receipt lines, before they are validated and added.
pub fn format_scanned(raw_items: &[RawItem]) -> String {
    if raw_items.is_empty() {
        return "The receipt had no items.\n".to_string();
    }

    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let mut out = format!("Scanned {} items:\n", raw_items.len());
    for (i, raw) in raw_items.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<24} {:<11} {:<12} {}\n",
            i + 1,
            field(&raw.name),
            field(&raw.category),
            field(&raw.quantity),
            field(&raw.expiration_date),
        ));
    }
    out
}

pub fn items_json(entries: &[&Entry], reference: DateTime<Utc>) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let freshness = classify(entry.item(), reference);
            serde_json::json!({
                "row": i + 1,
                "handle": entry.handle(),
                "item": entry.item(),
                "status": freshness.status,
                "days_remaining": freshness.days_remaining,
                "label": freshness.label(),
            })
        })
        .collect();
    serde_json::Value::Array(rows)
}

pub fn format_summary(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    out.push_str("Pantry Dashboard\n");
    out.push_str(&"=".repeat(44));
    out.push('\n');
    out.push_str(&format!("Total items:     {}\n", summary.total_count));
    out.push_str(&format!("Expiring soon:   {}  (next 3 days)\n", summary.expiring_soon_count));
    out.push_str(&format!("Expiring today:  {}  (use immediately)\n", summary.expiring_today_count));
    out.push_str(&format!("Expired:         {}  (should be discarded)\n", summary.expired_count));
    out.push('\n');
    out.push_str("Items Expiring Soon\n");
    out.push_str(&"-".repeat(44));
    out.push('\n');

    if summary.top_expiring_soon.is_empty() {
        out.push_str("No items expiring soon!\n");
    } else {
        for expiring in &summary.top_expiring_soon {
            out.push_str(&format!(
                "  {:<24} {:<11} {}\n",
                expiring.item.name,
                expiring.item.category.to_string(),
                expiring.freshness.label()
            ));
        }
    }
    out
}

pub fn format_ranked(ranked: &RankedRecipe) -> String {
    let recipe = &ranked.recipe;
    let mut out = format!(
        "{} [{}/{} {}]\n",
        recipe.name, ranked.available_count, ranked.total_count, ranked.availability
    );
    if !recipe.description.is_empty() {
        out.push_str(&format!("  {}\n", recipe.description));
    }
    out.push_str(&format!(
        "  {} min | {} servings | {}\n",
        recipe.cook_time_minutes, recipe.servings, recipe.difficulty
    ));
    out.push_str(&format!("  Ingredients: {}\n", recipe.ingredients.join(", ")));
    if !ranked.missing.is_empty() {
        out.push_str(&format!("  Missing: {}\n", ranked.missing.join(", ")));
    }
    out
}

/// Full recipe with its steps, headed by how much of it is on hand.
pub fn format_recipe_detail(ranked: &RankedRecipe) -> String {
    let mut out = format!(
        "On hand: {}/{} ingredients ({})\n",
        ranked.available_count, ranked.total_count, ranked.availability
    );
    if !ranked.missing.is_empty() {
        out.push_str(&format!("Missing: {}\n", ranked.missing.join(", ")));
    }
    out.push('\n');
    out.push_str(&ranked.recipe.to_string());
    out
}

pub fn print_ranked(ranked: &[RankedRecipe]) {
    if ranked.is_empty() {
        println!("No recipe suggestions.");
        return;
    }
    for (i, recipe) in ranked.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}. {}", i + 1, format_ranked(recipe));
    }
}
