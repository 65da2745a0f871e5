use chrono::NaiveDate;
use clap::Args;
use pantry_core::{CategoryFilter, Inventory};

use super::output::{items_json, print_items, OutputFormat};
use super::reference_time;

#[derive(Args)]
pub struct ListCommand {
    /// Only items whose name contains this text (case-insensitive)
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only items in this category ("all" for every category)
    #[arg(long, short = 'C', default_value = "all")]
    pub category: CategoryFilter,

    /// Reference date (YYYY-MM-DD), defaults to now
    #[arg(long)]
    pub at: Option<NaiveDate>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ListCommand {
    pub fn run(&self, inventory: &Inventory) -> Result<(), Box<dyn std::error::Error>> {
        let reference = reference_time(self.at);
        let entries = inventory.search(self.search.as_deref().unwrap_or(""), self.category);

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&items_json(&entries, reference))?)
            }
            OutputFormat::Text => print_items(&entries, reference, inventory.len()),
        }
        Ok(())
    }
}

/// Category choices for the current inventory.
pub fn print_categories(inventory: &Inventory) {
    for filter in inventory.distinct_categories() {
        let count = inventory.filter_by_category(filter).len();
        println!("{:<16} {}", filter.to_string(), count);
    }
}
