use clap::Args;
use pantry_core::{rank, rank_by_availability, GroceryItem, Inventory, RankedRecipe, RecipeGenerator};

use super::output::{format_recipe_detail, print_ranked, OutputFormat};
use crate::config::Config;
use crate::sources::{Generator, Timed};

#[derive(Args)]
pub struct RecipesCommand {
    /// Best-covered recipes first instead of the generator's order
    #[arg(long)]
    pub sorted: bool,

    /// Show the full recipe at this position of the list, with its steps
    #[arg(long, value_name = "N")]
    pub show: Option<usize>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl RecipesCommand {
    pub async fn run(
        &self,
        inventory: &Inventory,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let json = matches!(self.format, OutputFormat::Json);
        if inventory.is_empty() {
            println!("{}", empty_pantry_message(json));
            return Ok(());
        }

        let pantry: Vec<GroceryItem> = inventory.items().cloned().collect();
        if !json {
            println!("Generating recipes from {} pantry items...\n", pantry.len());
        }
        let ranked = suggest(&pantry, config, self.sorted).await?;

        if let Some(row) = self.show {
            let chosen = pick(&ranked, row)?;
            if json {
                println!("{}", serde_json::to_string_pretty(chosen)?);
            } else {
                print!("{}", format_recipe_detail(chosen));
            }
            return Ok(());
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        } else {
            print_ranked(&ranked);
        }
        Ok(())
    }
}

fn empty_pantry_message(json: bool) -> &'static str {
    if json {
        "[]"
    } else {
        "Add some groceries to your pantry first."
    }
}

/// The recipe at 1-based position `row` of a ranked list.
pub(super) fn pick(ranked: &[RankedRecipe], row: usize) -> Result<&RankedRecipe, String> {
    row.checked_sub(1)
        .and_then(|index| ranked.get(index))
        .ok_or_else(|| format!("No recipe {} (there are {})", row, ranked.len()))
}

/// Ask the configured generator for recipes and rank them against `pantry`.
pub(super) async fn suggest(
    pantry: &[GroceryItem],
    config: &Config,
    sorted: bool,
) -> Result<Vec<RankedRecipe>, Box<dyn std::error::Error>> {
    let generator = Timed::new(Generator::from_config(config), config.collaborator_timeout());
    let recipes = generator.generate(pantry).await?;
    tracing::debug!(count = recipes.len(), sorted, "Ranking recipes");

    Ok(if sorted {
        rank_by_availability(&recipes, pantry)
    } else {
        rank(&recipes, pantry)
    })
}
