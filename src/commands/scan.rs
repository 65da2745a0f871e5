use chrono::Utc;
use clap::Args;
use pantry_core::{CollaboratorError, RawItem, ReceiptScanner, SharedInventory};
use std::io::{self, Write};
use std::path::PathBuf;

use super::output::{format_scanned, items_json, print_items, OutputFormat};
use crate::config::Config;
use crate::sources::{Scanner, Timed};

#[derive(Args)]
pub struct ScanCommand {
    /// Receipt file (YAML or JSON list of items); the sample receipt when omitted
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Add the scanned items without asking
    #[arg(long, short)]
    pub yes: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ScanCommand {
    pub async fn run(
        &self,
        inventory: &SharedInventory,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let json = matches!(self.format, OutputFormat::Json);
        if json && !self.yes {
            return Err("--format json needs --yes, there is no prompt to answer".into());
        }

        if !json {
            println!("Scanning receipt...");
        }
        let today = Utc::now().date_naive();

        let handles = if self.yes {
            inventory.import_scan(&scanner(self.file.clone(), config), today).await?
        } else {
            let raw_items = fetch(self.file.clone(), config).await?;
            print!("{}", format_scanned(&raw_items));
            if raw_items.is_empty() {
                return Ok(());
            }

            print!("Add all {} items to your pantry? [y/N] ", raw_items.len());
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !confirmed(&input) {
                println!("Scan discarded.");
                return Ok(());
            }
            inventory.bulk_add(&raw_items, today).await?
        };

        let now = Utc::now();
        inventory
            .read(|inventory| {
                let added: Vec<_> = inventory
                    .iter()
                    .filter(|entry| handles.contains(&entry.handle()))
                    .collect();
                if json {
                    serde_json::to_string_pretty(&items_json(&added, now)).map(|json| println!("{}", json))
                } else {
                    println!("Added {} items to your pantry:\n", added.len());
                    print_items(&added, now, inventory.len());
                    Ok(())
                }
            })
            .await?;
        Ok(())
    }
}

fn scanner(file: Option<PathBuf>, config: &Config) -> Timed<Scanner> {
    Timed::new(
        Scanner::from_config(file.as_deref(), config),
        config.collaborator_timeout(),
    )
}

/// Run the configured scanner under the configured timeout.
pub(super) async fn fetch(
    file: Option<PathBuf>,
    config: &Config,
) -> Result<Vec<RawItem>, CollaboratorError> {
    scanner(file, config).scan().await
}

fn confirmed(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
