use chrono::NaiveDate;
use clap::Args;
use pantry_core::{summarize_with_limit, Inventory};

use super::output::{format_summary, OutputFormat};
use super::reference_time;
use crate::config::Config;

#[derive(Args)]
pub struct DashboardCommand {
    /// Reference date (YYYY-MM-DD), defaults to now
    #[arg(long)]
    pub at: Option<NaiveDate>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl DashboardCommand {
    pub fn run(&self, inventory: &Inventory, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let reference = reference_time(self.at);
        let summary = summarize_with_limit(
            inventory.iter(),
            reference,
            config.top_expiring_limit.value,
        );

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Text => print!("{}", format_summary(&summary)),
        }
        Ok(())
    }
}
