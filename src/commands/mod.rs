mod config_cmd;
mod dashboard;
mod list;
mod output;
mod recipes;
mod scan;
mod session;

use chrono::{DateTime, NaiveDate, Utc};
use pantry_core::start_of_day;

pub use config_cmd::ConfigCommand;
pub use dashboard::DashboardCommand;
pub use list::{print_categories, ListCommand};
pub use recipes::RecipesCommand;
pub use scan::ScanCommand;
pub use session::SessionCommand;

/// Start of `at` (UTC) when given, otherwise the current instant.
fn reference_time(at: Option<NaiveDate>) -> DateTime<Utc> {
    at.map(start_of_day).unwrap_or_else(Utc::now)
}
