//! Interactive session over stdin.
//!
//! Each line is parsed like a small command line of its own. Row numbers
//! refer to the most recent listing, so `edit 2` after `list bread` edits
//! the second bread shown, whatever its position in the whole pantry.
//!
//! A receipt scan runs in the background. Its items are only shown once it
//! finishes, and nothing is added until the user accepts the batch.

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use pantry_core::{
    summarize_with_limit, CategoryFilter, CollaboratorError, InventoryError, ItemHandle,
    RankedRecipe, RawItem, SharedInventory,
};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use super::output::{format_recipe_detail, format_scanned, format_summary, print_items, print_ranked};
use super::{print_categories, recipes, scan};
use crate::config::Config;

#[derive(Args)]
pub struct SessionCommand {
    /// Do not print the prompt (for piped input)
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// List items, optionally filtered by name and category
    #[command(visible_alias = "ls")]
    List {
        /// Text the name must contain
        term: Option<String>,

        #[arg(long, short = 'C', default_value = "all")]
        category: CategoryFilter,
    },
    /// Add an item
    Add {
        name: String,
        category: String,
        /// Expiration date (YYYY-MM-DD)
        expires: String,

        #[arg(long, short)]
        quantity: Option<String>,

        /// Purchase date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        purchased: Option<String>,
    },
    /// Change fields of a listed item
    Edit {
        /// Row number from the last listing
        row: usize,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        expires: Option<String>,

        #[arg(long, short)]
        quantity: Option<String>,

        #[arg(long)]
        purchased: Option<String>,
    },
    /// Remove a listed item
    #[command(visible_alias = "remove")]
    Rm {
        /// Row number from the last listing
        row: usize,
    },
    /// Scan a receipt in the background
    Scan {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show the scanned items waiting to be added
    Pending,
    /// Add every scanned item to the pantry
    Accept,
    /// Drop the scanned items (or cancel a running scan)
    Discard,
    /// Show the dashboard summary
    Dashboard,
    /// Suggest recipes for the current pantry
    Recipes {
        #[arg(long)]
        sorted: bool,
    },
    /// Show a suggested recipe with its steps
    Recipe {
        /// Position in the last recipe list
        row: usize,
    },
    /// List categories present in the pantry
    Categories,
    /// Leave the session
    #[command(visible_alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

impl SessionCommand {
    pub async fn run(
        &self,
        inventory: SharedInventory,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut session = Session::new(inventory, config.clone());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("Pantry session. Type 'help' for commands, 'quit' to leave.");
        loop {
            if !self.quiet {
                print!("pantry> ");
                std::io::stdout().flush()?;
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match session.execute_line(&line).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => eprintln!("Error: {}", e),
            }
        }

        session.finish().await;
        Ok(())
    }
}

struct Session {
    inventory: SharedInventory,
    config: Config,
    /// Handles shown by the last listing, in row order
    last_view: Vec<ItemHandle>,
    last_recipes: Vec<RankedRecipe>,
    scan: Option<JoinHandle<Result<Vec<RawItem>, CollaboratorError>>>,
    /// Finished scan waiting for accept or discard
    pending: Option<Vec<RawItem>>,
}

impl Session {
    fn new(inventory: SharedInventory, config: Config) -> Self {
        Self {
            inventory,
            config,
            last_view: Vec::new(),
            last_recipes: Vec::new(),
            scan: None,
            pending: None,
        }
    }

    async fn execute_line(&mut self, line: &str) -> Result<Flow, Box<dyn std::error::Error>> {
        self.settle_scan(false).await;

        let words = split_words(line)?;
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Help output and usage errors both end up here
                print!("{}", e.render());
                return Ok(Flow::Continue);
            }
        };
        self.execute(parsed.action).await
    }

    async fn execute(&mut self, action: Action) -> Result<Flow, Box<dyn std::error::Error>> {
        let now = Utc::now();
        let today = now.date_naive();

        match action {
            Action::List { term, category } => {
                let term = term.unwrap_or_default();
                let view: Vec<ItemHandle> = self
                    .inventory
                    .read(|inventory| {
                        let entries = inventory.search(&term, category);
                        print_items(&entries, now, inventory.len());
                        entries.iter().map(|entry| entry.handle()).collect()
                    })
                    .await;
                self.last_view = view;
            }
            Action::Add {
                name,
                category,
                expires,
                quantity,
                purchased,
            } => {
                let raw = RawItem {
                    name: Some(name),
                    category: Some(category),
                    quantity,
                    purchase_date: purchased,
                    expiration_date: Some(expires),
                };
                let handle = self.inventory.add_raw(&raw, today).await?;
                let added = self
                    .inventory
                    .read(|inventory| inventory.get(handle).map(ToString::to_string))
                    .await
                    .unwrap_or_default();
                println!("Added {}", added);
            }
            Action::Edit {
                row,
                name,
                category,
                expires,
                quantity,
                purchased,
            } => {
                let handle = self.resolve_row(row)?;
                let current = self
                    .inventory
                    .read(|inventory| inventory.get(handle).cloned())
                    .await
                    .ok_or(InventoryError::NotFound(handle))?;

                let mut raw = RawItem::from(&current);
                if name.is_some() {
                    raw.name = name;
                }
                if category.is_some() {
                    raw.category = category;
                }
                if expires.is_some() {
                    raw.expiration_date = expires;
                }
                if quantity.is_some() {
                    raw.quantity = quantity;
                }
                if purchased.is_some() {
                    raw.purchase_date = purchased;
                }

                let updated = self.inventory.update_raw(handle, &raw, today).await?;
                println!("Updated {}", updated);
            }
            Action::Rm { row } => {
                let handle = self.resolve_row(row)?;
                let removed = self.inventory.remove(handle).await?;
                println!("Removed {}", removed);
            }
            Action::Scan { file } => {
                if self.scan.is_some() || self.pending.is_some() {
                    return Err(
                        "A receipt is already scanned or scanning; 'accept' or 'discard' it first"
                            .into(),
                    );
                }
                let config = self.config.clone();
                self.scan = Some(tokio::spawn(async move { scan::fetch(file, &config).await }));
                println!("Scanning receipt in the background...");
            }
            Action::Pending => {
                self.settle_scan(true).await;
                match &self.pending {
                    Some(raw_items) => print!("{}", format_scanned(raw_items)),
                    None => println!("No scanned items waiting."),
                }
            }
            Action::Accept => {
                self.settle_scan(true).await;
                let raw_items = self.pending.take().ok_or("No scanned items to accept")?;
                let handles = self.inventory.bulk_add(&raw_items, today).await?;
                println!("Added {} items from receipt:\n", handles.len());
                self.inventory
                    .read(|inventory| {
                        let added: Vec<_> = inventory
                            .iter()
                            .filter(|entry| handles.contains(&entry.handle()))
                            .collect();
                        print_items(&added, now, inventory.len());
                    })
                    .await;
                self.last_view = handles;
            }
            Action::Discard => {
                if let Some(running) = self.scan.take() {
                    running.abort();
                    println!("Receipt scan cancelled.");
                }
                if let Some(raw_items) = self.pending.take() {
                    println!("Discarded {} scanned items.", raw_items.len());
                }
            }
            Action::Dashboard => {
                let limit = self.config.top_expiring_limit.value;
                let summary = self
                    .inventory
                    .read(|inventory| summarize_with_limit(inventory.iter(), now, limit))
                    .await;
                print!("{}", format_summary(&summary));
            }
            Action::Recipes { sorted } => {
                let pantry = self.inventory.snapshot().await;
                if pantry.is_empty() {
                    println!("Add some groceries to your pantry first.");
                } else {
                    let items: Vec<_> = pantry.items().cloned().collect();
                    println!("Generating recipes...");
                    self.last_recipes = recipes::suggest(&items, &self.config, sorted).await?;
                    print_ranked(&self.last_recipes);
                }
            }
            Action::Recipe { row } => {
                let chosen = recipes::pick(&self.last_recipes, row)?;
                print!("{}", format_recipe_detail(chosen));
            }
            Action::Categories => {
                self.inventory.read(print_categories).await;
            }
            Action::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn resolve_row(&self, row: usize) -> Result<ItemHandle, String> {
        row.checked_sub(1)
            .and_then(|index| self.last_view.get(index))
            .copied()
            .ok_or_else(|| format!("No row {} in the last listing (run 'list' first)", row))
    }

    /// Move a finished scan into `pending` and preview it. With `wait`, a
    /// running scan is awaited first.
    async fn settle_scan(&mut self, wait: bool) {
        let ready = self
            .scan
            .as_ref()
            .is_some_and(|running| wait || running.is_finished());
        if !ready {
            return;
        }
        let Some(running) = self.scan.take() else {
            return;
        };

        match running.await {
            Ok(Ok(raw_items)) => {
                print!("{}", format_scanned(&raw_items));
                println!("Type 'accept' to add them or 'discard' to drop them.");
                self.pending = Some(raw_items);
            }
            Ok(Err(e)) => eprintln!("Receipt scan failed: {}", e),
            Err(e) => tracing::warn!(error = %e, "Receipt scan task failed"),
        }
    }

    /// Drop scan work nobody accepted.
    async fn finish(&mut self) {
        if let Some(running) = self.scan.take() {
            running.abort();
        }
        if let Some(raw_items) = self.pending.take() {
            println!("Discarding {} scanned items that were not accepted.", raw_items.len());
        }
    }
}

/// Split a line into words, honouring single and double quotes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("Unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::{Category, Inventory};

    fn session() -> Session {
        let mut config = Config::default();
        config.scan_delay_ms.value = 0;
        config.recipe_delay_ms.value = 0;
        Session::new(SharedInventory::new(Inventory::new()), config)
    }

    async fn names(session: &Session) -> Vec<String> {
        session
            .inventory
            .read(|inventory| inventory.items().map(|item| item.name.clone()).collect())
            .await
    }

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words(r#"add "Chicken Breast" Meat 2024-06-02 -q '500 g'"#).unwrap(),
            vec!["add", "Chicken Breast", "Meat", "2024-06-02", "-q", "500 g"]
        );
        assert_eq!(split_words("   ").unwrap(), Vec::<String>::new());
        assert_eq!(split_words(r#"list """#).unwrap(), vec!["list", ""]);
        assert!(split_words(r#"add "Milk"#).is_err());
    }

    #[test]
    fn test_session_line_parsing() {
        let parsed = SessionLine::try_parse_from(["list", "milk", "-C", "dairy"]).unwrap();
        match parsed.action {
            Action::List { term, category } => {
                assert_eq!(term.as_deref(), Some("milk"));
                assert_eq!(category, CategoryFilter::Only(Category::Dairy));
            }
            _ => panic!("expected list"),
        }

        assert!(SessionLine::try_parse_from(["rm", "two"]).is_err());
        assert!(matches!(
            SessionLine::try_parse_from(["exit"]).unwrap().action,
            Action::Quit
        ));
    }

    #[tokio::test]
    async fn test_rows_follow_last_listing() {
        let mut session = session();
        session
            .execute_line("add Bread Grains 2030-01-05 -q '1 loaf'")
            .await
            .unwrap();
        session.execute_line("add Milk Dairy 2030-01-03").await.unwrap();
        session
            .execute_line("add 'Rye Bread' Grains 2030-01-09")
            .await
            .unwrap();

        assert!(session.resolve_row(1).is_err());

        session.execute_line("list bread").await.unwrap();
        assert_eq!(session.last_view.len(), 2);
        assert!(session.resolve_row(0).is_err());
        assert!(session.resolve_row(3).is_err());

        session
            .execute_line("edit 2 --quantity '2 loaves'")
            .await
            .unwrap();
        let rye = session.resolve_row(2).unwrap();
        let edited = session
            .inventory
            .read(|inventory| inventory.get(rye).cloned())
            .await
            .unwrap();
        assert_eq!(edited.name, "Rye Bread");
        assert_eq!(edited.quantity.as_deref(), Some("2 loaves"));

        session.execute_line("rm 1").await.unwrap();
        assert_eq!(names(&session).await, vec!["Milk", "Rye Bread"]);

        // The removed row stays stale until the next listing
        assert!(session.execute_line("rm 1").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_add_leaves_pantry_unchanged() {
        let mut session = session();
        assert!(session
            .execute_line("add Candy Sweets 2030-01-01")
            .await
            .is_err());
        assert!(session
            .execute_line("add Milk Dairy 01/03/2030")
            .await
            .is_err());
        assert!(names(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_edit_keeps_item() {
        let mut session = session();
        session.execute_line("add Milk Dairy 2030-01-03").await.unwrap();
        session.execute_line("list").await.unwrap();

        assert!(session
            .execute_line("edit 1 --expires tomorrow")
            .await
            .is_err());
        let handle = session.resolve_row(1).unwrap();
        let milk = session
            .inventory
            .read(|inventory| inventory.get(handle).cloned())
            .await
            .unwrap();
        assert_eq!(milk.expiration_date.to_string(), "2030-01-03");
    }

    #[tokio::test]
    async fn test_accept_adds_whole_scanned_batch() {
        let mut session = session();
        session.execute_line("add Milk Dairy 2030-01-03").await.unwrap();
        session.execute_line("scan").await.unwrap();

        // Nothing lands before the batch is accepted
        session.execute_line("pending").await.unwrap();
        assert_eq!(session.pending.as_ref().map(Vec::len), Some(3));
        assert_eq!(names(&session).await, vec!["Milk"]);

        session.execute_line("accept").await.unwrap();
        assert!(session.pending.is_none());
        assert_eq!(
            names(&session).await,
            vec!["Milk", "Organic Bananas", "Whole Milk", "Bread"]
        );

        // Rows now point at the accepted items
        assert_eq!(session.last_view.len(), 3);
        session.execute_line("rm 3").await.unwrap();
        assert_eq!(
            names(&session).await,
            vec!["Milk", "Organic Bananas", "Whole Milk"]
        );

        assert!(session.execute_line("accept").await.is_err());
    }

    #[tokio::test]
    async fn test_discard_leaves_pantry_unchanged() {
        let mut session = session();
        session.execute_line("add Milk Dairy 2030-01-03").await.unwrap();
        session.execute_line("scan").await.unwrap();
        assert!(session.execute_line("scan").await.is_err());

        session.settle_scan(true).await;
        assert!(session.pending.is_some());
        session.execute_line("discard").await.unwrap();

        assert!(session.pending.is_none());
        assert!(session.scan.is_none());
        assert_eq!(names(&session).await, vec!["Milk"]);
        assert!(session.execute_line("accept").await.is_err());

        // A new scan is allowed once the old one is gone
        session.execute_line("scan").await.unwrap();
        session.finish().await;
        assert_eq!(names(&session).await, vec!["Milk"]);
    }

    #[tokio::test]
    async fn test_recipe_detail_by_row() {
        let mut session = session();
        assert!(session.execute_line("recipe 1").await.is_err());

        session.execute_line("add Garlic Pantry 2030-01-03").await.unwrap();
        session.execute_line("recipes").await.unwrap();
        assert_eq!(session.last_recipes.len(), 3);
        assert_eq!(session.last_recipes[0].available_count, 1);

        session.execute_line("recipe 1").await.unwrap();
        assert!(session.execute_line("recipe 4").await.is_err());
    }

    #[tokio::test]
    async fn test_quit_and_help() {
        let mut session = session();
        assert!(matches!(
            session.execute_line("help").await.unwrap(),
            Flow::Continue
        ));
        assert!(matches!(
            session.execute_line("quit").await.unwrap(),
            Flow::Quit
        ));
    }
}
