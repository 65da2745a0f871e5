use chrono::Utc;
use clap::{Parser, Subcommand};
use pantry_core::SharedInventory;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod sources;

use commands::{
    print_categories, ConfigCommand, DashboardCommand, ListCommand, RecipesCommand, ScanCommand,
    SessionCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(version)]
#[command(about = "Track groceries, what expires next, and what you can cook", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Inventory file (YAML or JSON list of items) to start from
    #[arg(long, global = true, conflicts_with = "demo")]
    items: Option<PathBuf>,

    /// Start from the built-in demo pantry
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show counts by freshness and the items expiring soon
    Dashboard(DashboardCommand),

    /// List items, optionally filtered by name and category
    List(ListCommand),

    /// List the categories present in the pantry
    Categories,

    /// Scan a receipt and add its items
    Scan(ScanCommand),

    /// Suggest recipes and show which ingredients are on hand
    Recipes(RecipesCommand),

    /// Interactive session: add, edit, remove, scan and browse
    Session(SessionCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("PANTRY_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| "pantry=warn,pantry_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    // Config commands should work even when the seed file is broken
    if let Commands::Config(cmd) = &command {
        return cmd.run(&config);
    }

    let today = Utc::now().date_naive();
    let inventory = sources::load_seed(cli.items.as_deref(), cli.demo, &config, today).await?;

    match command {
        Commands::Dashboard(cmd) => cmd.run(&inventory, &config)?,
        Commands::List(cmd) => cmd.run(&inventory)?,
        Commands::Categories => print_categories(&inventory),
        Commands::Scan(cmd) => {
            let shared = SharedInventory::new(inventory);
            cmd.run(&shared, &config).await?;
        }
        Commands::Recipes(cmd) => cmd.run(&inventory, &config).await?,
        Commands::Session(cmd) => cmd.run(SharedInventory::new(inventory), &config).await?,
        Commands::Config(_) => {}
    }

    Ok(())
}
