use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use inventory_core::{DeleteOutcome, ListController, SaveOutcome, ValidationIssue};
use shared::domain::{Item, ItemId, SortOption};
use storage::Storage;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_database_url};

const EMPTY_STATE_MESSAGE: &str = "No items yet. Add one with `inventory add <NAME> <QUANTITY>`.";

#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Keep a sorted list of named quantities")]
struct Cli {
    /// Settings file; missing files are ignored.
    #[arg(long, default_value = "inventory.toml")]
    config: PathBuf,
    #[arg(long, global = true)]
    database_url: Option<String>,
    /// One of name-asc, name-desc, quantity-asc, quantity-desc.
    #[arg(long, global = true)]
    sort: Option<SortOption>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long)]
        json: bool,
    },
    Add {
        name: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        quantity: Option<String>,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let raw_database_url = cli.database_url.as_deref().unwrap_or(&settings.database_url);
    let database_url = normalize_database_url(raw_database_url);
    let storage = Storage::new(&database_url).await.map_err(|err| {
        error!(%database_url, error = %err, "failed to open inventory database");
        err
    })?;
    info!(%database_url, "opened inventory database");

    let sort = cli.sort.unwrap_or(settings.default_sort);
    let mut controller = ListController::with_sort(storage, sort);
    controller.load_items().await?;

    match cli.command {
        Command::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(controller.items())?);
            } else {
                print_items(&mut io::stdout().lock(), controller.items(), controller.sort_option())?;
            }
        }
        Command::Add { name, quantity } => {
            controller.draft_mut().set_name(name);
            controller.draft_mut().set_quantity(quantity);
            submit(&mut controller).await?;
        }
        Command::Edit { id, name, quantity } => {
            let item = require_item(controller.items(), ItemId(id))?;
            controller.start_edit(&item);
            if let Some(name) = name {
                controller.draft_mut().set_name(name);
            }
            if let Some(quantity) = quantity {
                controller.draft_mut().set_quantity(quantity);
            }
            submit(&mut controller).await?;
        }
        Command::Delete { id, yes } => {
            let id = ItemId(id);
            let item = require_item(controller.items(), id)?;
            let prompt = |_: ItemId| approve_delete(yes, || ask_confirmation(&item));
            match controller.confirm_delete(id, &prompt).await? {
                DeleteOutcome::Deleted => println!("Deleted {} (id {id})", item.name),
                DeleteOutcome::Cancelled => println!("Kept {} (id {id})", item.name),
            }
        }
    }

    Ok(())
}

async fn submit(controller: &mut ListController<Storage>) -> Result<()> {
    let label = controller.draft().submit_label();
    match controller.save_or_update().await? {
        SaveOutcome::Created(id) => println!("{label}: created item {id}"),
        SaveOutcome::Updated(id) => println!("{label}: updated item {id}"),
        SaveOutcome::Rejected(issue) => {
            bail!(rejection_message(issue, controller.draft().quantity()))
        }
    }
    print_items(&mut io::stdout().lock(), controller.items(), controller.sort_option())?;
    Ok(())
}

fn require_item(items: &[Item], id: ItemId) -> Result<Item> {
    match items.iter().find(|item| item.id == id) {
        Some(item) => Ok(item.clone()),
        None => bail!("item {id} does not exist"),
    }
}

fn rejection_message(issue: ValidationIssue, quantity: &str) -> String {
    match issue {
        ValidationIssue::EmptyName => "item name must not be empty".to_string(),
        ValidationIssue::InvalidQuantity => format!("quantity '{quantity}' is not a whole number"),
    }
}

/// `--yes` skips the interactive question entirely.
fn approve_delete(yes: bool, ask: impl FnOnce() -> bool) -> bool {
    yes || ask()
}

fn print_items(out: &mut impl Write, items: &[Item], sort: SortOption) -> io::Result<()> {
    if items.is_empty() {
        writeln!(out, "{EMPTY_STATE_MESSAGE}")?;
        return Ok(());
    }
    writeln!(out, "Sorted by {}", sort.label())?;
    writeln!(out, "{:>6}  {:<32}  {:>10}", "ID", "NAME", "QUANTITY")?;
    for item in items {
        writeln!(out, "{:>6}  {:<32}  {:>10}", item.id, item.name, item.quantity)?;
    }
    Ok(())
}

fn ask_confirmation(item: &Item) -> bool {
    print!("Delete \"{}\" (quantity {})? [y/N] ", item.name, item.quantity);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
