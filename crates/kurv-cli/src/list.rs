//! `kurv list`: shopping-list management over the configured JSON file.

use std::fmt::Write as _;

use clap::Subcommand;
use kurv_core::{AppConfig, JsonFileRepository, ListRepository, ProductKey, ShoppingList};

/// Sub-commands available under `list`.
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// Print the list
    Show,
    /// Add an item, or raise its quantity if it is already listed
    Add {
        /// Item name as shown on the list
        name: String,
        /// Barcode (EAN/GTIN); matches listings across retailers by code instead of name
        #[arg(long)]
        barcode: Option<String>,
        /// How many to add
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        qty: u32,
    },
    /// Remove an item
    Remove {
        /// Item name, barcode, or key
        item: String,
    },
    /// Set an item's quantity; 0 removes it
    Qty {
        /// Item name, barcode, or key
        item: String,
        quantity: u32,
    },
    /// Toggle an item's checked state
    Check {
        /// Item name, barcode, or key
        item: String,
    },
    /// Empty the list
    Clear {
        /// Only remove checked items
        #[arg(long)]
        checked: bool,
    },
}

/// Loads the list, applies `command`, saves when something changed, and
/// prints the result.
///
/// # Errors
///
/// Returns an error if the list file cannot be read or written.
pub(crate) fn run_list(config: &AppConfig, command: ListCommands) -> anyhow::Result<()> {
    let repo = JsonFileRepository::new(&config.list_path);
    let message = execute(&repo, command)?;
    print!("{message}");
    Ok(())
}

/// Applies `command` to the list stored in `repo` and returns the text to
/// show the user.
pub(crate) fn execute(repo: &impl ListRepository, command: ListCommands) -> anyhow::Result<String> {
    let mut list = ShoppingList::load_from(repo)?;
    let (changed, message) = apply(&mut list, command);
    if changed {
        list.save_to(repo)?;
    }
    Ok(message)
}

fn apply(list: &mut ShoppingList, command: ListCommands) -> (bool, String) {
    match command {
        ListCommands::Show => (false, render_list(list)),
        ListCommands::Add { name, barcode, qty } => {
            let key = barcode
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map_or_else(|| ProductKey::from_name(&name), ProductKey::from_barcode);
            list.add_quantity(key.clone(), name.trim(), qty);
            let quantity = list.get(&key).map_or(qty, |e| e.quantity);
            (true, format!("{} × {}\n", quantity, name.trim()))
        }
        ListCommands::Remove { item } => {
            let key = resolve_key(list, &item);
            if list.remove(&key) {
                (true, format!("removed {item}\n"))
            } else {
                (false, not_listed(&item))
            }
        }
        ListCommands::Qty { item, quantity } => {
            let key = resolve_key(list, &item);
            if !list.set_quantity(&key, quantity) {
                return (false, not_listed(&item));
            }
            if quantity == 0 {
                (true, format!("removed {item}\n"))
            } else {
                (true, format!("{quantity} × {item}\n"))
            }
        }
        ListCommands::Check { item } => {
            let key = resolve_key(list, &item);
            if !list.toggle_checked(&key) {
                return (false, not_listed(&item));
            }
            let state = if list.get(&key).is_some_and(|e| e.checked) {
                "checked"
            } else {
                "unchecked"
            };
            (true, format!("{state} {item}\n"))
        }
        ListCommands::Clear { checked: true } => {
            let removed = list.clear_checked();
            (removed > 0, format!("removed {removed} checked items\n"))
        }
        ListCommands::Clear { checked: false } => {
            let removed = list.len();
            list.clear();
            (removed > 0, format!("removed {removed} items\n"))
        }
    }
}

/// Finds the list key `item` refers to: a raw key, a name, or a barcode.
/// Falls back to the name key when nothing matches.
fn resolve_key(list: &ShoppingList, item: &str) -> ProductKey {
    let item = item.trim();
    [
        ProductKey::from(item),
        ProductKey::from_name(item),
        ProductKey::from_barcode(item),
    ]
    .into_iter()
    .find(|key| list.get(key).is_some())
    .unwrap_or_else(|| ProductKey::from_name(item))
}

fn not_listed(item: &str) -> String {
    format!("{item} is not on the list\n")
}

fn render_list(list: &ShoppingList) -> String {
    if list.is_empty() {
        return "the shopping list is empty\n".to_string();
    }
    let mut out = String::new();
    for entry in list.entries() {
        let mark = if entry.checked { "x" } else { " " };
        let _ = writeln!(out, "[{mark}] {:>3} × {}", entry.quantity, entry.name);
    }
    let _ = writeln!(
        out,
        "{} items, {} checked",
        list.total_items(),
        list.checked_count()
    );
    out
}
