//! `kurv compare`: basket totals per retailer for the stored list.

use std::fmt::Write as _;
use std::path::Path;

use kurv_core::{
    AppConfig, JsonFileRepository, ListComparison, PriceIndex, RetailerDirectory, ShoppingList,
};

use crate::catalog::read_catalog;

/// # Errors
///
/// Returns an error if the catalog or the stored list cannot be read.
pub(crate) fn run_compare(
    config: &AppConfig,
    directory: &RetailerDirectory,
    catalog: &Path,
) -> anyhow::Result<()> {
    let products = read_catalog(catalog)?;
    let index = PriceIndex::from_products(products);
    let list = ShoppingList::load_from(&JsonFileRepository::new(&config.list_path))?;

    if list.is_empty() {
        println!("the shopping list is empty; nothing to compare");
        return Ok(());
    }

    let comparison = ListComparison::build(list.entries(), &index, directory);
    tracing::debug!(
        entries = list.len(),
        retailers = comparison.totals.len(),
        "built list comparison"
    );
    print!("{}", render_comparison(&comparison));
    Ok(())
}

pub(crate) fn render_comparison(comparison: &ListComparison) -> String {
    if comparison.totals.is_empty() {
        return "no retailer carries anything on the list\n".to_string();
    }

    let mut out = String::new();
    for total in &comparison.totals {
        let best = comparison.best_retailer_id.as_deref() == Some(total.retailer_id.as_str());
        let marker = if best { "*" } else { " " };
        let _ = write!(
            out,
            "{marker} {:<16} {:>10.2}",
            total.retailer_name, total.total
        );
        if !total.is_complete() {
            let _ = write!(
                out,
                "  (incomplete: {}/{} items)",
                total.items_priced, total.items_total
            );
        }
        out.push('\n');
    }

    if let Some(best) = comparison.totals.first() {
        let _ = writeln!(
            out,
            "best: {} · total savings {:.2}",
            best.retailer_name, comparison.total_savings
        );
    }
    out
}
