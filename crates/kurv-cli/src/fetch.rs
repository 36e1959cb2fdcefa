//! `kurv fetch`: collect live listings and print per-item price spreads.

use std::fmt::Write as _;
use std::path::Path;

use kurv_core::{
    cheapest_per_retailer, highest_price, lowest_price, savings, AppConfig, PriceIndex,
    RetailerDirectory,
};
use kurv_ingest::{collect_products, Collection, RetailerClient};

use crate::catalog::write_catalog;

/// Collects from every configured retailer, prints the comparison, and
/// optionally writes the canonical catalog.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, every retailer
/// failed, or the catalog cannot be written. Individual retailer failures
/// are logged and reported, not propagated.
pub(crate) async fn run_fetch(
    config: &AppConfig,
    directory: &RetailerDirectory,
    query: Option<&str>,
    catalog_out: Option<&Path>,
) -> anyhow::Result<()> {
    if directory.is_empty() {
        println!("no retailers configured; nothing to fetch");
        return Ok(());
    }

    let client = RetailerClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build retailer client: {e}"))?;

    let collection = collect_products(
        &client,
        directory.retailers(),
        query,
        config.fetch_max_concurrent_retailers,
    )
    .await;

    if collection.all_failed() {
        anyhow::bail!(
            "all {} retailers failed collection",
            collection.failed_retailers.len()
        );
    }

    if let Some(path) = catalog_out {
        write_catalog(path, &collection.products)?;
        println!(
            "wrote {} products to {}",
            collection.products.len(),
            path.display()
        );
    }

    print!("{}", render_collection(&collection, directory));
    Ok(())
}

/// One line per matched item: cheapest and dearest retailer plus the spread.
/// Each retailer counts once, at its cheapest listing, so items carried by a
/// single retailer show no spread.
pub(crate) fn render_collection(collection: &Collection, directory: &RetailerDirectory) -> String {
    let index = PriceIndex::from_products(collection.products.iter().cloned());
    let mut out = String::new();

    for (_, listings) in index.groups() {
        let prices = cheapest_per_retailer(listings);
        let (Some(low), Some(high)) = (lowest_price(&prices), highest_price(&prices)) else {
            continue;
        };
        let low_name = directory.display(&low.retailer_id).name;
        if prices.len() < 2 {
            let _ = writeln!(
                out,
                "{:<32} {:>9.2} at {low_name}",
                low.name, low.price_major_units
            );
            continue;
        }
        let high_name = directory.display(&high.retailer_id).name;
        let _ = writeln!(
            out,
            "{:<32} {:>9.2} at {low_name} (up to {:.2} at {high_name}, save {:.2})",
            low.name,
            low.price_major_units,
            high.price_major_units,
            savings(&prices)
        );
    }

    for failed in &collection.failed_retailers {
        let name = directory.display(&failed.retailer_id).name;
        let _ = writeln!(out, "! {name}: {}", failed.reason);
    }

    out
}
