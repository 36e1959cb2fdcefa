//! Cross-retailer price comparison over canonical products.
//!
//! Everything here is pure and synchronous. Operations that need at least
//! one price return `Option` instead of guessing on empty input.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::products::{CanonicalProduct, ProductKey};
use crate::retailers::RetailerDirectory;
use crate::shopping_list::ShoppingListEntry;

/// Cheapest listing. Ties return an unspecified one of the tied listings.
#[must_use]
pub fn lowest_price(prices: &[CanonicalProduct]) -> Option<&CanonicalProduct> {
    prices.iter().min_by_key(|p| p.price_major_units)
}

/// Most expensive listing. Ties return an unspecified one of the tied listings.
#[must_use]
pub fn highest_price(prices: &[CanonicalProduct]) -> Option<&CanonicalProduct> {
    prices.iter().max_by_key(|p| p.price_major_units)
}

/// Spread between the most and least expensive listing; zero with fewer
/// than two listings.
#[must_use]
pub fn savings(prices: &[CanonicalProduct]) -> Decimal {
    if prices.len() < 2 {
        return Decimal::ZERO;
    }
    match (highest_price(prices), lowest_price(prices)) {
        (Some(high), Some(low)) => high.price_major_units - low.price_major_units,
        _ => Decimal::ZERO,
    }
}

/// Each retailer's cheapest listing, ordered by retailer id.
#[must_use]
pub fn cheapest_per_retailer(prices: &[CanonicalProduct]) -> Vec<CanonicalProduct> {
    let mut cheapest: BTreeMap<&str, &CanonicalProduct> = BTreeMap::new();
    for product in prices {
        cheapest
            .entry(product.retailer_id.as_str())
            .and_modify(|best| {
                if product.price_major_units < best.price_major_units {
                    *best = product;
                }
            })
            .or_insert(product);
    }
    cheapest.into_values().cloned().collect()
}

/// Source of per-retailer listings for a shopping-list item.
pub trait PriceLookup {
    /// Every known listing of `key`, across retailers. Empty when unknown.
    fn prices_for(&self, key: &ProductKey) -> &[CanonicalProduct];
}

impl PriceLookup for HashMap<ProductKey, Vec<CanonicalProduct>> {
    fn prices_for(&self, key: &ProductKey) -> &[CanonicalProduct] {
        self.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Canonical products grouped by [`CanonicalProduct::match_key`].
///
/// Every listing is also reachable through its name key, so a list entry
/// added by name still finds listings that carry a barcode.
#[derive(Debug, Clone, Default)]
pub struct PriceIndex {
    by_key: HashMap<ProductKey, Vec<CanonicalProduct>>,
    by_name: HashMap<ProductKey, Vec<CanonicalProduct>>,
}

impl PriceIndex {
    /// Groups `products` by match key. Listings without a positive price
    /// are left out so they can never win a comparison.
    pub fn from_products(products: impl IntoIterator<Item = CanonicalProduct>) -> Self {
        let mut by_key: HashMap<ProductKey, Vec<CanonicalProduct>> = HashMap::new();
        let mut by_name: HashMap<ProductKey, Vec<CanonicalProduct>> = HashMap::new();
        for product in products {
            if !product.is_listable() {
                tracing::debug!(
                    retailer = %product.retailer_id,
                    id = %product.id,
                    "skipping listing without a positive price"
                );
                continue;
            }
            by_name
                .entry(ProductKey::from_name(&product.name))
                .or_default()
                .push(product.clone());
            by_key.entry(product.match_key()).or_default().push(product);
        }
        Self { by_key, by_name }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Groups sorted by key, for stable output.
    #[must_use]
    pub fn groups(&self) -> Vec<(&ProductKey, &[CanonicalProduct])> {
        let mut groups: Vec<_> = self
            .by_key
            .iter()
            .map(|(k, v)| (k, v.as_slice()))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(b.0));
        groups
    }
}

impl PriceLookup for PriceIndex {
    /// Barcode keys match exactly. Name keys match every listing with that
    /// normalized name, with or without a barcode.
    fn prices_for(&self, key: &ProductKey) -> &[CanonicalProduct] {
        if key.is_name_key() {
            self.by_name.prices_for(key)
        } else {
            self.by_key.prices_for(key)
        }
    }
}

/// Quantity-weighted basket total at one retailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailerTotal {
    pub retailer_id: String,
    pub retailer_name: String,
    pub retailer_color: String,
    pub total: Decimal,
    /// List entries this retailer had a price for.
    pub items_priced: usize,
    /// List entries overall.
    pub items_total: usize,
}

impl RetailerTotal {
    /// `true` when the retailer priced every entry on the list.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.items_priced == self.items_total
    }
}

/// Basket totals per retailer, cheapest first.
///
/// An entry contributes `price * quantity` to every retailer that lists it
/// (the retailer's lowest listing if it has several). Entries a retailer
/// does not list simply do not contribute to that retailer's total; see
/// [`RetailerTotal::items_priced`] for coverage. Checked entries count.
/// Equal totals are ordered by retailer id. A retailer whose total would
/// overflow [`Decimal`] is left out with a warning.
#[must_use]
pub fn totals_by_retailer(
    entries: &[ShoppingListEntry],
    lookup: &impl PriceLookup,
    directory: &RetailerDirectory,
) -> Vec<RetailerTotal> {
    let mut sums: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    let mut overflowed: BTreeSet<&str> = BTreeSet::new();

    for entry in entries {
        let mut cheapest: BTreeMap<&str, Decimal> = BTreeMap::new();
        for listing in lookup.prices_for(&entry.key) {
            cheapest
                .entry(listing.retailer_id.as_str())
                .and_modify(|p| *p = (*p).min(listing.price_major_units))
                .or_insert(listing.price_major_units);
        }
        let quantity = Decimal::from(entry.quantity);
        for (retailer, price) in cheapest {
            if overflowed.contains(retailer) {
                continue;
            }
            let slot = sums.entry(retailer).or_insert((Decimal::ZERO, 0));
            match price
                .checked_mul(quantity)
                .and_then(|line| slot.0.checked_add(line))
            {
                Some(total) => {
                    slot.0 = total;
                    slot.1 += 1;
                }
                None => {
                    tracing::warn!(
                        retailer,
                        key = %entry.key,
                        "basket total overflows; leaving retailer out of the comparison"
                    );
                    overflowed.insert(retailer);
                }
            }
        }
    }
    sums.retain(|retailer, _| !overflowed.contains(retailer));

    let mut totals: Vec<RetailerTotal> = sums
        .into_iter()
        .map(|(retailer_id, (total, items_priced))| {
            let display = directory.display(retailer_id);
            RetailerTotal {
                retailer_id: retailer_id.to_owned(),
                retailer_name: display.name,
                retailer_color: display.color,
                total,
                items_priced,
                items_total: entries.len(),
            }
        })
        .collect();

    totals.sort_by(|a, b| {
        a.total
            .cmp(&b.total)
            .then_with(|| a.retailer_id.cmp(&b.retailer_id))
    });
    totals
}

/// Cheapest retailer, given totals from [`totals_by_retailer`].
#[must_use]
pub fn best_retailer(totals: &[RetailerTotal]) -> Option<&RetailerTotal> {
    totals.first()
}

/// Spread between the most and least expensive retailer total; zero with
/// fewer than two retailers.
#[must_use]
pub fn total_savings(totals: &[RetailerTotal]) -> Decimal {
    if totals.len() < 2 {
        return Decimal::ZERO;
    }
    let max = totals.iter().map(|t| t.total).max();
    let min = totals.iter().map(|t| t.total).min();
    match (max, min) {
        (Some(max), Some(min)) => max - min,
        _ => Decimal::ZERO,
    }
}

/// Everything a list view needs: per-retailer totals, the winner, and the
/// spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListComparison {
    pub totals: Vec<RetailerTotal>,
    pub best_retailer_id: Option<String>,
    pub total_savings: Decimal,
}

impl ListComparison {
    #[must_use]
    pub fn build(
        entries: &[ShoppingListEntry],
        lookup: &impl PriceLookup,
        directory: &RetailerDirectory,
    ) -> Self {
        let totals = totals_by_retailer(entries, lookup, directory);
        let best_retailer_id = best_retailer(&totals).map(|t| t.retailer_id.clone());
        let total_savings = total_savings(&totals);
        Self {
            totals,
            best_retailer_id,
            total_savings,
        }
    }
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
