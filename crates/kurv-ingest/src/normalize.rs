//! Normalization from raw retailer records to [`kurv_core::CanonicalProduct`].
//!
//! Normalization is total: whatever a record lacks becomes empty, zero, or
//! absent on the canonical product. A listing with partial data is still
//! worth showing, so nothing here returns an error. Price invariants are
//! enforced by [`CanonicalProduct::with_prices`].

use kurv_core::{CanonicalProduct, Schema};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::parse_helpers::minor_to_major;
use crate::types::{CategoryLevel, FamilyARecord, FamilyBRecord, FamilyCRecord, RetailerRecord};

/// Delimiter between the size/variant text and the brand in family C subtitles.
const SUBTITLE_BRAND_DELIMITER: &str = " / ";

/// Normalizes one decoded record priced at `retailer_id`.
#[must_use]
pub fn normalize_record(record: &RetailerRecord, retailer_id: &str) -> CanonicalProduct {
    match record {
        RetailerRecord::FamilyA(r) => normalize_family_a(r, retailer_id),
        RetailerRecord::FamilyB(r) => normalize_family_b(r, retailer_id),
        RetailerRecord::FamilyC(r) => normalize_family_c(r, retailer_id),
    }
}

/// Decodes a raw JSON record as `schema` and normalizes it.
#[must_use]
pub fn normalize_raw(value: Value, retailer_id: &str, schema: Schema) -> CanonicalProduct {
    normalize_record(&RetailerRecord::from_json(schema, value), retailer_id)
}

/// Normalizes a batch of raw JSON records from one retailer.
pub fn normalize_records(
    values: impl IntoIterator<Item = Value>,
    retailer_id: &str,
    schema: Schema,
) -> Vec<CanonicalProduct> {
    values
        .into_iter()
        .map(|value| normalize_raw(value, retailer_id, schema))
        .collect()
}

fn normalize_family_a(record: &FamilyARecord, retailer_id: &str) -> CanonicalProduct {
    let name = record
        .name
        .clone()
        .or_else(|| record.product_name.clone())
        .unwrap_or_default();

    let block = record.store_data.get(retailer_id);

    let price = block
        .and_then(|b| b.price)
        .or(record.sales_price)
        .or(record.price)
        .map_or(Decimal::ZERO, minor_to_major);

    let original = block
        .and_then(|b| b.before_price.or(b.offer_price))
        .or(record.original_price)
        .map(minor_to_major);

    let in_stock = block
        .and_then(|b| b.in_stock)
        .or(record.in_stock)
        .unwrap_or(true);

    let category = first_top_level(&record.consumer_categories)
        .or_else(|| first_top_level(&record.categories));

    let mut product =
        CanonicalProduct::new(record.id.clone().unwrap_or_default(), retailer_id, name)
            .with_prices(price, original);
    product.description = record.description.clone();
    product.brand = record.brand.clone();
    product.images = record
        .images
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
        .collect();
    product.barcode = record.ean.clone();
    product.sku = record.sku.clone();
    product.category = category;
    product.in_stock = in_stock;
    product
}

/// Name of the first level-1 node in a category hierarchy.
fn first_top_level(levels: &[CategoryLevel]) -> Option<String> {
    levels
        .iter()
        .find(|c| c.level == Some(1) && c.name.is_some())
        .and_then(|c| c.name.clone())
}

fn normalize_family_b(record: &FamilyBRecord, retailer_id: &str) -> CanonicalProduct {
    let (price, original) = match (record.price, record.discount_price) {
        (Some(regular), Some(discounted)) if discounted < regular => (discounted, Some(regular)),
        (Some(regular), _) => (regular, None),
        // Only a discount price: nothing to compare it against.
        (None, Some(discounted)) => (discounted, None),
        (None, None) => (Decimal::ZERO, None),
    };

    let mut product = CanonicalProduct::new(
        record.id.clone().unwrap_or_default(),
        retailer_id,
        record.display_name.clone().unwrap_or_default(),
    )
    .with_prices(price, original);
    product.description = record.description.clone();
    product.images = [&record.image_high, &record.image_medium, &record.image_low]
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    product.barcode = record.ean.clone();
    product.sku = record.sku.clone();
    product.in_stock = record.in_stock.unwrap_or(true);
    product
}

fn normalize_family_c(record: &FamilyCRecord, retailer_id: &str) -> CanonicalProduct {
    let pricing = record.pricing.as_ref();

    let price = pricing
        .and_then(|p| p.price)
        .or(record.price)
        .unwrap_or(Decimal::ZERO);

    let original = pricing
        .filter(|p| p.is_on_discount == Some(true))
        .and_then(|p| p.normal_price);

    let mut product = CanonicalProduct::new(
        record.id.clone().unwrap_or_default(),
        retailer_id,
        record.name.clone().unwrap_or_default(),
    )
    .with_prices(price, original);
    product.description = record.description.clone();
    product.brand = record.subtitle.as_deref().and_then(brand_from_subtitle);
    product.images = record
        .images
        .iter()
        .filter_map(|image| image.resolve().map(str::to_owned))
        .collect();
    product.barcode = record.gtin.clone();
    product.sku = record.sku.clone();
    product.category = record.category.clone();
    product.in_stock = record.in_stock.unwrap_or(true);
    product
}

/// `"1 l / Tine"` → `Some("Tine")`; subtitles without the delimiter carry
/// no brand.
fn brand_from_subtitle(subtitle: &str) -> Option<String> {
    subtitle
        .split(SUBTITLE_BRAND_DELIMITER)
        .nth(1)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
