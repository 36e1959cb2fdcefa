use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Retailer-agnostic identity used to line up the same logical item across
/// retailers, e.g. `"ean:7038010009457"` or `"name:lettmelk 1 l"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(String);

impl ProductKey {
    /// Builds a key from a barcode (GTIN/EAN). Surrounding whitespace is ignored.
    #[must_use]
    pub fn from_barcode(barcode: &str) -> Self {
        Self(format!("ean:{}", barcode.trim()))
    }

    /// Builds a key from a display name: lowercased, whitespace collapsed.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let normalized = name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        Self(format!("name:{normalized}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for keys built by [`ProductKey::from_name`].
    #[must_use]
    pub fn is_name_key(&self) -> bool {
        self.0.starts_with("name:")
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// A retailer listing normalized out of one of the upstream record shapes.
///
/// Instances are immutable values recomputed on every fetch. The price
/// fields always satisfy `price_major_units >= 0` and, when present,
/// `original_price_major_units > price_major_units`; go through
/// [`CanonicalProduct::with_prices`] to keep that true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProduct {
    /// Retailer-local identifier. Unique within `retailer_id` only.
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    /// Image URLs, best first. May be empty.
    pub images: Vec<String>,
    /// Price in the currency's major unit (kroner, not øre).
    pub price_major_units: Decimal,
    /// Pre-discount price. Present only while the product is discounted.
    pub original_price_major_units: Option<Decimal>,
    /// GTIN/EAN.
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub in_stock: bool,
    pub retailer_id: String,
}

impl CanonicalProduct {
    /// Creates a product with no price, no optional fields, and `in_stock = true`.
    #[must_use]
    pub fn new(id: impl Into<String>, retailer_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            brand: None,
            images: Vec::new(),
            price_major_units: Decimal::ZERO,
            original_price_major_units: None,
            barcode: None,
            sku: None,
            category: None,
            in_stock: true,
            retailer_id: retailer_id.into(),
        }
    }

    /// Sets both price fields, enforcing the price invariants.
    ///
    /// A negative price is clamped to zero. An original price that does not
    /// exceed the current price is dropped: a discount always lowers price.
    #[must_use]
    pub fn with_prices(mut self, price: Decimal, original: Option<Decimal>) -> Self {
        let price = price.max(Decimal::ZERO);
        self.price_major_units = price;
        self.original_price_major_units = original.filter(|o| *o > price);
        self
    }

    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.original_price_major_units.is_some()
    }

    /// Amount saved against the original price, if discounted.
    #[must_use]
    pub fn discount_amount(&self) -> Option<Decimal> {
        self.original_price_major_units
            .map(|original| original - self.price_major_units)
    }

    /// `true` when the product carries a positive price and can be shown in
    /// listings and comparisons.
    #[must_use]
    pub fn is_listable(&self) -> bool {
        self.price_major_units > Decimal::ZERO
    }

    /// Identity used to match this listing against other retailers: the
    /// barcode when known, the normalized name otherwise.
    #[must_use]
    pub fn match_key(&self) -> ProductKey {
        match self.barcode.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => ProductKey::from_barcode(code),
            _ => ProductKey::from_name(&self.name),
        }
    }
}

/// Drops products without a positive price.
pub fn listable(products: impl IntoIterator<Item = CanonicalProduct>) -> Vec<CanonicalProduct> {
    products.into_iter().filter(CanonicalProduct::is_listable).collect()
}
