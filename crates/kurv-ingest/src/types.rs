//! Raw product records for the three upstream retailer data families.
//!
//! ## Family A
//! Prices are integers in **minor units** (øre). A record may carry a
//! `storeData` object keyed by retailer id, each value holding that
//! retailer's `price`, `beforePrice`, `offerPrice`, and `inStock`. Records
//! without a matching block fall back to the flat `salesPrice` / `price`
//! and `originalPrice` fields. The name is `name`, or `productName` on older
//! exports. Categories come as level-tagged lists under `consumerCategories`
//! (shopper-facing tree) and `categories` (generic tree).
//!
//! ## Family B
//! Prices in **major units** (kroner). A discount is expressed as a lower
//! `discountPrice` next to the regular `price`. Images are three discrete
//! fields, `imageHigh` / `imageMedium` / `imageLow`. No brand or category.
//!
//! ## Family C
//! Prices in **major units** under `pricing: { price, isOnDiscount,
//! normalPrice }`, with a flat `price` on some exports. `images` mixes bare
//! URL strings with `{ large, medium, small }` objects. The brand is
//! embedded in `subtitle`, e.g. `"1 l / Tine"`.
//!
//! Every field is optional and decoded leniently (see
//! [`crate::parse_helpers`]); unknown fields are ignored.

use std::collections::HashMap;

use kurv_core::Schema;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::parse_helpers::{
    lenient_bool, lenient_decimal, lenient_list, lenient_map, lenient_object, lenient_string,
    lenient_u32, string_from_value,
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyARecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ean: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub images: Vec<String>,
    /// Per-retailer price blocks, keyed by retailer id.
    #[serde(default, deserialize_with = "lenient_map")]
    pub store_data: HashMap<String, StorePriceBlock>,
    /// Flat current price in øre.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub sales_price: Option<Decimal>,
    /// Flat price in øre, used when `salesPrice` is absent.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    /// Flat pre-discount price in øre.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub original_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub consumer_categories: Vec<CategoryLevel>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub categories: Vec<CategoryLevel>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub in_stock: Option<bool>,
}

/// One retailer's prices for a family A product, in øre.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePriceBlock {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub before_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub offer_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub in_stock: Option<bool>,
}

/// One node of a category hierarchy; level 1 is the top.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryLevel {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub level: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyBRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_high: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_medium: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_low: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ean: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub in_stock: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyCRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    /// Secondary line such as `"1 l / Tine"`; the brand follows `" / "`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub images: Vec<ImageRef>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub pricing: Option<Pricing>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gtin: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub in_stock: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_on_discount: Option<bool>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub normal_price: Option<Decimal>,
}

/// A family C image: a bare URL or a set of size variants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Sized(ImageVariants),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageVariants {
    #[serde(default, deserialize_with = "lenient_string")]
    pub large: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub medium: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub small: Option<String>,
}

impl ImageRef {
    /// Best available URL: the bare URL, else large, medium, then small.
    #[must_use]
    pub fn resolve(&self) -> Option<&str> {
        match self {
            ImageRef::Url(url) => Some(url.trim()).filter(|u| !u.is_empty()),
            ImageRef::Sized(v) => v
                .large
                .as_deref()
                .or(v.medium.as_deref())
                .or(v.small.as_deref()),
        }
    }
}

/// A raw record tagged with the family it was decoded as.
#[derive(Debug, Clone, PartialEq)]
pub enum RetailerRecord {
    FamilyA(FamilyARecord),
    FamilyB(FamilyBRecord),
    FamilyC(FamilyCRecord),
}

impl RetailerRecord {
    /// Decodes `value` as a record of `schema`.
    ///
    /// Never fails: a value that is not a JSON object becomes an empty
    /// record of the requested family.
    #[must_use]
    pub fn from_json(schema: Schema, value: Value) -> Self {
        match schema {
            Schema::FamilyA => RetailerRecord::FamilyA(decode(schema, value)),
            Schema::FamilyB => RetailerRecord::FamilyB(decode(schema, value)),
            Schema::FamilyC => RetailerRecord::FamilyC(decode(schema, value)),
        }
    }

    #[must_use]
    pub fn schema(&self) -> Schema {
        match self {
            RetailerRecord::FamilyA(_) => Schema::FamilyA,
            RetailerRecord::FamilyB(_) => Schema::FamilyB,
            RetailerRecord::FamilyC(_) => Schema::FamilyC,
        }
    }
}

fn decode<T>(schema: Schema, value: Value) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    if !value.is_object() {
        tracing::warn!(
            %schema,
            kind = json_kind(&value),
            "retailer record is not a JSON object; using an empty record"
        );
        return T::default();
    }
    let id = value.get("id").and_then(string_from_value);
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(
            %schema,
            id = id.as_deref().unwrap_or("<none>"),
            error = %e,
            "retailer record did not decode; using an empty record"
        );
        T::default()
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
