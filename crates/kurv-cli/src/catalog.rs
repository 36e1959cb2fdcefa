//! Reading raw record files and reading/writing canonical catalogs.

use std::path::Path;

use anyhow::Context;
use kurv_core::CanonicalProduct;
use serde_json::Value;

/// Reads raw records from a JSON file holding either an array or an object
/// with a `products` array. A lone object is treated as a single record.
pub(crate) fn read_raw_records(path: &Path) -> anyhow::Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records file {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("records file {} is not valid JSON", path.display()))?;
    Ok(records_from_value(value))
}

pub(crate) fn records_from_value(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("products") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                tracing::warn!(kind = ?other, "`products` is not an array; ignoring");
                Vec::new()
            }
            None => vec![Value::Object(map)],
        },
        other => {
            tracing::warn!(value = %other, "records file holds a scalar; treating as one record");
            vec![other]
        }
    }
}

/// Reads a canonical catalog. Price invariants are re-applied on load since
/// the file may have been edited by hand.
pub(crate) fn read_catalog(path: &Path) -> anyhow::Result<Vec<CanonicalProduct>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let products: Vec<CanonicalProduct> = serde_json::from_str(&content).with_context(|| {
        format!("catalog {} is not a list of canonical products", path.display())
    })?;
    Ok(products
        .into_iter()
        .map(|p| {
            let (price, original) = (p.price_major_units, p.original_price_major_units);
            p.with_prices(price, original)
        })
        .collect())
}

pub(crate) fn write_catalog(path: &Path, products: &[CanonicalProduct]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(products)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write catalog {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = products.len(), "catalog written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn records_from_array_and_wrapped_object() {
        assert_eq!(records_from_value(json!([{"id": 1}, {"id": 2}])).len(), 2);
        assert_eq!(records_from_value(json!({"products": [{"id": 1}]})).len(), 1);
    }

    #[test]
    fn lone_object_is_one_record() {
        let records = records_from_value(json!({"name": "Melk"}));
        assert_eq!(records, vec![json!({"name": "Melk"})]);
    }

    #[test]
    fn non_array_products_field_yields_nothing() {
        assert!(records_from_value(json!({"products": "none"})).is_empty());
    }

    #[test]
    fn catalog_roundtrips_through_file() {
        let path = std::env::temp_dir().join(format!(
            "kurv-catalog-test-{}/catalog.json",
            std::process::id()
        ));
        let products = vec![
            CanonicalProduct::new("1", "meny", "Melk").with_prices(Decimal::new(1995, 2), None),
            CanonicalProduct::new("2", "kiwi", "Melk")
                .with_prices(Decimal::new(1890, 2), Some(Decimal::new(2190, 2))),
        ];

        write_catalog(&path, &products).unwrap();
        let loaded = read_catalog(&path).unwrap();
        assert_eq!(loaded, products);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn catalog_load_enforces_price_invariants() {
        let path = std::env::temp_dir().join(format!(
            "kurv-catalog-invariants-{}.json",
            std::process::id()
        ));
        let mut negative = CanonicalProduct::new("1", "meny", "Melk");
        negative.price_major_units = Decimal::new(-500, 2);
        let mut stale_original = CanonicalProduct::new("2", "kiwi", "Melk");
        stale_original.price_major_units = Decimal::new(1990, 2);
        stale_original.original_price_major_units = Some(Decimal::new(1990, 2));
        std::fs::write(
            &path,
            serde_json::to_string(&vec![negative, stale_original]).unwrap(),
        )
        .unwrap();

        let loaded = read_catalog(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded[0].price_major_units, Decimal::ZERO);
        assert_eq!(loaded[1].price_major_units, Decimal::new(1990, 2));
        assert!(loaded[1].original_price_major_units.is_none());
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let path = std::env::temp_dir().join("kurv-catalog-test-does-not-exist.json");
        assert!(read_catalog(&path).is_err());
    }
}
