//! `kurv normalize`: raw record file in, canonical JSON out.

use std::path::Path;

use kurv_core::{CanonicalProduct, RetailerDirectory};

use crate::catalog::read_raw_records;

pub(crate) fn run_normalize(
    directory: &RetailerDirectory,
    retailer_id: &str,
    file: &Path,
) -> anyhow::Result<()> {
    let products = normalize_file(directory, retailer_id, file)?;
    println!("{}", serde_json::to_string_pretty(&products)?);
    Ok(())
}

/// Normalizes every record in `file` with the schema configured for
/// `retailer_id`.
///
/// # Errors
///
/// Fails when the retailer is not configured or the file cannot be read as
/// JSON. Individual malformed records never fail; they degrade to defaults.
pub(crate) fn normalize_file(
    directory: &RetailerDirectory,
    retailer_id: &str,
    file: &Path,
) -> anyhow::Result<Vec<CanonicalProduct>> {
    let retailer = directory
        .get(retailer_id)
        .ok_or_else(|| anyhow::anyhow!("retailer '{retailer_id}' is not configured"))?;
    let records = read_raw_records(file)?;
    let products = kurv_ingest::normalize_records(records, &retailer.id, retailer.schema);
    tracing::debug!(
        retailer = %retailer.id,
        schema = %retailer.schema,
        count = products.len(),
        "normalized records file"
    );
    Ok(products)
}
