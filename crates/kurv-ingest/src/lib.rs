pub mod client;
pub mod error;
pub mod normalize;
pub(crate) mod parse_helpers;
pub(crate) mod rate_limit;
pub mod source;
pub mod types;

pub use client::RetailerClient;
pub use error::IngestError;
pub use kurv_core::Schema;
pub use normalize::{normalize_raw, normalize_record, normalize_records};
pub use source::{collect_products, Collection, FailedRetailer, RecordSource, StaticSource};
pub use types::{FamilyARecord, FamilyBRecord, FamilyCRecord, RetailerRecord};
