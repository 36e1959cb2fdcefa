pub mod app_config;
pub mod config;
pub mod pricing;
pub mod products;
pub mod retailers;
pub mod shopping_list;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::{
    best_retailer, cheapest_per_retailer, highest_price, lowest_price, savings, total_savings,
    totals_by_retailer, ListComparison, PriceIndex, PriceLookup, RetailerTotal,
};
pub use products::{listable, CanonicalProduct, ProductKey};
pub use retailers::{
    load_retailers, RetailerConfig, RetailerDirectory, RetailerDisplay, RetailersFile, Schema,
};
pub use shopping_list::{
    JsonFileRepository, ListRepository, MemoryRepository, ShoppingList, ShoppingListEntry,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read retailers file {path}: {source}")]
    RetailersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse retailers file: {0}")]
    RetailersFileParse(#[from] serde_yaml::Error),

    #[error("retailers validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum ListStoreError {
    #[error("shopping list I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("shopping list at {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("shopping list serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}
