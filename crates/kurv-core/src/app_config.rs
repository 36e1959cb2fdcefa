use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub retailers_path: PathBuf,
    pub list_path: PathBuf,
    pub retailer_api_token: Option<String>,
    pub fetch_request_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub fetch_max_concurrent_retailers: usize,
    pub fetch_page_limit: u32,
    pub fetch_max_retries: u32,
    pub fetch_retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("retailers_path", &self.retailers_path)
            .field("list_path", &self.list_path)
            .field(
                "retailer_api_token",
                &self.retailer_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "fetch_request_timeout_secs",
                &self.fetch_request_timeout_secs,
            )
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field(
                "fetch_max_concurrent_retailers",
                &self.fetch_max_concurrent_retailers,
            )
            .field("fetch_page_limit", &self.fetch_page_limit)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field(
                "fetch_retry_backoff_base_secs",
                &self.fetch_retry_backoff_base_secs,
            )
            .finish()
    }
}
