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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub campsites_path: PathBuf,
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_min_interval_ms: u64,
    /// `None` means the search cache is unbounded.
    pub cache_max_entries: Option<usize>,
    /// `None` means cached searches never expire.
    pub cache_ttl_secs: Option<u64>,
}
