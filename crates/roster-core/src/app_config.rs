use std::net::SocketAddr;

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
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub modash_api_key: Option<String>,
    pub modash_base_url: String,
    pub modash_request_timeout_secs: u64,
    pub modash_user_agent: String,
    pub modash_max_retries: u32,
    pub modash_retry_backoff_base_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub analytics_link_timeout_secs: u64,
    pub analytics_max_concurrent_links: usize,
    pub analytics_inter_request_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "modash_api_key",
                &self.modash_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("modash_base_url", &self.modash_base_url)
            .field(
                "modash_request_timeout_secs",
                &self.modash_request_timeout_secs,
            )
            .field("modash_user_agent", &self.modash_user_agent)
            .field("modash_max_retries", &self.modash_max_retries)
            .field(
                "modash_retry_backoff_base_secs",
                &self.modash_retry_backoff_base_secs,
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "analytics_link_timeout_secs",
                &self.analytics_link_timeout_secs,
            )
            .field(
                "analytics_max_concurrent_links",
                &self.analytics_max_concurrent_links,
            )
            .field(
                "analytics_inter_request_delay_ms",
                &self.analytics_inter_request_delay_ms,
            )
            .finish()
    }
}
