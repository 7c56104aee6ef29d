/// Runtime settings for the registry client, the batch runner and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub api_base_url: String,
    pub list_timeout_secs: u64,
    pub detail_timeout_secs: u64,
    pub page_size: u32,
    pub max_pages: usize,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub max_concurrent_taxpayers: usize,
    pub user_agent: String,
    /// Presentation capability: print map links next to resolved properties.
    pub map_links: bool,
}
