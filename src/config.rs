/// Program configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the Experts15 API
    pub api_base_url: String,
    /// Admin bearer token used for all requests
    pub admin_token: String,
    /// Folder containing draft TOML files to process
    pub drafts_folder: String,
    /// How many drafts to publish concurrently
    pub max_concurrent_drafts: usize,
    /// Whether to log per-question detail
    pub verbose_logging: bool,
    /// Plain-text run log file
    pub output_log_file: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.experts15.in".to_string(),
            admin_token: String::new(),
            drafts_folder: "drafts".to_string(),
            max_concurrent_drafts: 4,
            verbose_logging: false,
            output_log_file: "publish_log.txt".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("EXPERTS15_API_BASE_URL").unwrap_or(default.api_base_url),
            admin_token: std::env::var("EXPERTS15_ADMIN_TOKEN").unwrap_or(default.admin_token),
            drafts_folder: std::env::var("DRAFTS_FOLDER").unwrap_or(default.drafts_folder),
            max_concurrent_drafts: std::env::var("MAX_CONCURRENT_DRAFTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_drafts),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
        }
    }
}
