use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings for the per-item `.json` fetcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// User-Agent sent with every request. The public endpoint rejects obvious bots.
    /// TOML: `fetch.user_agent`. Default: a desktop Chrome string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds.
    /// TOML: `fetch.timeout_secs`. Default: `5`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per item, including the first one. Must be at least 1.
    /// TOML: `fetch.max_attempts`. Default: `3`.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Lower bound of the randomized pause taken before every attempt.
    /// TOML: `fetch.politeness_min_ms`. Default: `400`.
    #[serde(default = "default_politeness_min_ms")]
    pub politeness_min_ms: u64,

    /// Upper bound (inclusive) of the randomized pause taken before every attempt.
    /// TOML: `fetch.politeness_max_ms`. Default: `1000`.
    #[serde(default = "default_politeness_max_ms")]
    pub politeness_max_ms: u64,

    /// Pause after an HTTP 429 before the next attempt.
    /// TOML: `fetch.rate_limit_delay_secs`. Default: `10`.
    #[serde(default = "default_rate_limit_delay_secs")]
    pub rate_limit_delay_secs: u64,

    /// Pause after any other failed attempt (status, transport error, timeout).
    /// TOML: `fetch.error_delay_secs`. Default: `1`.
    #[serde(default = "default_error_delay_secs")]
    pub error_delay_secs: u64,

    /// Origin used to resolve site-relative permalinks such as `/r/rust/comments/...`.
    /// TOML: `fetch.base_url`. Default: `https://www.reddit.com`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Optional upstream HTTP proxy. If set, used for the reqwest client.
    /// TOML: `fetch.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Allow HTTP/2 multiplexing; disabled forces HTTP/1 with `Connection: close`.
    /// TOML: `fetch.enable_multiplexing`. Default: `false`.
    #[serde(default)]
    pub enable_multiplexing: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            politeness_min_ms: default_politeness_min_ms(),
            politeness_max_ms: default_politeness_max_ms(),
            rate_limit_delay_secs: default_rate_limit_delay_secs(),
            error_delay_secs: default_error_delay_secs(),
            base_url: default_base_url(),
            proxy: None,
            enable_multiplexing: false,
        }
    }
}

impl FetchConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("fetch.max_attempts must be at least 1".to_string());
        }
        if self.politeness_min_ms > self.politeness_max_ms {
            return Err(format!(
                "fetch.politeness_min_ms ({}) exceeds fetch.politeness_max_ms ({})",
                self.politeness_min_ms, self.politeness_max_ms
            ));
        }
        Ok(())
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_attempts() -> usize {
    3
}

fn default_politeness_min_ms() -> u64 {
    400
}

fn default_politeness_max_ms() -> u64 {
    1000
}

fn default_rate_limit_delay_secs() -> u64 {
    10
}

fn default_error_delay_secs() -> u64 {
    1
}

fn default_base_url() -> Url {
    Url::parse("https://www.reddit.com").expect("valid default base url")
}
