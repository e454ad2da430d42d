//! Client configuration loaded from environment variables.
//!
//! Configuration is read once at startup via `std::env::var`, after `dotenvy`
//! has had a chance to populate the environment from a local `.env` file.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `MARQUEE_API_BASE_URL`: Base URL of the platform API (e.g. `https://api.example.com`)
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,marquee=debug")
//! - `MARQUEE_API_TOKEN`: Opaque bearer token issued by the surrounding application
//! - `MARQUEE_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 15)
//! - `MARQUEE_PAGE_SIZE`: Items requested per page (default: 10)
//! - `MARQUEE_NOTICE_CAPACITY`: Buffered user notices per subscriber (default: 100)

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL every resource path is resolved against
    pub api_base_url: String,

    /// Bearer token attached to every request when present
    pub api_token: Option<String>,

    /// Timeout for a single request, in seconds
    pub request_timeout_seconds: u64,

    /// Number of items requested per page
    pub page_size: u32,

    /// Capacity of the notice broadcast channel
    pub notice_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a set variable
    /// cannot be parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            api_base_url: env_required("MARQUEE_API_BASE_URL")?,
            api_token: std::env::var("MARQUEE_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            request_timeout_seconds: env_or("MARQUEE_REQUEST_TIMEOUT_SECONDS", 15)?,
            page_size: env_or("MARQUEE_PAGE_SIZE", 10)?,
            notice_capacity: env_or("MARQUEE_NOTICE_CAPACITY", 100)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("MARQUEE_PAGE_SIZE must be greater than zero");
        }
        if self.notice_capacity == 0 {
            anyhow::bail!("MARQUEE_NOTICE_CAPACITY must be greater than zero");
        }
        Ok(())
    }
}

/// Load a required environment variable.
///
/// # Errors
///
/// Returns an error if the variable is not set.
fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
