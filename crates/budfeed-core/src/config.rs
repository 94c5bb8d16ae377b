use crate::ConfigError;

/// Runtime configuration for a crawl run, sourced from `BUDFEED_*`
/// environment variables.
///
/// The backend base URL is the only required variable; everything else has
/// a conservative default matching the timings the menu sites tolerate.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the ingestion backend, e.g. `https://api.example.com`.
    /// Records are POSTed to `{backend_url}/strains/create-strains`.
    pub backend_url: String,
    pub log_level: String,
    /// Timeout for full page navigations (listing and detail pages).
    pub nav_timeout_secs: u64,
    /// Timeout for an expected element to appear after navigation or a
    /// pagination click.
    pub selector_timeout_secs: u64,
    /// Fixed settle delay after navigating to a detail page, giving the
    /// menu frontend time to hydrate before selectors are queried.
    pub settle_ms: u64,
    /// Minimum interval between consecutive product extractions.
    pub inter_item_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Explicit Chrome/Chromium binary path; when unset the launcher falls
    /// back to a `PATH` lookup.
    pub chrome_path: Option<std::path::PathBuf>,
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // The backend address is deliberately not defaulted: silently posting
    // scraped records to a hard-coded localhost is worse than failing fast.
    let backend_url = require("BUDFEED_BACKEND_URL")?;

    let log_level = or_default("BUDFEED_LOG_LEVEL", "info");
    let nav_timeout_secs = parse_u64("BUDFEED_NAV_TIMEOUT_SECS", "60")?;
    let selector_timeout_secs = parse_u64("BUDFEED_SELECTOR_TIMEOUT_SECS", "10")?;
    let settle_ms = parse_u64("BUDFEED_SETTLE_MS", "4000")?;
    let inter_item_delay_ms = parse_u64("BUDFEED_INTER_ITEM_DELAY_MS", "2000")?;
    let request_timeout_secs = parse_u64("BUDFEED_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("BUDFEED_USER_AGENT", "budfeed/0.1 (menu-crawler)");
    let max_retries = parse_u32("BUDFEED_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("BUDFEED_RETRY_BACKOFF_BASE_SECS", "1")?;
    let chrome_path = lookup("BUDFEED_CHROME_PATH")
        .ok()
        .map(std::path::PathBuf::from);

    Ok(AppConfig {
        backend_url,
        log_level,
        nav_timeout_secs,
        selector_timeout_secs,
        settle_ms,
        inter_item_delay_ms,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        chrome_path,
    })
}
