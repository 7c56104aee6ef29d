use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://aps.senasa.gob.ar/restapiprod/servicios/renspa";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup indirection lets tests drive this
/// with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let log_level = or_default("RENSPA_LOG_LEVEL", "info");

    let api_base_url = or_default("RENSPA_API_BASE_URL", DEFAULT_API_BASE_URL);
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "RENSPA_API_BASE_URL",
            format!("\"{api_base_url}\" is not an http(s) URL"),
        ));
    }

    let list_timeout_secs = parse_u64("RENSPA_LIST_TIMEOUT_SECS", "15")?;
    let detail_timeout_secs = parse_u64("RENSPA_DETAIL_TIMEOUT_SECS", "10")?;

    let page_size = parse_u32("RENSPA_PAGE_SIZE", "10")?;
    if page_size == 0 {
        return Err(invalid("RENSPA_PAGE_SIZE", "must be greater than 0".into()));
    }
    let max_pages = parse_usize("RENSPA_MAX_PAGES", "500")?;

    let inter_request_delay_ms = parse_u64("RENSPA_INTER_REQUEST_DELAY_MS", "500")?;
    let max_retries = parse_u32("RENSPA_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("RENSPA_RETRY_BACKOFF_BASE_MS", "1000")?;
    let max_concurrent_taxpayers = parse_usize("RENSPA_MAX_CONCURRENT_TAXPAYERS", "1")?;

    let user_agent = or_default("RENSPA_USER_AGENT", "renspa/0.1 (property-geometry)");
    let map_links = parse_bool("RENSPA_MAP_LINKS", "true")?;

    Ok(AppConfig {
        log_level,
        api_base_url,
        list_timeout_secs,
        detail_timeout_secs,
        page_size,
        max_pages,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_ms,
        max_concurrent_taxpayers,
        user_agent,
        map_links,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
