use crate::app_config::{AppConfig, Environment};
use crate::retailers::{load_catalog, RetailerCatalog};
use crate::ConfigError;

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

impl AppConfig {
    /// Builds the retailer catalog this process will share read-only.
    ///
    /// Uses the YAML file at `retailers_path` when configured, otherwise the
    /// built-in table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured file cannot be loaded or is invalid.
    pub fn retailer_catalog(&self) -> Result<RetailerCatalog, ConfigError> {
        match &self.retailers_path {
            Some(path) => load_catalog(path),
            None => Ok(RetailerCatalog::builtin()),
        }
    }

    /// Returns the Vision API key, or `MissingEnvVar` when recognition is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `GOOGLE_VISION_API_KEY` is unset.
    pub fn require_vision_api_key(&self) -> Result<&str, ConfigError> {
        self.vision_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_VISION_API_KEY".to_string()))
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let env = parse_environment(&or_default("PRICELENS_ENV", "development"));
    let bind_addr = parse_addr("PRICELENS_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("PRICELENS_LOG_LEVEL", "info");
    let retailers_path = optional("PRICELENS_RETAILERS_PATH").map(PathBuf::from);

    let fetch_timeout_secs = parse_u64("PRICELENS_FETCH_TIMEOUT_SECS", "15")?;
    if fetch_timeout_secs == 0 {
        return Err(invalid(
            "PRICELENS_FETCH_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let fetch_max_retries = parse_u32("PRICELENS_FETCH_MAX_RETRIES", "0")?;
    let fetch_backoff_base_ms = parse_u64("PRICELENS_FETCH_BACKOFF_BASE_MS", "500")?;
    let user_agent = or_default("PRICELENS_USER_AGENT", DEFAULT_USER_AGENT);

    let scraper_api_key = optional("SCRAPER_API_KEY");
    let scraper_api_url = or_default("PRICELENS_SCRAPER_API_URL", "http://api.scraperapi.com");
    let search_url = or_default("PRICELENS_SEARCH_URL", "https://www.google.com/search");

    let vision_api_key = optional("GOOGLE_VISION_API_KEY");
    let vision_url = or_default(
        "PRICELENS_VISION_URL",
        "https://vision.googleapis.com/v1/images:annotate",
    );
    let vision_timeout_secs = parse_u64("PRICELENS_VISION_TIMEOUT_SECS", "30")?;
    let max_upload_bytes = parse_usize("PRICELENS_MAX_UPLOAD_BYTES", "10485760")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        retailers_path,
        fetch_timeout_secs,
        fetch_max_retries,
        fetch_backoff_base_ms,
        user_agent,
        scraper_api_key,
        scraper_api_url,
        search_url,
        vision_api_key,
        vision_url,
        vision_timeout_secs,
        max_upload_bytes,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
