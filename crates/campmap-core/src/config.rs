use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; tests drive this with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("CAMPMAP_ENV", "development"));
    let log_level = or_default("CAMPMAP_LOG_LEVEL", "info");
    let campsites_path = PathBuf::from(or_default(
        "CAMPMAP_CAMPSITES_PATH",
        "./data/campsites.csv",
    ));

    let geocoder_base_url = or_default(
        "CAMPMAP_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let geocoder_user_agent = or_default(
        "CAMPMAP_GEOCODER_USER_AGENT",
        "campmap/0.1 (ny-campsite-viewer)",
    );
    let geocoder_timeout_secs = parse_u64("CAMPMAP_GEOCODER_TIMEOUT_SECS", "10")?;
    let geocoder_min_interval_ms = parse_u64("CAMPMAP_GEOCODER_MIN_INTERVAL_MS", "1000")?;

    let cache_max_entries = parse_u64("CAMPMAP_CACHE_MAX_ENTRIES", "256")?;
    let cache_max_entries = match usize::try_from(cache_max_entries) {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(e) => {
            return Err(ConfigError::InvalidEnvVar {
                var: "CAMPMAP_CACHE_MAX_ENTRIES".to_string(),
                reason: e.to_string(),
            })
        }
    };

    let cache_ttl_secs = match lookup("CAMPMAP_CACHE_TTL_SECS") {
        Ok(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "CAMPMAP_CACHE_TTL_SECS".to_string(),
            reason: e.to_string(),
        })?),
        Err(_) => None,
    };

    Ok(AppConfig {
        env,
        log_level,
        campsites_path,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_min_interval_ms,
        cache_max_entries,
        cache_ttl_secs,
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
