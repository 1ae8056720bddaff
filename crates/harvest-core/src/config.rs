use crate::app_config::{AppConfig, PriceField, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
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
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// Every knob has a default; nothing is required here. The merchant id is a CLI
/// argument, not configuration.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false/1/0, got {other:?}"),
            }),
        }
    };

    let log_level = or_default("HARVEST_LOG_LEVEL", "info");

    let scroll_pause_ms = parse_u64("HARVEST_SCROLL_PAUSE_MS", "1500")?;
    let initial_load_timeout_secs = parse_u64("HARVEST_INITIAL_LOAD_TIMEOUT_SECS", "10")?;
    let max_empty_scrolls = parse_u32("HARVEST_MAX_EMPTY_SCROLLS", "3")?;
    let max_cycles = parse_u64("HARVEST_MAX_CYCLES", "0")?;

    let price_field = or_default("HARVEST_PRICE_FIELD", "origin")
        .parse::<PriceField>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "HARVEST_PRICE_FIELD".to_string(),
            reason: e.to_string(),
        })?;

    let user_agent = or_default("HARVEST_USER_AGENT", DEFAULT_USER_AGENT);
    let viewport_width = parse_u32("HARVEST_VIEWPORT_WIDTH", "360")?;
    let viewport_height = parse_u32("HARVEST_VIEWPORT_HEIGHT", "640")?;
    let headless = parse_bool("HARVEST_HEADLESS", "true")?;
    let chrome_executable = lookup("HARVEST_CHROME_EXECUTABLE").ok().map(PathBuf::from);
    let output_dir = PathBuf::from(or_default("HARVEST_OUTPUT_DIR", "."));

    Ok(AppConfig {
        log_level,
        scroll_pause_ms,
        initial_load_timeout_secs,
        max_empty_scrolls,
        max_cycles,
        price_field,
        user_agent,
        viewport_width,
        viewport_height,
        headless,
        chrome_executable,
        output_dir,
    })
}
