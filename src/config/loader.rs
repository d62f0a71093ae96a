//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::OpsyncConfig;
use super::secret_string;
use crate::domain::errors::OpsyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into OpsyncConfig
/// 4. Applies environment variable overrides (OPSYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read, a referenced
/// environment variable is unset, the TOML is malformed or validation fails.
///
/// # Examples
///
/// ```no_run
/// use opsync::config::loader::load_config;
///
/// let config = load_config("opsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<OpsyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(OpsyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        OpsyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying substitution, overrides and validation
///
/// # Errors
///
/// Same as [`load_config`], minus the file access.
pub fn parse_config(contents: &str) -> Result<OpsyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: OpsyncConfig = toml::from_str(&contents)
        .map_err(|e| OpsyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        OpsyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn env_placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_placeholder();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(OpsyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.parse().ok())
}

/// Applies environment variable overrides using the OPSYNC_* prefix
///
/// Environment variables follow the pattern: OPSYNC_<SECTION>_<KEY>
/// For example: OPSYNC_DATABASE_SCHEMA, OPSYNC_SYNC_LOOKBACK_HOURS
fn apply_env_overrides(config: &mut OpsyncConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("OPSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(dry_run) = env_parsed("OPSYNC_APPLICATION_DRY_RUN") {
        config.application.dry_run = dry_run;
    }

    // API overrides
    if let Ok(val) = std::env::var("OPSYNC_API_ENDPOINT") {
        config.api.endpoint = val;
    }
    if let Ok(val) = std::env::var("OPSYNC_API_PRODUCT_AREA") {
        config.api.product_area = val;
    }
    if let Some(size) = env_parsed("OPSYNC_API_PAGE_SIZE") {
        config.api.page_size = size;
    }
    if let Some(timeout) = env_parsed("OPSYNC_API_TIMEOUT_SECONDS") {
        config.api.timeout_seconds = timeout;
    }
    if let Some(attempts) = env_parsed("OPSYNC_API_RETRY_MAX_ATTEMPTS") {
        config.api.retry.max_attempts = attempts;
    }
    if let Some(delay) = env_parsed("OPSYNC_API_RETRY_INITIAL_DELAY_MS") {
        config.api.retry.initial_delay_ms = delay;
    }
    if let Some(multiplier) = env_parsed("OPSYNC_API_RETRY_BACKOFF_MULTIPLIER") {
        config.api.retry.backoff_multiplier = multiplier;
    }
    if let Some(delay) = env_parsed("OPSYNC_API_RETRY_MAX_DELAY_MS") {
        config.api.retry.max_delay_ms = delay;
    }

    // Database overrides
    if let Ok(val) = std::env::var("OPSYNC_DATABASE_CONNECTION_STRING") {
        config.database.connection_string = secret_string(val);
    }
    if let Ok(val) = std::env::var("OPSYNC_DATABASE_SCHEMA") {
        config.database.schema = val;
    }
    if let Ok(val) = std::env::var("OPSYNC_DATABASE_LAYER_POINT") {
        config.database.layer_point = val;
    }
    if let Ok(val) = std::env::var("OPSYNC_DATABASE_LAYER_LINE") {
        config.database.layer_line = val;
    }
    if let Ok(val) = std::env::var("OPSYNC_DATABASE_LAYER_POLYGON") {
        config.database.layer_polygon = val;
    }
    if let Ok(val) = std::env::var("OPSYNC_DATABASE_SSL_MODE") {
        config.database.ssl_mode = val;
    }
    if let Some(max) = env_parsed("OPSYNC_DATABASE_MAX_CONNECTIONS") {
        config.database.max_connections = max;
    }
    if let Some(timeout) = env_parsed("OPSYNC_DATABASE_CONNECTION_TIMEOUT_SECONDS") {
        config.database.connection_timeout_seconds = timeout;
    }
    if let Some(timeout) = env_parsed("OPSYNC_DATABASE_STATEMENT_TIMEOUT_SECONDS") {
        config.database.statement_timeout_seconds = timeout;
    }

    // Sync overrides
    if let Ok(val) = std::env::var("OPSYNC_SYNC_GEOMETRY_BOUNDS") {
        config.sync.geometry_bounds = val;
    }
    if let Some(hours) = env_parsed("OPSYNC_SYNC_LOOKBACK_HOURS") {
        config.sync.lookback_hours = hours;
    }
    if let Some(concurrency) = env_parsed("OPSYNC_SYNC_ENRICHMENT_CONCURRENCY") {
        config.sync.enrichment_concurrency = concurrency;
    }
    if let Some(drop) = env_parsed("OPSYNC_SYNC_DROP_INVALID_GEOMETRIES") {
        config.sync.drop_invalid_geometries = drop;
    }

    // Logging overrides
    if let Some(enabled) = env_parsed("OPSYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("OPSYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("OPSYNC_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
