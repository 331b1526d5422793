/**
 * Server Configuration Loading
 *
 * Configuration comes from three layers, later ones winning:
 *
 * 1. built-in defaults
 * 2. the TOML file named by `RESTFEED_CONFIG`, when set
 * 3. `SERVER_HOST`, `SERVER_PORT` and `SSE_KEEP_ALIVE_MS`
 *
 * The result is validated before it is returned.
 */

use crate::shared::{ConfigError, ServerConfig};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "RESTFEED_CONFIG";

/// Load and validate the server configuration
///
/// # Errors
///
/// Returns a `ConfigError` when the file cannot be read or parsed, when an
/// environment override is malformed, or when validation fails.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
    let config = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            ServerConfig::from_file(&path)?
        }
        Err(_) => {
            tracing::info!("{} not set, using default configuration", CONFIG_PATH_VAR);
            ServerConfig::default()
        }
    };

    let config = config.apply_env()?;
    config.validate()?;

    tracing::info!(
        "Configuration loaded: {} resources, keep-alive {}ms",
        config.resources.len(),
        config.keep_alive_ms
    );
    Ok(config)
}
