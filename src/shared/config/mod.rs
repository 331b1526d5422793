//! Application configuration module
//!
//! Provides the server configuration: listener address, SSE keepalive,
//! identity headers, event channel sizing and the resources to register at
//! startup. Configuration is read from a TOML file and then overridden by
//! environment variables.
//!
//! ```toml
//! port = 8080
//! keep_alive_ms = 20000
//!
//! [[resources]]
//! url = "/api/v1/widgets"
//! name_regex = "^/api/v1/(.*)"
//! permissions = ["read", "create"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_KEEP_ALIVE_MS: u64 = 20_000;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind (0 picks a free port)
    pub port: u16,
    /// Interval between SSE heartbeat comments
    pub keep_alive_ms: u64,
    /// Header carrying the requesting user's identity
    pub identity_header: String,
    /// Header carrying the requesting user's roles (comma separated)
    pub roles_header: String,
    /// Buffered events per collection before slow subscribers lag
    pub channel_capacity: usize,
    /// Resources registered at startup
    pub resources: Vec<ResourceConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            keep_alive_ms: DEFAULT_KEEP_ALIVE_MS,
            identity_header: "x-user-id".to_string(),
            roles_header: "x-user-roles".to_string(),
            channel_capacity: 1000,
            resources: Vec::new(),
        }
    }
}

/// A resource declared in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Collection URL, e.g. `/api/widgets`
    pub url: String,
    /// Regex whose first capture group names the resource
    #[serde(default)]
    pub name_regex: Option<String>,
    /// Allow-list of operations; omitted means full access
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    /// Identity attribute, `id` when omitted
    #[serde(default)]
    pub id_attribute: Option<String>,
    /// Whether to install HTTP routes for the resource
    #[serde(default = "default_true")]
    pub assign_routes: bool,
}

fn default_true() -> bool {
    true
}

impl ResourceConfig {
    /// Declare a resource at `url` with defaults for everything else
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name_regex: None,
            permissions: None,
            id_attribute: None,
            assign_routes: true,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `SERVER_HOST`, `SERVER_PORT` and `SSE_KEEP_ALIVE_MS` overrides
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::invalid("port", format!("'{}' is not a port number", port)))?;
        }
        if let Ok(ms) = std::env::var("SSE_KEEP_ALIVE_MS") {
            self.keep_alive_ms = ms
                .parse()
                .map_err(|_| ConfigError::invalid("keep_alive_ms", format!("'{}' is not a number", ms)))?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Heartbeat interval for SSE streams
    pub fn keep_alive(&self) -> Duration {
        Duration::from_millis(self.keep_alive_ms)
    }

    /// Address string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keep_alive_ms == 0 {
            return Err(ConfigError::invalid("keep_alive_ms", "must be greater than zero"));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::invalid("channel_capacity", "must be greater than zero"));
        }
        for (field, header) in [
            ("identity_header", &self.identity_header),
            ("roles_header", &self.roles_header),
        ] {
            let valid = !header.is_empty()
                && header
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
            if !valid {
                return Err(ConfigError::invalid(field, format!("'{}' is not a header name", header)));
            }
        }
        for resource in &self.resources {
            if !resource.url.starts_with('/') {
                return Err(ConfigError::invalid(
                    "resources.url",
                    format!("'{}' must start with '/'", resource.url),
                ));
            }
            if resource.url.trim_end_matches('/').is_empty() {
                return Err(ConfigError::invalid(
                    "resources.url",
                    "a resource cannot be mounted at '/'",
                ));
            }
        }
        Ok(())
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the bind host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the bind port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the SSE heartbeat interval
    pub fn keep_alive(mut self, interval: Duration) -> Self {
        self.config.keep_alive_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the identity header name
    pub fn identity_header(mut self, header: impl Into<String>) -> Self {
        self.config.identity_header = header.into();
        self
    }

    /// Set the roles header name
    pub fn roles_header(mut self, header: impl Into<String>) -> Self {
        self.config.roles_header = header.into();
        self
    }

    /// Set the per-collection event channel capacity
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Declare a resource
    pub fn resource(mut self, resource: ResourceConfig) -> Self {
        self.config.resources.push(resource);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}
