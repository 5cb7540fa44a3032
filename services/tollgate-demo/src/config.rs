//! Configuration for the demo service.

use tollgate_core::{ExemptPaths, TollgateConfig};

/// Routes served without a session, on top of `TOLLGATE_EXEMPT_PATHS`
pub const PUBLIC_PATHS: [&str; 3] = ["/login", "/logout", "/health"];

/// Demo service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Session layer configuration
    pub tollgate: TollgateConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        let tollgate = with_public_paths(TollgateConfig::from_env()?);

        Ok(Self {
            http_port,
            tollgate,
        })
    }
}

/// Add [`PUBLIC_PATHS`] to the configured exempt set.
pub fn with_public_paths(config: TollgateConfig) -> TollgateConfig {
    let paths: Vec<String> = config
        .exempt_paths
        .iter()
        .chain(PUBLIC_PATHS)
        .map(str::to_owned)
        .collect();
    config.with_exempt_paths(ExemptPaths::new(paths))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Session config error: {0}")]
    Tollgate(#[from] tollgate_core::ConfigError),
}
