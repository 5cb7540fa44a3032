//! Application state

use std::sync::Arc;

use tollgate_core::{ConfigError, SessionLifecycle, TollgateConfig};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Issues, renews and revokes session cookies
    pub lifecycle: Arc<SessionLifecycle>,
}

impl AppState {
    pub fn new(lifecycle: SessionLifecycle) -> Self {
        Self {
            lifecycle: Arc::new(lifecycle),
        }
    }

    pub fn from_config(config: &TollgateConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(SessionLifecycle::from_config(config)?))
    }
}
