//! Configuration types for the session layer

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::crypto::HmacKey;
use crate::error::ConfigError;
use crate::policy::{AppPolicy, ExemptPaths};
use crate::transport::DEFAULT_TOKEN_NAME;

/// Lifetime of the transport cookie itself. The signed claim, not this
/// attribute, decides whether a session is valid.
pub const DEFAULT_COOKIE_LIFETIME: Duration = Duration::from_secs(400 * 24 * 60 * 60);

/// Session layer configuration
#[derive(Debug, Clone)]
pub struct TollgateConfig {
    /// Value of the `iss` claim
    pub issuer: String,
    /// HMAC secret for token signing (at least 32 bytes)
    pub session_secret: String,
    /// Lifetimes for applications without an override
    pub default_policy: AppPolicy,
    /// Per-application overrides
    pub app_policies: HashMap<String, AppPolicy>,
    /// Paths that skip authentication
    pub exempt_paths: ExemptPaths,
    /// Mark cookies `Secure`
    pub secure_cookies: bool,
    /// Cookie name when the request does not override it
    pub cookie_name: String,
    /// `Expires` horizon for the transport cookie
    pub cookie_lifetime: Duration,
}

/// Per-app override as written in configuration: milliseconds, each field
/// optional.
#[derive(Debug, Deserialize)]
struct AppPolicyOverride {
    #[serde(rename = "accessTokenTTL")]
    access_token_ttl: Option<u64>,
    #[serde(rename = "refreshTokenTTL")]
    refresh_token_ttl: Option<u64>,
}

impl AppPolicyOverride {
    fn resolve(&self, defaults: &AppPolicy) -> AppPolicy {
        AppPolicy {
            access_ttl: self
                .access_token_ttl
                .map(Duration::from_millis)
                .unwrap_or(defaults.access_ttl),
            refresh_ttl: self
                .refresh_token_ttl
                .map(Duration::from_millis)
                .unwrap_or(defaults.refresh_ttl),
        }
    }
}

impl TollgateConfig {
    /// Create a config with default lifetimes and no exemptions
    pub fn new(issuer: impl Into<String>, session_secret: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            session_secret: session_secret.into(),
            default_policy: AppPolicy::default(),
            app_policies: HashMap::new(),
            exempt_paths: ExemptPaths::default(),
            secure_cookies: false,
            cookie_name: DEFAULT_TOKEN_NAME.to_string(),
            cookie_lifetime: DEFAULT_COOKIE_LIFETIME,
        }
    }

    /// Load configuration from `TOLLGATE_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `TOLLGATE_SESSION_SECRET` | signing secret (required, >= 32 bytes) |
    /// | `TOLLGATE_ISSUER` | `iss` claim, default `tollgate` |
    /// | `TOLLGATE_ACCESS_TOKEN_TTL_MS` | default access window |
    /// | `TOLLGATE_REFRESH_TOKEN_TTL_MS` | default refresh window |
    /// | `TOLLGATE_APP_POLICIES` | JSON object `{app: {accessTokenTTL, refreshTokenTTL}}` |
    /// | `TOLLGATE_EXEMPT_PATHS` | JSON string or array; a bare path is accepted too |
    /// | `TOLLGATE_SECURE_COOKIES` | `true`/`false` |
    /// | `TOLLGATE_COOKIE_NAME` | default `tkn` |
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_secret = lookup("TOLLGATE_SESSION_SECRET")
            .ok_or(ConfigError::Missing("TOLLGATE_SESSION_SECRET"))?;
        HmacKey::new(&session_secret)?;

        let issuer = lookup("TOLLGATE_ISSUER").unwrap_or_else(|| "tollgate".to_string());
        let mut config = Self::new(issuer, session_secret);

        if let Some(raw) = lookup("TOLLGATE_ACCESS_TOKEN_TTL_MS") {
            let ms: u64 = raw
                .parse()
                .map_err(|_| ConfigError::Invalid("TOLLGATE_ACCESS_TOKEN_TTL_MS"))?;
            config.default_policy.access_ttl = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("TOLLGATE_REFRESH_TOKEN_TTL_MS") {
            let ms: u64 = raw
                .parse()
                .map_err(|_| ConfigError::Invalid("TOLLGATE_REFRESH_TOKEN_TTL_MS"))?;
            config.default_policy.refresh_ttl = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("TOLLGATE_APP_POLICIES") {
            let overrides: HashMap<String, AppPolicyOverride> = serde_json::from_str(&raw)
                .map_err(|source| ConfigError::Json {
                    var: "TOLLGATE_APP_POLICIES",
                    source,
                })?;
            config.app_policies = overrides
                .into_iter()
                .map(|(app, o)| {
                    let policy = o.resolve(&config.default_policy);
                    (app, policy)
                })
                .collect();
        }

        if let Some(raw) = lookup("TOLLGATE_EXEMPT_PATHS") {
            config.exempt_paths = parse_exempt_paths(&raw)?;
        }

        if let Some(raw) = lookup("TOLLGATE_SECURE_COOKIES") {
            config.secure_cookies = raw
                .parse()
                .map_err(|_| ConfigError::Invalid("TOLLGATE_SECURE_COOKIES"))?;
        }

        if let Some(name) = lookup("TOLLGATE_COOKIE_NAME") {
            if name.is_empty() {
                return Err(ConfigError::Invalid("TOLLGATE_COOKIE_NAME"));
            }
            config.cookie_name = name;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check everything that would otherwise fail at request time
    pub fn validate(&self) -> Result<(), ConfigError> {
        HmacKey::new(&self.session_secret)?;
        self.default_policy.validate("default")?;
        for (app, policy) in &self.app_policies {
            policy.validate(app)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn with_default_policy(mut self, policy: AppPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    #[must_use]
    pub fn with_app_policy(mut self, app: impl Into<String>, policy: AppPolicy) -> Self {
        self.app_policies.insert(app.into(), policy);
        self
    }

    #[must_use]
    pub fn with_exempt_paths(mut self, paths: ExemptPaths) -> Self {
        self.exempt_paths = paths;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_cookie_lifetime(mut self, lifetime: Duration) -> Self {
        self.cookie_lifetime = lifetime;
        self
    }
}

/// JSON string or array; anything that isn't JSON is taken as one path.
fn parse_exempt_paths(raw: &str) -> Result<ExemptPaths, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('"') {
        serde_json::from_str(trimmed).map_err(|source| ConfigError::Json {
            var: "TOLLGATE_EXEMPT_PATHS",
            source,
        })
    } else if trimmed.is_empty() {
        Ok(ExemptPaths::default())
    } else {
        Ok(ExemptPaths::new([trimmed]))
    }
}
