//! Per-application token lifetimes and deployment-wide exemptions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::Deserialize;

use crate::config::TollgateConfig;
use crate::error::ConfigError;

/// Default access window: 5 minutes
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(5 * 60);
/// Default refresh window: 8 hours
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Token lifetimes for one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppPolicy {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for AppPolicy {
    fn default() -> Self {
        Self {
            access_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_ttl: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }
}

impl AppPolicy {
    pub fn new(access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_ttl_millis(&self) -> i64 {
        i64::try_from(self.access_ttl.as_millis()).unwrap_or(i64::MAX)
    }

    pub fn refresh_ttl_millis(&self) -> i64 {
        i64::try_from(self.refresh_ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Reject zero windows and a refresh window shorter than the access one.
    pub fn validate(&self, app: &str) -> Result<(), ConfigError> {
        if self.access_ttl.is_zero() || self.refresh_ttl.is_zero() {
            return Err(ConfigError::Policy(format!("{app}: token TTLs must be non-zero")));
        }
        if self.refresh_ttl < self.access_ttl {
            return Err(ConfigError::Policy(format!(
                "{app}: refresh TTL ({:?}) is shorter than access TTL ({:?})",
                self.refresh_ttl, self.access_ttl
            )));
        }
        Ok(())
    }
}

/// Raw configuration shape; accepts a bare string or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for ExemptPaths {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(path) => Self::new([path]),
            OneOrMany::Many(paths) => Self::new(paths),
        }
    }
}

/// Request paths for which authentication is skipped.
///
/// Matching is exact string equality: `/health` does not exempt `/health/`
/// or `/health/live`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct ExemptPaths(HashSet<String>);

impl ExemptPaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Resolves policy values for the session lifecycle.
///
/// Implementations are consulted on every validation; nothing is cached in
/// the claim.
pub trait PolicyResolver: Send + Sync {
    fn access_ttl(&self, app: &str) -> Duration;

    fn refresh_ttl(&self, app: &str) -> Duration;

    fn exempt_paths(&self) -> Arc<ExemptPaths>;

    fn secure_required(&self) -> bool;

    fn app_policy(&self, app: &str) -> AppPolicy {
        AppPolicy::new(self.access_ttl(app), self.refresh_ttl(app))
    }
}

/// Configuration-backed policy resolver.
#[derive(Debug)]
pub struct PolicySet {
    defaults: AppPolicy,
    apps: HashMap<String, AppPolicy>,
    exempt: ArcSwap<ExemptPaths>,
    secure: bool,
}

impl Default for PolicySet {
    fn default() -> Self {
        Self::new(AppPolicy::default())
    }
}

impl PolicySet {
    pub fn new(defaults: AppPolicy) -> Self {
        Self {
            defaults,
            apps: HashMap::new(),
            exempt: ArcSwap::from_pointee(ExemptPaths::default()),
            secure: false,
        }
    }

    /// Build and validate the policy set from loaded configuration.
    pub fn from_config(config: &TollgateConfig) -> Result<Self, ConfigError> {
        config.default_policy.validate("default")?;
        for (app, policy) in &config.app_policies {
            policy.validate(app)?;
        }

        Ok(Self {
            defaults: config.default_policy,
            apps: config.app_policies.clone(),
            exempt: ArcSwap::from_pointee(config.exempt_paths.clone()),
            secure: config.secure_cookies,
        })
    }

    #[must_use]
    pub fn with_app(mut self, app: impl Into<String>, policy: AppPolicy) -> Self {
        self.apps.insert(app.into(), policy);
        self
    }

    #[must_use]
    pub fn with_exempt_paths(self, paths: ExemptPaths) -> Self {
        self.exempt.store(Arc::new(paths));
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Swap in a new exempt set. Concurrent readers see the old or the new
    /// set, never a mix.
    pub fn replace_exempt_paths(&self, paths: ExemptPaths) {
        tracing::info!(count = paths.len(), "Replacing exempt paths");
        self.exempt.store(Arc::new(paths));
    }

    fn resolve(&self, app: &str) -> &AppPolicy {
        self.apps.get(app).unwrap_or(&self.defaults)
    }
}

impl PolicyResolver for PolicySet {
    fn access_ttl(&self, app: &str) -> Duration {
        self.resolve(app).access_ttl
    }

    fn refresh_ttl(&self, app: &str) -> Duration {
        self.resolve(app).refresh_ttl
    }

    fn exempt_paths(&self) -> Arc<ExemptPaths> {
        self.exempt.load_full()
    }

    fn secure_required(&self) -> bool {
        self.secure
    }

    fn app_policy(&self, app: &str) -> AppPolicy {
        *self.resolve(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exempt_paths_exact_match() {
        let exempt = ExemptPaths::new(["/login", "/health"]);

        assert!(exempt.is_exempt("/login"));
        assert!(exempt.is_exempt("/health"));
        assert!(!exempt.is_exempt("/login/"));
        assert!(!exempt.is_exempt("/health/live"));
        assert!(!exempt.is_exempt("/"));
        assert!(!exempt.is_exempt("/LOGIN"));
    }

    #[test]
    fn test_exempt_paths_scalar_normalized() {
        let exempt: ExemptPaths = serde_json::from_str(r#""/login""#).unwrap();
        assert_eq!(exempt, ExemptPaths::new(["/login"]));
        assert_eq!(exempt.len(), 1);

        let exempt: ExemptPaths = serde_json::from_str(r#"["/a", "/b", "/a"]"#).unwrap();
        assert_eq!(exempt.len(), 2);

        let exempt: ExemptPaths = serde_json::from_str("[]").unwrap();
        assert!(exempt.is_empty());
    }

    #[test]
    fn test_policy_falls_back_to_defaults() {
        let mobile = AppPolicy::new(Duration::from_secs(60), Duration::from_secs(600));
        let policies = PolicySet::default().with_app("mobileApp1", mobile);

        assert_eq!(policies.app_policy("mobileApp1"), mobile);
        assert_eq!(policies.access_ttl("web"), DEFAULT_ACCESS_TOKEN_TTL);
        assert_eq!(policies.refresh_ttl("web"), DEFAULT_REFRESH_TOKEN_TTL);
    }

    #[test]
    fn test_policy_validation() {
        assert!(AppPolicy::default().validate("default").is_ok());
        assert!(AppPolicy::new(Duration::ZERO, Duration::from_secs(1))
            .validate("x")
            .is_err());
        let err = AppPolicy::new(Duration::from_secs(10), Duration::from_secs(5))
            .validate("short")
            .unwrap_err();
        assert!(err.to_string().contains("short"));
    }

    #[test]
    fn test_replace_exempt_paths() {
        let policies = PolicySet::default().with_exempt_paths(ExemptPaths::new(["/old"]));
        let before = policies.exempt_paths();

        policies.replace_exempt_paths(ExemptPaths::new(["/new"]));

        // A reader holding the old set keeps a consistent view.
        assert!(before.is_exempt("/old"));
        assert!(policies.exempt_paths().is_exempt("/new"));
        assert!(!policies.exempt_paths().is_exempt("/old"));
    }
}
