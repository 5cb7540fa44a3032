//! Session lifecycle: issue, validate (with sliding refresh), revoke.
//!
//! The lifecycle is stateless between requests. Everything it knows about a
//! session arrives in the token cookie, and everything it changes leaves as a
//! `Set-Cookie` instruction on the same exchange.
//!
//! ```text
//! AccessValid ──(exp < now)──> AccessExpired
//! AccessExpired ──(rtexp < now)──> RefreshExpired        deny
//! AccessExpired ──────────────────> RefreshValid
//! RefreshValid ──(authorizer: no)──> RefreshDenied       deny
//! RefreshValid ──(authorizer: yes)─> RefreshGranted      allow + new cookie
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::claim::{SessionClaim, UserData};
use crate::clock::{Clock, SystemClock};
use crate::codec::{HmacCodec, TokenCodec};
use crate::config::{TollgateConfig, DEFAULT_COOKIE_LIFETIME};
use crate::error::{ConfigError, DenyReason, SessionError};
use crate::policy::{AppPolicy, ExemptPaths, PolicyResolver, PolicySet};
use crate::refresh::{AuthorizerSlot, RefreshAuthorizer};
use crate::transport::{SetCookie, TokenTransport, DEFAULT_TOKEN_NAME};

/// Outcome of [`SessionLifecycle::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Proceed. `None` means the path is exempt and no session was read.
    Allow(Option<UserData>),
    /// Stop with a 401; the reason is for logs only.
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    pub fn user_data(&self) -> Option<&UserData> {
        match self {
            Self::Allow(data) => data.as_ref(),
            Self::Deny(_) => None,
        }
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow(_) => None,
            Self::Deny(reason) => Some(*reason),
        }
    }
}

/// The session state machine.
pub struct SessionLifecycle<C = HmacCodec, P = PolicySet> {
    codec: C,
    policy: P,
    authorizer: AuthorizerSlot,
    clock: Arc<dyn Clock>,
    issuer: String,
    cookie_name: String,
    cookie_lifetime: Duration,
}

impl SessionLifecycle {
    /// Build the default HMAC/config-backed lifecycle
    pub fn from_config(config: &TollgateConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let codec = HmacCodec::from_secret(&config.session_secret)?;
        let policy = PolicySet::from_config(config)?;

        Ok(Self::new(codec, policy, config.issuer.clone())
            .with_cookie_name(config.cookie_name.clone())
            .with_cookie_lifetime(config.cookie_lifetime))
    }
}

impl<C: TokenCodec> SessionLifecycle<C, PolicySet> {
    /// Swap the exempt path set for all subsequent validations
    pub fn replace_exempt_paths(&self, paths: ExemptPaths) {
        self.policy.replace_exempt_paths(paths);
    }
}

impl<C: TokenCodec, P: PolicyResolver> SessionLifecycle<C, P> {
    pub fn new(codec: C, policy: P, issuer: impl Into<String>) -> Self {
        Self {
            codec,
            policy,
            authorizer: AuthorizerSlot::default(),
            clock: Arc::new(SystemClock),
            issuer: issuer.into(),
            cookie_name: DEFAULT_TOKEN_NAME.to_string(),
            cookie_lifetime: DEFAULT_COOKIE_LIFETIME,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
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

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Install the refresh authorizer, replacing the previous one.
    pub fn set_refresh_authorizer(&self, authorizer: impl RefreshAuthorizer + 'static) {
        self.authorizer.install(authorizer);
    }

    /// Create a session for `sub` under `app` and emit its cookie.
    ///
    /// Returns the signed token that was written.
    pub fn issue<T: TokenTransport>(
        &self,
        transport: &mut T,
        app: &str,
        sub: impl Into<String>,
        data: Value,
    ) -> Result<String, SessionError> {
        let now = self.clock.now();
        let policy = self.policy.app_policy(app);
        let claim = SessionClaim::issue(
            self.issuer.clone(),
            UserData::new(app, sub, data),
            &policy,
            now,
        );

        let token = self.codec.serialize(&claim).map_err(|e| {
            tracing::error!(error = %e, app, "Failed to sign session");
            e
        })?;

        let name = self.token_name(transport);
        self.emit(transport, name, token.clone(), &policy, now);

        tracing::info!(app, sub = %claim.user_data.sub, "Authentication created");
        Ok(token)
    }

    /// Invalidate the session cookie. Always succeeds, even without a session.
    pub fn revoke<T: TokenTransport>(&self, transport: &mut T) {
        let name = self.token_name(transport);
        transport.write_set_cookie(SetCookie {
            name,
            value: String::new(),
            http_only: true,
            path: "/".to_string(),
            secure: self.policy.secure_required(),
            expires_at: DateTime::<Utc>::default(),
        });
        tracing::debug!("Authentication destroyed");
    }

    /// Decide whether the request may proceed.
    ///
    /// Exempt paths are allowed without touching the token. Otherwise the
    /// token is read, verified and, if its access window has closed, renewed.
    /// Denials are logged here and nowhere else.
    pub fn validate<T: TokenTransport>(&self, transport: &mut T) -> Decision {
        if self.policy.exempt_paths().is_exempt(transport.path()) {
            tracing::trace!(path = transport.path(), "Exempt path");
            return Decision::Allow(None);
        }

        match self.authenticate(transport) {
            Ok(user_data) => Decision::Allow(Some(user_data)),
            Err(reason) => {
                tracing::warn!(
                    path = transport.path(),
                    reason = reason.code(),
                    "Authentication Error: Not Authenticated"
                );
                Decision::Deny(reason)
            }
        }
    }

    fn authenticate<T: TokenTransport>(&self, transport: &mut T) -> Result<UserData, DenyReason> {
        let now = self.clock.now();
        let name = self.token_name(transport);

        let token = transport
            .read_cookie(&name)
            .filter(|t| !t.is_empty())
            .ok_or(DenyReason::MissingToken)?;

        let claim = self.codec.deserialize(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected by codec");
            DenyReason::InvalidToken
        })?;

        if claim.is_access_alive(now) {
            return Ok(claim.user_data);
        }

        self.refresh(transport, name, &claim, now)
    }

    fn refresh<T: TokenTransport>(
        &self,
        transport: &mut T,
        name: String,
        claim: &SessionClaim,
        now: DateTime<Utc>,
    ) -> Result<UserData, DenyReason> {
        if !claim.is_refresh_alive(now) {
            return Err(DenyReason::AccessExpiredRefreshExpired);
        }

        if !self.authorizer.can_refresh(claim) {
            return Err(DenyReason::AccessExpiredRefreshDenied);
        }

        // Re-resolved from the claim's own app: the policy may have changed
        // since issuance.
        let policy = self.policy.app_policy(claim.application());
        let renewed = claim.renewed(&policy, now);

        let token = self.codec.serialize(&renewed).map_err(|e| {
            tracing::error!(error = %e, "Failed to re-sign session");
            DenyReason::InvalidToken
        })?;

        self.emit(transport, name, token, &policy, now);
        tracing::debug!(
            app = claim.application(),
            sub = %claim.user_data.sub,
            "Session refreshed"
        );

        Ok(renewed.user_data)
    }

    fn emit<T: TokenTransport>(
        &self,
        transport: &mut T,
        name: String,
        token: String,
        policy: &AppPolicy,
        now: DateTime<Utc>,
    ) {
        transport.write_set_cookie(SetCookie {
            name,
            value: token,
            http_only: true,
            path: "/".to_string(),
            secure: self.policy.secure_required(),
            expires_at: self.cookie_expiry(policy, now),
        });
    }

    /// The cookie always outlives the refresh window it carries.
    fn cookie_expiry(&self, policy: &AppPolicy, now: DateTime<Utc>) -> DateTime<Utc> {
        let floor = policy
            .refresh_ttl
            .saturating_add(Duration::from_secs(24 * 60 * 60));
        let lifetime = self.cookie_lifetime.max(floor);
        chrono::Duration::from_std(lifetime)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn token_name<T: TokenTransport>(&self, transport: &T) -> String {
        transport
            .token_name_override()
            .filter(|n| !n.is_empty())
            .unwrap_or(self.cookie_name.as_str())
            .to_string()
    }
}

impl<C, P> std::fmt::Debug for SessionLifecycle<C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycle")
            .field("issuer", &self.issuer)
            .field("cookie_name", &self.cookie_name)
            .finish_non_exhaustive()
    }
}
