//! Session claim carried inside the token cookie.
//!
//! Expiries are epoch milliseconds. The wire names (`exp`, `iss`, `rtexp`,
//! `udata`) are kept short because the whole claim travels in a cookie.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::policy::AppPolicy;

/// Caller data bound to a session and handed to downstream handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    /// Application identifier; selects the policy for every validation.
    pub app: String,
    /// Subject (user) identifier
    pub sub: String,
    /// Arbitrary caller-supplied payload
    #[serde(default)]
    pub data: Value,
}

impl UserData {
    pub fn new(app: impl Into<String>, sub: impl Into<String>, data: Value) -> Self {
        Self {
            app: app.into(),
            sub: sub.into(),
            data,
        }
    }
}

/// Decoded token payload.
///
/// A claim is never mutated after signing: [`SessionClaim::renewed`] builds a
/// new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaim {
    /// Access window end (ms)
    #[serde(rename = "exp")]
    pub access_expiry: i64,
    /// Issuing deployment
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Refresh window end (ms)
    #[serde(rename = "rtexp")]
    pub refresh_expiry: i64,
    #[serde(rename = "udata")]
    pub user_data: UserData,
}

impl SessionClaim {
    /// Build a fresh claim whose windows both start at `now`.
    ///
    /// The refresh window never ends before the access window, whatever
    /// `policy` says.
    pub fn issue(
        issuer: impl Into<String>,
        user_data: UserData,
        policy: &AppPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let now_ms = now.timestamp_millis();
        let access_expiry = now_ms.saturating_add(policy.access_ttl_millis());
        let refresh_expiry = now_ms
            .saturating_add(policy.refresh_ttl_millis())
            .max(access_expiry);
        Self {
            access_expiry,
            issuer: issuer.into(),
            refresh_expiry,
            user_data,
        }
    }

    /// Sliding renewal: both windows restart at `now` under `policy`.
    #[must_use]
    pub fn renewed(&self, policy: &AppPolicy, now: DateTime<Utc>) -> Self {
        Self::issue(self.issuer.clone(), self.user_data.clone(), policy, now)
    }

    /// The access window is still open (inclusive of its last millisecond).
    pub fn is_access_alive(&self, now: DateTime<Utc>) -> bool {
        self.access_expiry >= now.timestamp_millis()
    }

    /// The session can still be renewed.
    pub fn is_refresh_alive(&self, now: DateTime<Utc>) -> bool {
        self.refresh_expiry >= now.timestamp_millis()
    }

    pub fn application(&self) -> &str {
        &self.user_data.app
    }

    pub fn access_expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.access_expiry)
    }

    pub fn refresh_expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.refresh_expiry)
    }
}
