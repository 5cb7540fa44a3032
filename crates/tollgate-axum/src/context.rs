//! Request-scoped session data.
//!
//! [`SessionContext`] is inserted into request extensions by the
//! [`SessionLayer`](crate::SessionLayer) when a session validates.

use serde_json::Value;
use tollgate_core::UserData;

/// The authenticated session's user data.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext(pub UserData);

impl SessionContext {
    /// Application identifier the session was issued for.
    #[must_use]
    pub fn application(&self) -> &str {
        &self.0.app
    }

    /// Subject (user) identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }

    /// Caller-supplied payload given at login.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.0.data
    }

    #[must_use]
    pub fn into_inner(self) -> UserData {
        self.0
    }
}

impl From<UserData> for SessionContext {
    fn from(data: UserData) -> Self {
        Self(data)
    }
}
