//! Transport seam between the lifecycle and the request/response pair.
//!
//! HTTP integrations implement [`TokenTransport`] over their own request and
//! response types. [`MemoryExchange`] is a plain in-memory implementation for
//! non-HTTP pipelines and tests.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Cookie name used when nothing overrides it
pub const DEFAULT_TOKEN_NAME: &str = "tkn";

/// Query parameter / header carrying an application-scoped cookie name
pub const TOKEN_NAME_OVERRIDE: &str = "tknAppName";

/// Outbound cookie instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub http_only: bool,
    pub path: String,
    pub secure: bool,
    pub expires_at: DateTime<Utc>,
}

impl SetCookie {
    /// An empty value means the session was revoked.
    pub fn is_removal(&self) -> bool {
        self.value.is_empty()
    }
}

/// One request/response pair as seen by the lifecycle.
pub trait TokenTransport {
    /// Request path used for exemption matching
    fn path(&self) -> &str;

    /// Cookie name requested by the caller, if any
    fn token_name_override(&self) -> Option<&str>;

    fn read_cookie(&self, name: &str) -> Option<&str>;

    fn write_set_cookie(&mut self, cookie: SetCookie);
}

/// In-memory request/response pair.
///
/// Cookies written through [`TokenTransport::write_set_cookie`] are kept in
/// `written`; [`MemoryExchange::next_request`] replays them into a follow-up
/// request the way a browser would.
#[derive(Debug, Clone, Default)]
pub struct MemoryExchange {
    pub path: String,
    pub token_name: Option<String>,
    pub cookies: HashMap<String, String>,
    pub written: Vec<SetCookie>,
}

impl MemoryExchange {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_token_name(mut self, name: impl Into<String>) -> Self {
        self.token_name = Some(name.into());
        self
    }

    /// Most recent cookie written under `name`
    pub fn last_written(&self, name: &str) -> Option<&SetCookie> {
        self.written.iter().rev().find(|c| c.name == name)
    }

    /// Build the next request on `path`, carrying this exchange's cookies
    /// updated by whatever was written. Removal cookies delete the entry.
    pub fn next_request(&self, path: impl Into<String>) -> Self {
        let mut cookies = self.cookies.clone();
        for cookie in &self.written {
            if cookie.is_removal() {
                cookies.remove(&cookie.name);
            } else {
                cookies.insert(cookie.name.clone(), cookie.value.clone());
            }
        }

        Self {
            path: path.into(),
            token_name: self.token_name.clone(),
            cookies,
            written: Vec::new(),
        }
    }
}

impl TokenTransport for MemoryExchange {
    fn path(&self) -> &str {
        &self.path
    }

    fn token_name_override(&self) -> Option<&str> {
        self.token_name.as_deref()
    }

    fn read_cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    fn write_set_cookie(&mut self, cookie: SetCookie) {
        self.written.push(cookie);
    }
}
