//! Common test utilities for tollgate-core integration tests

use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tollgate_core::{
    AppPolicy, ExemptPaths, ManualClock, MemoryExchange, SessionClaim, SessionLifecycle,
    SetCookie, TokenCodec, TokenTransport, TollgateConfig,
};

pub const SECRET: &str = "test-secret-test-secret-test-secret";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

/// Lifecycle wired to a manual clock starting at [`t0`].
pub struct Harness {
    pub lifecycle: SessionLifecycle,
    pub clock: Arc<ManualClock>,
}

#[allow(dead_code)]
impl Harness {
    pub fn new(access_ms: u64, refresh_ms: u64) -> Self {
        Self::with_config(
            TollgateConfig::new("tollgate-test", SECRET).with_default_policy(AppPolicy::new(
                Duration::from_millis(access_ms),
                Duration::from_millis(refresh_ms),
            )),
        )
    }

    pub fn with_config(config: TollgateConfig) -> Self {
        let clock = Arc::new(ManualClock::new(t0()));
        let lifecycle = SessionLifecycle::from_config(&config)
            .expect("test config is valid")
            .with_clock(clock.clone());
        Self { lifecycle, clock }
    }

    /// Issue at `t0` and return the exchange holding the new cookie.
    pub fn login(&self, app: &str, sub: &str, data: serde_json::Value) -> MemoryExchange {
        self.clock.set(t0());
        let mut exchange = MemoryExchange::new("/login");
        self.lifecycle
            .issue(&mut exchange, app, sub, data)
            .expect("issue succeeds");
        exchange
    }

    /// Move the clock to `t0 + offset_ms`.
    pub fn at(&self, offset_ms: i64) {
        self.clock.set_millis(t0().timestamp_millis() + offset_ms);
    }

    pub fn decode(&self, cookie: &SetCookie) -> SessionClaim {
        self.lifecycle
            .codec()
            .deserialize(&cookie.value)
            .expect("cookie decodes")
    }

    pub fn exempt(paths: &[&str]) -> Self {
        Self::with_config(
            TollgateConfig::new("tollgate-test", SECRET)
                .with_exempt_paths(ExemptPaths::new(paths.iter().copied())),
        )
    }
}

/// Transport that counts cookie reads.
#[allow(dead_code)]
pub struct CountingExchange {
    pub inner: MemoryExchange,
    pub reads: Cell<usize>,
}

#[allow(dead_code)]
impl CountingExchange {
    pub fn new(inner: MemoryExchange) -> Self {
        Self {
            inner,
            reads: Cell::new(0),
        }
    }
}

impl TokenTransport for CountingExchange {
    fn path(&self) -> &str {
        self.inner.path()
    }

    fn token_name_override(&self) -> Option<&str> {
        self.inner.token_name_override()
    }

    fn read_cookie(&self, name: &str) -> Option<&str> {
        self.reads.set(self.reads.get() + 1);
        self.inner.read_cookie(name)
    }

    fn write_set_cookie(&mut self, cookie: SetCookie) {
        self.inner.write_set_cookie(cookie);
    }
}
