//! Tollgate Core - cookie-carried dual-token sessions
//!
//! Issues a signed session token on login, validates it on every request,
//! renews it while its refresh window is open, and revokes it on logout.
//! Token lifetimes are resolved per application identifier, so one
//! deployment can serve several client applications.
//!
//! Nothing is stored server-side. The HTTP side plugs in through
//! [`TokenTransport`]; see the `tollgate-axum` crate.

pub mod claim;
pub mod clock;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod lifecycle;
pub mod policy;
pub mod refresh;
pub mod transport;

pub use claim::{SessionClaim, UserData};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{CodecError, HmacCodec, TokenCodec};
pub use config::{TollgateConfig, DEFAULT_COOKIE_LIFETIME};
pub use crypto::{constant_time_eq, HmacKey, HmacKeyError};
pub use error::{ConfigError, DenyReason, SessionError};
pub use lifecycle::{Decision, SessionLifecycle};
pub use policy::{
    AppPolicy, ExemptPaths, PolicyResolver, PolicySet, DEFAULT_ACCESS_TOKEN_TTL,
    DEFAULT_REFRESH_TOKEN_TTL,
};
pub use refresh::{AllowAll, AuthorizerSlot, RefreshAuthorizer};
pub use transport::{
    MemoryExchange, SetCookie, TokenTransport, DEFAULT_TOKEN_NAME, TOKEN_NAME_OVERRIDE,
};
