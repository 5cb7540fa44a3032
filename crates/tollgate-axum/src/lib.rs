//! Tollgate Axum Integration
//!
//! Axum middleware and extractors for cookie-carried Tollgate sessions.
//!
//! # Overview
//!
//! - **Middleware**: [`SessionLayer`] validates (and renews) the session
//!   cookie before every request and answers `401` on denial
//! - **Extractors**: [`RequireSession`], [`MaybeSession`]
//! - **Transport**: [`HttpExchange`] adapts request parts to
//!   [`tollgate_core::TokenTransport`] for login and logout handlers
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum::{Router, routing::get};
//! use tollgate_axum::{RequireSession, SessionLayer};
//! use tollgate_core::{SessionLifecycle, TollgateConfig};
//!
//! async fn me(session: RequireSession) -> String {
//!     format!("Hello, user {}!", session.user_id())
//! }
//!
//! let lifecycle = Arc::new(SessionLifecycle::from_config(&TollgateConfig::from_env()?)?);
//! let app = Router::new()
//!     .route("/api/me", get(me))
//!     .layer(SessionLayer::new(lifecycle));
//! ```

pub mod context;
pub mod cookie;
pub mod error;
pub mod extractors;
pub mod layer;
pub mod transport;

pub use context::SessionContext;
pub use cookie::{append_set_cookies, build_set_cookie, find_cookie, is_cookie_name};
pub use error::{Unauthenticated, NOT_AUTHENTICATED_MESSAGE};
pub use extractors::{MaybeSession, RequireSession};
pub use layer::{SessionFuture, SessionLayer, SessionService};
pub use transport::{HttpExchange, TOKEN_NAME_HEADER};
