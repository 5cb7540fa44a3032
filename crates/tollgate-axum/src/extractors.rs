//! Axum extractors for session data.
//!
//! These read the [`SessionContext`] attached by the
//! [`SessionLayer`](crate::SessionLayer).
//!
//! # Usage
//!
//! ```ignore
//! use tollgate_axum::{MaybeSession, RequireSession};
//!
//! // 401 if the request carries no validated session
//! async fn me(session: RequireSession) -> String {
//!     format!("Hello, {}!", session.user_id())
//! }
//!
//! // Exempt routes see `None`
//! async fn landing(session: MaybeSession) -> String {
//!     match session.0 {
//!         Some(ctx) => format!("Welcome back, {}!", ctx.user_id()),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use std::ops::Deref;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::SessionContext;
use crate::error::Unauthenticated;

/// Extractor that requires a validated session.
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionContext);

impl Deref for RequireSession {
    type Target = SessionContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .map(Self)
            .ok_or(Unauthenticated)
    }
}

/// Extractor for an optional session.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<SessionContext>);

impl Deref for MaybeSession {
    type Target = Option<SessionContext>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<SessionContext>().cloned()))
    }
}
