//! Tower middleware layer for session validation.
//!
//! [`SessionLayer`] runs [`SessionLifecycle::validate`] before every request.
//! Denied requests get the uniform `401`; allowed requests carry a
//! [`SessionContext`] extension and any renewed cookie is appended to the
//! response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use pin_project_lite::pin_project;
use tollgate_core::{
    Decision, HmacCodec, PolicyResolver, PolicySet, SessionLifecycle, SetCookie, TokenCodec,
};
use tower::{Layer, Service};

use crate::context::SessionContext;
use crate::cookie::append_set_cookies;
use crate::error::Unauthenticated;
use crate::transport::HttpExchange;

/// Tower layer that validates the session cookie on each request.
pub struct SessionLayer<C = HmacCodec, P = PolicySet> {
    lifecycle: Arc<SessionLifecycle<C, P>>,
}

impl<C, P> SessionLayer<C, P> {
    #[must_use]
    pub fn new(lifecycle: Arc<SessionLifecycle<C, P>>) -> Self {
        Self { lifecycle }
    }
}

impl<C, P> Clone for SessionLayer<C, P> {
    fn clone(&self) -> Self {
        Self {
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }
}

impl<S, C, P> Layer<S> for SessionLayer<C, P> {
    type Service = SessionService<S, C, P>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionService {
            inner,
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }
}

/// The session validation service.
pub struct SessionService<S, C = HmacCodec, P = PolicySet> {
    inner: S,
    lifecycle: Arc<SessionLifecycle<C, P>>,
}

impl<S: Clone, C, P> Clone for SessionService<S, C, P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }
}

impl<S, C, P> Service<Request<Body>> for SessionService<S, C, P>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    C: TokenCodec,
    P: PolicyResolver,
{
    type Response = Response;
    type Error = S::Error;
    type Future = SessionFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let mut exchange = HttpExchange::from_request(&req);
        let decision = self.lifecycle.validate(&mut exchange);
        let set_cookies = exchange.into_set_cookies();

        let user_data = match decision {
            Decision::Allow(user_data) => user_data,
            Decision::Deny(_) => {
                let mut response = Unauthenticated.into_response();
                append_set_cookies(response.headers_mut(), &set_cookies);
                return SessionFuture {
                    state: State::Denied {
                        response: Some(response),
                    },
                };
            }
        };

        if let Some(user_data) = user_data {
            req.extensions_mut().insert(SessionContext(user_data));
        }

        // Only the instance poll_ready was driven on may be called.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        SessionFuture {
            state: State::Calling {
                future: inner.call(req),
                set_cookies,
            },
        }
    }
}

pin_project! {
    /// Future for [`SessionService`].
    pub struct SessionFuture<F> {
        #[pin]
        state: State<F>,
    }
}

pin_project! {
    #[project = StateProj]
    enum State<F> {
        Denied {
            response: Option<Response>,
        },
        Calling {
            #[pin]
            future: F,
            set_cookies: Vec<SetCookie>,
        },
    }
}

impl<F, E> Future for SessionFuture<F>
where
    F: Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().state.project() {
            StateProj::Denied { response } => match response.take() {
                Some(response) => Poll::Ready(Ok(response)),
                None => panic!("polled after completion"),
            },
            StateProj::Calling {
                future,
                set_cookies,
            } => {
                let mut response = ready!(future.poll(cx))?;
                append_set_cookies(response.headers_mut(), set_cookies);
                Poll::Ready(Ok(response))
            }
        }
    }
}
