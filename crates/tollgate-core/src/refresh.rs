//! Refresh authorization hook.
//!
//! One predicate is active at a time. Installing a new one replaces the old
//! atomically and applies to every validation that starts afterwards.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::claim::SessionClaim;

/// Business rule deciding whether an expired access window may be renewed.
pub trait RefreshAuthorizer: Send + Sync {
    fn can_refresh(&self, claim: &SessionClaim) -> bool;
}

impl<F> RefreshAuthorizer for F
where
    F: Fn(&SessionClaim) -> bool + Send + Sync,
{
    fn can_refresh(&self, claim: &SessionClaim) -> bool {
        self(claim)
    }
}

/// Approves every refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RefreshAuthorizer for AllowAll {
    fn can_refresh(&self, _claim: &SessionClaim) -> bool {
        true
    }
}

type Installed = Box<dyn RefreshAuthorizer>;

/// Single swappable slot holding the active authorizer.
pub struct AuthorizerSlot {
    current: ArcSwap<Installed>,
}

impl Default for AuthorizerSlot {
    fn default() -> Self {
        Self::new(AllowAll)
    }
}

impl AuthorizerSlot {
    pub fn new(authorizer: impl RefreshAuthorizer + 'static) -> Self {
        Self {
            current: ArcSwap::from_pointee(Box::new(authorizer) as Installed),
        }
    }

    /// Replace the active authorizer.
    pub fn install(&self, authorizer: impl RefreshAuthorizer + 'static) {
        self.current.store(Arc::new(Box::new(authorizer)));
    }

    /// Restore the default (approve everything).
    pub fn reset(&self) {
        self.install(AllowAll);
    }

    pub fn can_refresh(&self, claim: &SessionClaim) -> bool {
        self.current.load().can_refresh(claim)
    }
}

impl std::fmt::Debug for AuthorizerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizerSlot").finish_non_exhaustive()
    }
}
