use std::sync::Arc;

use super::config::SessionSettings;
use crate::provider::CredentialIssuer;

/// Shared state for the auth route handlers.
pub(super) struct AuthState<P> {
    pub(super) issuer: Arc<P>,
    pub(super) settings: SessionSettings,
}

// Manual Clone: avoid derive adding a `P: Clone` bound.
impl<P: CredentialIssuer> Clone for AuthState<P> {
    fn clone(&self) -> Self {
        Self {
            issuer: self.issuer.clone(),
            settings: self.settings.clone(),
        }
    }
}
