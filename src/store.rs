//! Credential storage boundary.
//!
//! Every read reflects the current request's actual cookie state — there is
//! no cached session object anywhere, since a concurrent request from the
//! same browser can rotate the pair mid-session.

use crate::types::CredentialPair;

/// Scoped access to the two credential cookies.
///
/// `store_pair` must write both members together; a partial rotation
/// (access without refresh, or vice versa) is a correctness bug. The cookie
/// implementation lives in [`middleware::cookies`](crate::middleware); an
/// in-memory implementation is trivial for tests.
pub trait CredentialStore {
    /// Access token from the request's credential carrier, if any.
    fn access_credential(&self) -> Option<String>;

    /// Refresh token from the request's credential carrier, if any.
    fn refresh_credential(&self) -> Option<String>;

    /// Replace both credentials atomically with a freshly issued pair.
    fn store_pair(&mut self, pair: &CredentialPair);

    /// Remove both credentials (logout, terminal refresh failure).
    fn clear(&mut self);
}

/// Plain in-memory store, used in tests and non-HTTP callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    access: Option<String>,
    refresh: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(access: Option<String>, refresh: Option<String>) -> Self {
        Self { access, refresh }
    }
}

impl CredentialStore for MemoryStore {
    fn access_credential(&self) -> Option<String> {
        self.access.clone()
    }

    fn refresh_credential(&self) -> Option<String> {
        self.refresh.clone()
    }

    fn store_pair(&mut self, pair: &CredentialPair) {
        self.access = Some(pair.access_token.clone());
        self.refresh = Some(pair.refresh_token.clone());
    }

    fn clear(&mut self) {
        self.access = None;
        self.refresh = None;
    }
}
