//! Bounded refresh-and-retry around lookup calls.
//!
//! Once a request is past the gatekeeper its access token can still expire
//! mid-flight, or have been rotated by a concurrent request. The wrapper
//! here recovers from exactly one authorization failure per call: refresh,
//! persist the new pair, retry the original call once. A second failure is
//! surfaced to the caller — never swallowed into an empty result, and never
//! retried again, so a permanently invalid credential cannot loop.

use std::future::Future;

use crate::lookup::{IdiomClient, LookupError};
use crate::origin::Origin;
use crate::refresh::{RefreshClient, RefreshError};
use crate::store::CredentialStore;
use crate::types::{CredentialPair, Idiom};

/// Seam over the lookup API, so retry logic is testable without sockets.
pub trait LookupApi: Send + Sync {
    fn search(
        &self,
        phrase: &str,
        limit: u32,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<Idiom>, LookupError>> + Send;

    fn random(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Option<Idiom>, LookupError>> + Send;

    fn by_letter(
        &self,
        letter: char,
        limit: u32,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<Idiom>, LookupError>> + Send;

    fn by_synonym(
        &self,
        synonym: &str,
        limit: u32,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<Idiom>, LookupError>> + Send;
}

impl LookupApi for IdiomClient {
    fn search(
        &self,
        phrase: &str,
        limit: u32,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<Idiom>, LookupError>> + Send {
        IdiomClient::search(self, phrase, limit, access_token)
    }

    fn random(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Option<Idiom>, LookupError>> + Send {
        IdiomClient::random(self, access_token)
    }

    fn by_letter(
        &self,
        letter: char,
        limit: u32,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<Idiom>, LookupError>> + Send {
        IdiomClient::by_letter(self, letter, limit, access_token)
    }

    fn by_synonym(
        &self,
        synonym: &str,
        limit: u32,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<Idiom>, LookupError>> + Send {
        IdiomClient::by_synonym(self, synonym, limit, access_token)
    }
}

impl<T: LookupApi> LookupApi for &T {
    fn search(
        &self,
        phrase: &str,
        limit: u32,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<Idiom>, LookupError>> + Send {
        (**self).search(phrase, limit, access_token)
    }

    fn random(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Option<Idiom>, LookupError>> + Send {
        (**self).random(access_token)
    }

    fn by_letter(
        &self,
        letter: char,
        limit: u32,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<Idiom>, LookupError>> + Send {
        (**self).by_letter(letter, limit, access_token)
    }

    fn by_synonym(
        &self,
        synonym: &str,
        limit: u32,
        access_token: &str,
    ) -> impl Future<Output = Result<Vec<Idiom>, LookupError>> + Send {
        (**self).by_synonym(synonym, limit, access_token)
    }
}

/// Seam over the multi-origin refresh exchange.
pub trait TokenRefresher: Send + Sync {
    fn refresh(
        &self,
        refresh_credential: &str,
        origins: &[Origin],
    ) -> impl Future<Output = Result<CredentialPair, RefreshError>> + Send;
}

impl TokenRefresher for RefreshClient {
    fn refresh(
        &self,
        refresh_credential: &str,
        origins: &[Origin],
    ) -> impl Future<Output = Result<CredentialPair, RefreshError>> + Send {
        RefreshClient::refresh(self, refresh_credential, origins)
    }
}

impl<T: TokenRefresher> TokenRefresher for &T {
    fn refresh(
        &self,
        refresh_credential: &str,
        origins: &[Origin],
    ) -> impl Future<Output = Result<CredentialPair, RefreshError>> + Send {
        (**self).refresh(refresh_credential, origins)
    }
}

/// Lookup client that transparently rotates an expired pair, once.
pub struct AuthorizedClient<L, R> {
    lookup: L,
    refresher: R,
}

impl<L: LookupApi, R: TokenRefresher> AuthorizedClient<L, R> {
    #[must_use]
    pub fn new(lookup: L, refresher: R) -> Self {
        Self { lookup, refresher }
    }

    /// Search with the stored access token, recovering once on 401.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] when the retried call fails, the refresh
    /// itself fails, or no refresh token is available.
    pub async fn search<S: CredentialStore>(
        &self,
        store: &mut S,
        origins: &[Origin],
        phrase: &str,
        limit: u32,
    ) -> Result<Vec<Idiom>, LookupError> {
        let first = match store.access_credential() {
            Some(access) => self.lookup.search(phrase, limit, &access).await,
            // No access token at all behaves like an immediate 401.
            None => Err(LookupError::Unauthorized),
        };

        match first {
            Err(LookupError::Unauthorized) => {
                let pair = self.recover(store, origins).await?;
                self.lookup.search(phrase, limit, &pair.access_token).await
            }
            other => other,
        }
    }

    /// Fetch a random idiom, recovering once on 401.
    ///
    /// # Errors
    ///
    /// Same policy as [`search`](Self::search).
    pub async fn random<S: CredentialStore>(
        &self,
        store: &mut S,
        origins: &[Origin],
    ) -> Result<Option<Idiom>, LookupError> {
        let first = match store.access_credential() {
            Some(access) => self.lookup.random(&access).await,
            None => Err(LookupError::Unauthorized),
        };

        match first {
            Err(LookupError::Unauthorized) => {
                let pair = self.recover(store, origins).await?;
                self.lookup.random(&pair.access_token).await
            }
            other => other,
        }
    }

    /// Letter lookup, recovering once on 401.
    ///
    /// # Errors
    ///
    /// Same policy as [`search`](Self::search).
    pub async fn by_letter<S: CredentialStore>(
        &self,
        store: &mut S,
        origins: &[Origin],
        letter: char,
        limit: u32,
    ) -> Result<Vec<Idiom>, LookupError> {
        let first = match store.access_credential() {
            Some(access) => self.lookup.by_letter(letter, limit, &access).await,
            None => Err(LookupError::Unauthorized),
        };

        match first {
            Err(LookupError::Unauthorized) => {
                let pair = self.recover(store, origins).await?;
                self.lookup.by_letter(letter, limit, &pair.access_token).await
            }
            other => other,
        }
    }

    /// Synonym lookup, recovering once on 401.
    ///
    /// # Errors
    ///
    /// Same policy as [`search`](Self::search).
    pub async fn by_synonym<S: CredentialStore>(
        &self,
        store: &mut S,
        origins: &[Origin],
        synonym: &str,
        limit: u32,
    ) -> Result<Vec<Idiom>, LookupError> {
        let first = match store.access_credential() {
            Some(access) => self.lookup.by_synonym(synonym, limit, &access).await,
            None => Err(LookupError::Unauthorized),
        };

        match first {
            Err(LookupError::Unauthorized) => {
                let pair = self.recover(store, origins).await?;
                self.lookup.by_synonym(synonym, limit, &pair.access_token).await
            }
            other => other,
        }
    }

    /// One refresh attempt: exchange the stored refresh token and persist
    /// the new pair before the retry, so a retry that is later abandoned
    /// still leaves the rotated pair committed.
    async fn recover<S: CredentialStore>(
        &self,
        store: &mut S,
        origins: &[Origin],
    ) -> Result<CredentialPair, LookupError> {
        let refresh_credential = store
            .refresh_credential()
            .ok_or(LookupError::Unauthorized)?;

        let pair = self.refresher.refresh(&refresh_credential, origins).await?;
        store.store_pair(&pair);
        tracing::debug!("access token rotated after authorization failure");
        Ok(pair)
    }
}
