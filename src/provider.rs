//! Identity-provider client.
//!
//! The provider is an external collaborator: it validates passwords and
//! refresh tokens and mints [`CredentialPair`]s. This crate never sees the
//! signing key; it only carries the pair between the provider and the
//! browser's cookies.

use std::future::Future;

use url::Url;

use crate::error::Error;
use crate::types::CredentialPair;

/// Seam for the identity-provider exchange.
///
/// The auth routes are generic over this so tests can substitute a scripted
/// issuer; production uses [`AuthClient`].
pub trait CredentialIssuer: Send + Sync + 'static {
    /// Trade a username/password for a fresh pair.
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<CredentialPair, Error>> + Send;

    /// Trade a refresh token for a fresh pair.
    ///
    /// The provider invalidates the presented refresh token on use, so a
    /// success here makes the old pair worthless.
    fn refresh(
        &self,
        refresh_credential: &str,
    ) -> impl Future<Output = Result<CredentialPair, Error>> + Send;
}

/// HTTP client for the auth API's `/auth/login` and `/auth/refresh`.
pub struct AuthClient {
    base_url: Url,
    http: reqwest::Client,
}

#[derive(serde::Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl AuthClient {
    /// Create a client against the auth API base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(|e| Error::Provider {
            operation: "endpoint resolution",
            status: None,
            detail: e.to_string(),
        })
    }

    /// Checks HTTP response status; returns the response on success or an
    /// error carrying status + body for diagnostics.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        Err(Error::Provider {
            operation,
            status: Some(status),
            detail,
        })
    }
}

impl CredentialIssuer for AuthClient {
    async fn login(&self, username: &str, password: &str) -> Result<CredentialPair, Error> {
        let response = self
            .http
            .post(self.endpoint("/auth/login")?)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let response = Self::ensure_success(response, "login").await?;
        response.json::<CredentialPair>().await.map_err(Into::into)
    }

    async fn refresh(&self, refresh_credential: &str) -> Result<CredentialPair, Error> {
        // The provider takes the refresh token as a query parameter.
        let mut url = self.endpoint("/auth/refresh")?;
        url.query_pairs_mut()
            .append_pair("refresh_token", refresh_credential);

        let response = self.http.post(url).send().await?;

        let response = Self::ensure_success(response, "refresh").await?;
        response.json::<CredentialPair>().await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolution_ignores_base_path() {
        let client = AuthClient::new("http://api:8000".parse().unwrap());
        assert_eq!(
            client.endpoint("/auth/login").unwrap().as_str(),
            "http://api:8000/auth/login"
        );
    }
}
