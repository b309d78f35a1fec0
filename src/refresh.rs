//! Multi-origin refresh exchange.
//!
//! Walks the candidate origin list from [`resolve_origins`] in order and
//! posts to our own refresh endpoint at each until one answers with a pair.
//! A non-success response or transport error means "try the next origin".
//! One pass, no backoff: this runs inside a user-facing request, so the
//! worst case is bounded by `origins.len()` single calls.
//!
//! [`resolve_origins`]: crate::origin::resolve_origins

use reqwest::header;

use crate::origin::Origin;
use crate::types::CredentialPair;

/// All candidate origins were exhausted without obtaining a pair.
///
/// Carries the last observed status and detail for diagnostics; the caller
/// treats this as terminal for the current request and falls back to login.
#[derive(Debug, thiserror::Error)]
#[error("refresh failed after {attempts} origin(s) (last status {last_status:?}): {detail}")]
pub struct RefreshError {
    pub attempts: usize,
    pub last_status: Option<u16>,
    pub detail: String,
}

/// Client for the application's own refresh endpoint.
pub struct RefreshClient {
    http: reqwest::Client,
    refresh_path: String,
    cookie_name: String,
}

impl RefreshClient {
    /// Create a client posting to `refresh_path` with the refresh token in
    /// the `cookie_name` cookie — the same carrier the endpoint reads for
    /// browser-initiated refreshes.
    #[must_use]
    pub fn new(refresh_path: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            refresh_path: refresh_path.into(),
            cookie_name: cookie_name.into(),
        }
    }

    /// Use a custom HTTP client (for timeouts or connection pool reuse).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Trade `refresh_credential` for a new pair, trying `origins` in order
    /// and short-circuiting on the first success.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError`] once every origin has failed.
    pub async fn refresh(
        &self,
        refresh_credential: &str,
        origins: &[Origin],
    ) -> Result<CredentialPair, RefreshError> {
        let mut last_status = None;
        let mut detail = String::from("no candidate origins");

        for origin in origins {
            let url = match origin.join(&self.refresh_path) {
                Ok(url) => url,
                Err(e) => {
                    detail = format!("{origin}: {e}");
                    continue;
                }
            };

            let result = self
                .http
                .post(url)
                .header(
                    header::COOKIE,
                    format!("{}={refresh_credential}", self.cookie_name),
                )
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    match response.json::<CredentialPair>().await {
                        Ok(pair) => {
                            tracing::debug!(%origin, "credential refresh succeeded");
                            return Ok(pair);
                        }
                        Err(e) => {
                            detail = format!("{origin}: malformed credential pair: {e}");
                            tracing::debug!(%origin, error = %e, "refresh response unparseable");
                        }
                    }
                }
                Ok(response) => {
                    last_status = Some(response.status().as_u16());
                    detail = format!("{origin}: status {}", response.status());
                    tracing::debug!(%origin, status = %response.status(), "refresh attempt failed");
                }
                Err(e) => {
                    detail = format!("{origin}: {e}");
                    tracing::debug!(%origin, error = %e, "refresh attempt unreachable");
                }
            }
        }

        Err(RefreshError {
            attempts: origins.len(),
            last_status,
            detail,
        })
    }
}
