use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use super::error::AuthError;
use super::gate::SessionGate;

/// Credentials read from the request's cookie jar.
///
/// Reads the inbound carrier directly on every request — never a cached
/// value, since a concurrent request may have rotated the pair. The
/// extractor itself cannot fail; handlers that need a bearer token call
/// [`require_access`](Credentials::require_access).
///
/// # Example
///
/// ```rust,ignore
/// async fn search(credentials: Credentials) -> impl IntoResponse {
///     let token = credentials.require_access()?;
///     // call the lookup API with `token`
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Access token, if the cookie is present and non-empty.
    pub access: Option<String>,
    /// Refresh token, if the cookie is present and non-empty.
    pub refresh: Option<String>,
}

impl Credentials {
    /// Access token or `401`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] when no access token is set.
    pub fn require_access(&self) -> Result<&str, AuthError> {
        self.access.as_deref().ok_or(AuthError::Unauthenticated)
    }
}

impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
    SessionGate: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = SessionGate::from_ref(state);
        let jar = match CookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(infallible) => match infallible {},
        };

        let read = |name: &str| {
            jar.get(name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            access: read(gate.access_cookie()),
            refresh: read(gate.refresh_cookie()),
        })
    }
}
