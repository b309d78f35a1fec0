//! Per-request session gatekeeper.
//!
//! Runs before any protected handler. Classification is a pure function of
//! the request path, the two credential cookies and the clock; nothing is
//! cached between requests, so concurrent requests from the same browser
//! each see their own cookie state.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use time::OffsetDateTime;

use crate::codec;
use crate::types::SessionState;

pub(super) struct GateSettings {
    pub(super) public_prefixes: Vec<String>,
    pub(super) access_cookie: String,
    pub(super) refresh_cookie: String,
    pub(super) refresh_path: String,
    pub(super) login_path: String,
}

/// Gatekeeper state for [`session_gate`], built by
/// [`SessionConfig::gate`](super::SessionConfig::gate).
#[derive(Clone)]
pub struct SessionGate {
    inner: Arc<GateSettings>,
}

impl SessionGate {
    pub(super) fn new(settings: GateSettings) -> Self {
        Self {
            inner: Arc::new(settings),
        }
    }

    pub(super) fn access_cookie(&self) -> &str {
        &self.inner.access_cookie
    }

    pub(super) fn refresh_cookie(&self) -> &str {
        &self.inner.refresh_cookie
    }
}

/// Classify a request from its path and credential state.
///
/// - public-prefix paths short-circuit to [`SessionState::Public`];
/// - a missing access token counts as expired;
/// - a *present but undecodable* access token counts as not expired — the
///   decision is deferred to the lookup API's own 401;
/// - a decoded expiry at or before `now` counts as expired.
#[must_use]
pub fn classify(
    public_prefixes: &[String],
    path: &str,
    now: i64,
    access: Option<&str>,
    has_refresh: bool,
) -> SessionState {
    if public_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
        return SessionState::Public;
    }

    let expiry = access.and_then(codec::decode_expiry);
    let expired = match expiry {
        Some(exp) => exp <= now,
        None => access.is_none(),
    };

    match (expired, has_refresh) {
        (false, _) => SessionState::Authenticated,
        (true, true) => SessionState::ExpiredRecoverable,
        (true, false) if access.is_some() => SessionState::ExpiredTerminal,
        (true, false) => SessionState::Anonymous,
    }
}

/// Refresh redirect target carrying the original path+query, so the flow
/// resumes where it was interrupted once the pair is rotated.
fn refresh_redirect(refresh_path: &str, path: &str, query: Option<&str>) -> String {
    let original = match query {
        Some(q) => format!("{path}?{q}"),
        None => path.to_string(),
    };
    format!("{refresh_path}?next={}", urlencoding::encode(&original))
}

/// Session gatekeeper middleware, for
/// `axum::middleware::from_fn_with_state(config.gate(), session_gate)`.
///
/// Never produces an error response: every request is either passed
/// through, redirected to the refresh endpoint, or redirected to login
/// (query stripped). The refresh endpoint and login page are always in the
/// public set, so neither redirect can loop.
pub async fn session_gate(
    State(gate): State<SessionGate>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let query = request.uri().query().map(str::to_owned);

    let access = jar
        .get(&gate.inner.access_cookie)
        .map(|c| c.value().to_owned());
    let has_refresh = jar.get(&gate.inner.refresh_cookie).is_some();
    let now = OffsetDateTime::now_utc().unix_timestamp();

    match classify(
        &gate.inner.public_prefixes,
        &path,
        now,
        access.as_deref(),
        has_refresh,
    ) {
        SessionState::Public | SessionState::Authenticated => next.run(request).await,
        SessionState::ExpiredRecoverable => {
            let target = refresh_redirect(&gate.inner.refresh_path, &path, query.as_deref());
            tracing::debug!(%path, "access token expired, redirecting to refresh");
            Redirect::to(&target).into_response()
        }
        SessionState::ExpiredTerminal | SessionState::Anonymous => {
            tracing::debug!(%path, "no recoverable session, redirecting to login");
            Redirect::to(&gate.inner.login_path).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn publics() -> Vec<String> {
        vec!["/api/auth".into(), "/login".into(), "/healthz".into()]
    }

    fn token_with_exp(exp: i64) -> String {
        format!(
            "h.{}.s",
            URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#))
        )
    }

    #[test]
    fn test_public_paths_bypass_credential_checks() {
        for path in ["/login", "/api/auth/refresh", "/healthz"] {
            assert_eq!(
                classify(&publics(), path, NOW, None, false),
                SessionState::Public,
                "{path} should be public"
            );
        }
        // Public even with a rotten token present.
        let stale = token_with_exp(NOW - 100);
        assert_eq!(
            classify(&publics(), "/login", NOW, Some(&stale), false),
            SessionState::Public
        );
    }

    #[test]
    fn test_future_expiry_is_authenticated() {
        let token = token_with_exp(NOW + 600);
        assert_eq!(
            classify(&publics(), "/", NOW, Some(&token), true),
            SessionState::Authenticated
        );
        assert_eq!(
            classify(&publics(), "/", NOW, Some(&token), false),
            SessionState::Authenticated
        );
    }

    #[test]
    fn test_expiry_at_now_counts_as_expired() {
        let token = token_with_exp(NOW);
        assert_eq!(
            classify(&publics(), "/", NOW, Some(&token), true),
            SessionState::ExpiredRecoverable
        );
    }

    #[test]
    fn test_expired_without_refresh_is_terminal() {
        let token = token_with_exp(NOW - 1);
        assert_eq!(
            classify(&publics(), "/", NOW, Some(&token), false),
            SessionState::ExpiredTerminal
        );
    }

    #[test]
    fn test_no_credentials_is_anonymous() {
        assert_eq!(
            classify(&publics(), "/", NOW, None, false),
            SessionState::Anonymous
        );
    }

    #[test]
    fn test_missing_access_with_refresh_is_recoverable() {
        assert_eq!(
            classify(&publics(), "/", NOW, None, true),
            SessionState::ExpiredRecoverable
        );
    }

    #[test]
    fn test_undecodable_but_present_defers_to_api() {
        // Expiry unknown: let it through, the API's 401 is ground truth.
        assert_eq!(
            classify(&publics(), "/", NOW, Some("garbage"), false),
            SessionState::Authenticated
        );
    }

    #[test]
    fn test_refresh_redirect_carries_path_and_query() {
        assert_eq!(
            refresh_redirect("/api/auth/refresh", "/search", Some("q=thin+ice&limit=10")),
            "/api/auth/refresh?next=%2Fsearch%3Fq%3Dthin%2Bice%26limit%3D10"
        );
        assert_eq!(
            refresh_redirect("/api/auth/refresh", "/search", None),
            "/api/auth/refresh?next=%2Fsearch"
        );
    }
}
