use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use super::config::SessionConfig;
use super::cookies::{self, CookieCredentials};
use super::state::AuthState;
use crate::provider::CredentialIssuer;
use crate::store::CredentialStore;

/// Create the session lifecycle router: login, refresh and logout under the
/// configured auth path.
pub fn auth_routes<P: CredentialIssuer>(config: SessionConfig, issuer: P) -> Router {
    let auth_path = config.settings.auth_path.clone();

    let state = AuthState {
        issuer: Arc::new(issuer),
        settings: config.settings,
    };

    Router::new()
        .route(&format!("{auth_path}/login"), post(login::<P>))
        .route(
            &format!("{auth_path}/refresh"),
            get(refresh::<P>).post(refresh::<P>),
        )
        .route(
            &format!("{auth_path}/logout"),
            get(logout::<P>).post(logout::<P>),
        )
        .with_state(state)
}

// ── Login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login<P: CredentialIssuer>(
    State(state): State<AuthState<P>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), Response> {
    let pair = state
        .issuer
        .login(&form.username, &form.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "login rejected");
            login_error(&state.settings.login_path, "invalid_credentials")
        })?;

    let mut store = CookieCredentials::new(
        jar,
        state.settings.access_cookie.clone(),
        state.settings.refresh_cookie.clone(),
        state.settings.secure_cookies,
    );
    store.store_pair(&pair);

    tracing::info!("login successful");
    Ok((store.into_jar(), Redirect::to(&state.settings.login_redirect)))
}

// ── Refresh ────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RefreshParams {
    next: Option<String>,
}

/// Trade the refresh cookie for a new pair.
///
/// With a `next` parameter (the gatekeeper's resumable redirect) the
/// response is a redirect: back into the app on success, to login on any
/// failure. Without one (programmatic callers) the response is JSON.
/// Both cookies are staged in a single jar, so the pair commits atomically
/// or not at all.
async fn refresh<P: CredentialIssuer>(
    State(state): State<AuthState<P>>,
    jar: CookieJar,
    Query(params): Query<RefreshParams>,
) -> Response {
    // Only same-origin absolute paths are resumable.
    let next = params
        .next
        .filter(|n| n.starts_with('/') && !n.starts_with("//"));

    let Some(credential) = jar
        .get(&state.settings.refresh_cookie)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
    else {
        return match next {
            Some(_) => Redirect::to(&state.settings.login_path).into_response(),
            None => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "missing refresh credential" })),
            )
                .into_response(),
        };
    };

    match state.issuer.refresh(&credential).await {
        Ok(pair) => {
            let mut store = CookieCredentials::new(
                jar,
                state.settings.access_cookie.clone(),
                state.settings.refresh_cookie.clone(),
                state.settings.secure_cookies,
            );
            store.store_pair(&pair);
            let jar = store.into_jar();

            tracing::debug!("credential pair rotated");
            match next {
                Some(n) => (jar, Redirect::to(&n)).into_response(),
                None => (jar, Json(pair)).into_response(),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "credential refresh rejected");
            // Terminal for this session: destroy what is left of the pair.
            let jar = cookies::clear_credentials(
                jar,
                &state.settings.access_cookie,
                &state.settings.refresh_cookie,
            );

            match next {
                Some(_) => (jar, Redirect::to(&state.settings.login_path)).into_response(),
                None => (
                    StatusCode::UNAUTHORIZED,
                    jar,
                    Json(json!({ "error": "refresh failed" })),
                )
                    .into_response(),
            }
        }
    }
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout<P: CredentialIssuer>(
    State(state): State<AuthState<P>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let jar = cookies::clear_credentials(
        jar,
        &state.settings.access_cookie,
        &state.settings.refresh_cookie,
    );
    (jar, Redirect::to(&state.settings.login_path))
}

// ── Helpers ────────────────────────────────────────────────────────

fn login_error(login_path: &str, code: &str) -> Response {
    let encoded = urlencoding::encode(code);
    Redirect::to(&format!("{login_path}?error={encoded}")).into_response()
}
