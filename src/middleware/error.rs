use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors surfaced by the middleware layer.
///
/// The gatekeeper itself never returns one of these — every branch there
/// resolves to an allow or redirect decision.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable access credential on the request.
    #[error("not authenticated")]
    Unauthenticated,

    /// The identity provider failed or rejected an exchange.
    #[error("identity provider error: {0}")]
    Provider(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            Self::Provider(_) => {
                tracing::warn!(error = %self, "provider exchange failed");
                (StatusCode::BAD_GATEWAY, "Identity provider unavailable").into_response()
            }
            Self::Config(_) => {
                tracing::error!(error = %self, "auth configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<crate::error::Error> for AuthError {
    fn from(e: crate::error::Error) -> Self {
        Self::Provider(e.to_string())
    }
}
