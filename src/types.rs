use serde::{Deserialize, Serialize};

/// Access + refresh token pair issued by the auth API.
///
/// This is the atomic unit of the credential lifecycle: login and refresh
/// both produce a full pair, and the cookie store only ever writes a full
/// pair. Field names match the provider's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct CredentialPair {
    /// Short-lived bearer token for the lookup API.
    pub access_token: String,
    /// Long-lived secret; only ever sent to the refresh endpoint.
    pub refresh_token: String,
}

impl CredentialPair {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Per-request session classification.
///
/// Derived from the request path and the two credential cookies on every
/// request; never stored anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Path is exempt from gatekeeping (login, refresh, health, assets).
    Public,
    /// Access token present and not provably expired.
    Authenticated,
    /// Access token expired or missing, but a refresh token is available.
    ExpiredRecoverable,
    /// Access token present but expired, and no refresh token to recover with.
    ExpiredTerminal,
    /// Neither credential present.
    Anonymous,
}

/// A figure of speech as returned by the lookup API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Idiom {
    pub idiom: String,
    pub definition: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub example: Option<String>,
}
