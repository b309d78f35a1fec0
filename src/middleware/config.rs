use url::Url;

use super::error::AuthError;
use super::gate::{GateSettings, SessionGate};
use crate::origin::OriginConfig;

/// Shared session settings used by config, gate and route handlers.
#[derive(Clone)]
pub(crate) struct SessionSettings {
    pub(crate) api_url: Url,
    pub(crate) access_cookie: String,
    pub(crate) refresh_cookie: String,
    pub(crate) secure_cookies: bool,
    pub(crate) auth_path: String,
    pub(crate) login_path: String,
    pub(crate) login_redirect: String,
    pub(crate) extra_public_prefixes: Vec<String>,
    pub(crate) production: bool,
    pub(crate) internal_origin: Option<Url>,
    pub(crate) public_origin: Option<Url>,
}

impl SessionSettings {
    fn defaults(api_url: Url) -> Self {
        Self {
            api_url,
            access_cookie: "access_token".into(),
            refresh_cookie: "refresh_token".into(),
            secure_cookies: false,
            auth_path: "/api/auth".into(),
            login_path: "/login".into(),
            login_redirect: "/".into(),
            extra_public_prefixes: vec![
                "/healthz".into(),
                "/favicon.ico".into(),
                "/assets".into(),
            ],
            production: false,
            internal_origin: None,
            public_origin: None,
        }
    }

    pub(crate) fn refresh_path(&self) -> String {
        format!("{}/refresh", self.auth_path)
    }

    /// Full public allow-list. The auth path (refresh endpoint included) and
    /// the login page are composed in unconditionally: if either were
    /// gateable, every unauthenticated user would enter a redirect loop.
    pub(crate) fn public_prefixes(&self) -> Vec<String> {
        let mut prefixes = vec![self.auth_path.clone(), self.login_path.clone()];
        prefixes.extend(self.extra_public_prefixes.iter().cloned());
        prefixes
    }
}

/// Session lifecycle configuration.
///
/// Use [`from_env()`](SessionConfig::from_env) for convention-based setup,
/// or [`new()`](SessionConfig::new) with `with_*` methods for full control.
pub struct SessionConfig {
    pub(super) settings: SessionSettings,
}

impl SessionConfig {
    /// Create config against the auth/lookup API base URL.
    ///
    /// All optional fields use defaults. Override with `with_*` methods.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            settings: SessionSettings::defaults(api_url),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `IDIOM_API_URL`: base URL of the auth/lookup API
    ///
    /// # Optional env vars
    /// - `IDIOM_INTERNAL_ORIGIN`: cluster-internal origin for refresh calls
    /// - `IDIOM_PUBLIC_ORIGIN`: publicly configured application origin
    /// - `APP_ENV`: `"production"` enables secure cookies and drops the
    ///   local-development refresh origins
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if required env vars are missing or
    /// URLs do not parse.
    pub fn from_env() -> Result<Self, AuthError> {
        let api_url = required_url("IDIOM_API_URL")?;
        let internal_origin = optional_url("IDIOM_INTERNAL_ORIGIN")?;
        let public_origin = optional_url("IDIOM_PUBLIC_ORIGIN")?;

        let production = matches!(
            std::env::var("APP_ENV").as_deref(),
            Ok("production") | Ok("prod")
        );

        Ok(Self::new(api_url)
            .with_internal_origin(internal_origin)
            .with_public_origin(public_origin)
            .with_production(production)
            .with_secure_cookies(production))
    }

    /// Base URL of the auth/lookup API.
    #[must_use]
    pub fn api_url(&self) -> &Url {
        &self.settings.api_url
    }

    /// Path of the crate's own refresh endpoint (`{auth_path}/refresh`).
    #[must_use]
    pub fn refresh_path(&self) -> String {
        self.settings.refresh_path()
    }

    /// Gatekeeper state for `axum::middleware::from_fn_with_state`.
    #[must_use]
    pub fn gate(&self) -> SessionGate {
        SessionGate::new(GateSettings {
            public_prefixes: self.settings.public_prefixes(),
            access_cookie: self.settings.access_cookie.clone(),
            refresh_cookie: self.settings.refresh_cookie.clone(),
            refresh_path: self.settings.refresh_path(),
            login_path: self.settings.login_path.clone(),
        })
    }

    /// Origin resolution inputs for the refresh client.
    #[must_use]
    pub fn origin_config(&self) -> OriginConfig {
        OriginConfig {
            internal_origin: self.settings.internal_origin.clone(),
            public_origin: self.settings.public_origin.clone(),
            production: self.settings.production,
        }
    }

    #[must_use]
    pub fn with_access_cookie(mut self, name: impl Into<String>) -> Self {
        self.settings.access_cookie = name.into();
        self
    }

    #[must_use]
    pub fn with_refresh_cookie(mut self, name: impl Into<String>) -> Self {
        self.settings.refresh_cookie = name.into();
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.settings.auth_path = path.into();
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.settings.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_login_redirect(mut self, path: impl Into<String>) -> Self {
        self.settings.login_redirect = path.into();
        self
    }

    /// Add a path prefix to the public allow-list (health checks, assets).
    /// The auth path and login page are always public regardless.
    #[must_use]
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.settings.extra_public_prefixes.push(prefix.into());
        self
    }

    #[must_use]
    pub fn with_production(mut self, production: bool) -> Self {
        self.settings.production = production;
        self
    }

    #[must_use]
    pub fn with_internal_origin(mut self, origin: Option<Url>) -> Self {
        self.settings.internal_origin = origin;
        self
    }

    #[must_use]
    pub fn with_public_origin(mut self, origin: Option<Url>) -> Self {
        self.settings.public_origin = origin;
        self
    }
}

fn required_url(var: &'static str) -> Result<Url, AuthError> {
    let value =
        std::env::var(var).map_err(|_| AuthError::Config(format!("{var} is required")))?;
    value
        .parse()
        .map_err(|e| AuthError::Config(format!("{var}: {e}")))
}

fn optional_url(var: &'static str) -> Result<Option<Url>, AuthError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e| AuthError::Config(format!("{var}: {e}"))),
        Err(_) => Ok(None),
    }
}
