use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::store::CredentialStore;
use crate::types::CredentialPair;

/// Build a credential cookie: not script-readable, root path scope.
pub(super) fn credential_cookie(name: &str, value: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), value.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .build()
}

/// Removal cookie for a credential.
pub(super) fn clear_credential_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

/// Remove both credentials from the jar in one step.
pub(super) fn clear_credentials(
    jar: CookieJar,
    access_name: &str,
    refresh_name: &str,
) -> CookieJar {
    jar.add(clear_credential_cookie(access_name))
        .add(clear_credential_cookie(refresh_name))
}

/// [`CredentialStore`] over a request's cookie jar.
///
/// Reads come from the inbound jar, so they reflect the request's actual
/// state even when a concurrent request rotated the pair. `store_pair`
/// stages both cookies in the jar together; applying the jar to the
/// response commits them as one unit.
pub struct CookieCredentials {
    jar: CookieJar,
    access_name: String,
    refresh_name: String,
    secure: bool,
}

impl CookieCredentials {
    #[must_use]
    pub fn new(
        jar: CookieJar,
        access_name: impl Into<String>,
        refresh_name: impl Into<String>,
        secure: bool,
    ) -> Self {
        Self {
            jar,
            access_name: access_name.into(),
            refresh_name: refresh_name.into(),
            secure,
        }
    }

    /// Consume the store, yielding the jar to attach to the response.
    #[must_use]
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn take_jar(&mut self) -> CookieJar {
        std::mem::take(&mut self.jar)
    }
}

impl CredentialStore for CookieCredentials {
    fn access_credential(&self) -> Option<String> {
        self.jar
            .get(&self.access_name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    fn refresh_credential(&self) -> Option<String> {
        self.jar
            .get(&self.refresh_name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    fn store_pair(&mut self, pair: &CredentialPair) {
        let jar = self.take_jar();
        self.jar = jar
            .add(credential_cookie(&self.access_name, &pair.access_token, self.secure))
            .add(credential_cookie(&self.refresh_name, &pair.refresh_token, self.secure));
    }

    fn clear(&mut self) {
        let jar = self.take_jar();
        self.jar = clear_credentials(jar, &self.access_name, &self.refresh_name);
    }
}
