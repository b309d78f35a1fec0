//! Candidate origin resolution for the refresh call.
//!
//! A request may have reached us through a reverse proxy, a service-mesh
//! hop, or direct local access; the programmatic refresh call has to reach
//! our own refresh endpoint regardless of which path served the original
//! request. The resolver therefore produces an *ordered* candidate list per
//! request, never a single hardcoded origin, and never caches across
//! requests since forwarding headers vary per request.

use http::HeaderMap;
use url::Url;

/// Local-development origins, appended only outside production.
const DEV_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

/// A scheme+host candidate for reaching the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin(Url);

impl Origin {
    /// Parse an origin from a `scheme://host` string.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` for strings that are not absolute URLs.
    pub fn parse(s: &str) -> Result<Self, url::ParseError> {
        Url::parse(s).map(Self)
    }

    /// Resolve a root-relative path against this origin.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the path does not join cleanly.
    pub fn join(&self, path: &str) -> Result<Url, url::ParseError> {
        self.0.join(path)
    }
}

impl From<Url> for Origin {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.origin().ascii_serialization())
    }
}

/// Environment-derived inputs to origin resolution.
#[derive(Debug, Clone, Default)]
pub struct OriginConfig {
    /// Service-mesh / cluster-internal origin, highest priority.
    pub internal_origin: Option<Url>,
    /// Publicly configured application origin.
    pub public_origin: Option<Url>,
    /// Suppresses the local-development fallback origins.
    pub production: bool,
}

/// Computes the ordered, deduplicated candidate origin list for a refresh
/// attempt, from highest to lowest priority:
///
/// 1. the configured internal service origin,
/// 2. the origin reconstructed from `x-forwarded-proto` / `x-forwarded-host`
///    (falling back to the plain `host` header),
/// 3. the configured public application origin,
/// 4. local development origins, outside production only.
#[must_use]
pub fn resolve_origins(headers: &HeaderMap, config: &OriginConfig) -> Vec<Origin> {
    let mut origins: Vec<Origin> = Vec::new();

    if let Some(internal) = &config.internal_origin {
        push_unique(&mut origins, Origin(internal.clone()));
    }

    if let Some(forwarded) = forwarded_origin(headers) {
        push_unique(&mut origins, forwarded);
    }

    if let Some(public) = &config.public_origin {
        push_unique(&mut origins, Origin(public.clone()));
    }

    if !config.production {
        for dev in DEV_ORIGINS {
            if let Ok(origin) = Origin::parse(dev) {
                push_unique(&mut origins, origin);
            }
        }
    }

    origins
}

/// Reconstructs the request's own origin from proxy forwarding headers.
fn forwarded_origin(headers: &HeaderMap) -> Option<Origin> {
    let host = header_value(headers, "x-forwarded-host")
        .or_else(|| header_value(headers, "host"))?;
    let proto = header_value(headers, "x-forwarded-proto").unwrap_or_else(|| "http".into());

    Origin::parse(&format!("{proto}://{host}")).ok()
}

/// First comma-separated value of a header, trimmed (proxies append).
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn push_unique(origins: &mut Vec<Origin>, origin: Origin) {
    if !origins.contains(&origin) {
        origins.push(origin);
    }
}
