//! Lookup-API client.
//!
//! Thin bearer-authenticated client for the idiom API. A 404 from the API
//! means "no matches", not a failure, and maps to an empty result; a 401
//! maps to [`LookupError::Unauthorized`] so the wrapper in
//! [`authorized`](crate::authorized) can attempt its single refresh.

use url::Url;

use crate::refresh::RefreshError;
use crate::types::Idiom;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LookupError {
    /// The API rejected the access token (401).
    #[error("access token rejected by lookup API")]
    Unauthorized,
    /// Any other non-success status.
    #[error("lookup API returned status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// Recovery refresh itself failed.
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

/// Bearer-authenticated client for the idiom endpoints.
pub struct IdiomClient {
    base_url: Url,
    http: reqwest::Client,
}

impl IdiomClient {
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

    /// Partial or complete match against the idiom text.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`]; no matches is `Ok(vec![])`, never an error.
    pub async fn search(
        &self,
        phrase: &str,
        limit: u32,
        access_token: &str,
    ) -> Result<Vec<Idiom>, LookupError> {
        let url = self.list_endpoint(&format!("/idioms/search/{}", urlencoding::encode(phrase)), limit)?;
        self.fetch_list(url, access_token).await
    }

    /// Idioms starting with a single letter, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`]; no matches is `Ok(vec![])`.
    pub async fn by_letter(
        &self,
        letter: char,
        limit: u32,
        access_token: &str,
    ) -> Result<Vec<Idiom>, LookupError> {
        let url = self.list_endpoint(&format!("/idioms/by-letter/{letter}"), limit)?;
        self.fetch_list(url, access_token).await
    }

    /// Idioms whose synonym list matches the given word or phrase.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`]; no matches is `Ok(vec![])`.
    pub async fn by_synonym(
        &self,
        synonym: &str,
        limit: u32,
        access_token: &str,
    ) -> Result<Vec<Idiom>, LookupError> {
        let url =
            self.list_endpoint(&format!("/idioms/by-synonym/{}", urlencoding::encode(synonym)), limit)?;
        self.fetch_list(url, access_token).await
    }

    /// A random idiom, or `None` if the collection is empty.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] for auth and transport failures.
    pub async fn random(&self, access_token: &str) -> Result<Option<Idiom>, LookupError> {
        let url = self.endpoint("/idioms/random")?;
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await?;

        match Self::classify_status(response).await? {
            Some(response) => Ok(Some(response.json::<Idiom>().await?)),
            None => Ok(None),
        }
    }

    async fn fetch_list(&self, url: Url, access_token: &str) -> Result<Vec<Idiom>, LookupError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await?;

        match Self::classify_status(response).await? {
            Some(response) => Ok(response.json::<Vec<Idiom>>().await?),
            None => Ok(Vec::new()),
        }
    }

    /// Maps the API's status conventions: 2xx passes through, 404 is an
    /// empty result (`None`), 401 and the rest are errors.
    async fn classify_status(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, LookupError> {
        let status = response.status();
        if status.is_success() {
            return Ok(Some(response));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LookupError::Unauthorized);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(LookupError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, LookupError> {
        Ok(self.base_url.join(path)?)
    }

    fn list_endpoint(&self, path: &str, limit: u32) -> Result<Url, LookupError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_endpoint_encodes_phrase() {
        let client = IdiomClient::new("http://api:8000".parse().unwrap());
        let url = client
            .list_endpoint(
                &format!("/idioms/search/{}", urlencoding::encode("thin ice")),
                10,
            )
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://api:8000/idioms/search/thin%20ice?limit=10"
        );
    }
}
