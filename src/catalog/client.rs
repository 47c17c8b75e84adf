//! Catalog fetcher.
//!
//! Sends one GraphQL query per call and normalizes the answer into
//! [`Record`]s. Every failure is caught here: [`Fetcher::fetch`] logs the
//! cause and returns an empty list.

use super::error::FetchError;
use super::query::{parse_posts, top_posts_query};
use crate::models::Record;
use reqwest::header::ACCEPT;
use serde_json::{json, Value};
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, error, info};

/// Product Hunt GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.producthunt.com/v2/api/graphql";

/// API token, validated non-blank. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validate a raw token supplied by the caller.
    pub fn resolve(raw: Option<&str>) -> Result<Self, FetchError> {
        match raw.map(str::trim) {
            None => Err(FetchError::Credential("no API token configured".to_string())),
            Some("") => Err(FetchError::Credential("API token is empty".to_string())),
            Some(token) => Ok(Self(token.to_string())),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Raw HTTP answer handed back by a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one authenticated JSON POST and waits for the answer.
pub trait Transport {
    fn post_json(
        &self,
        url: &str,
        credential: &Credential,
        body: &Value,
    ) -> Result<TransportResponse, FetchError>;
}

/// Blocking reqwest transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout_seconds`.
    pub fn new(timeout_seconds: u64) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("phtrends/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(
        &self,
        url: &str,
        credential: &Credential,
        body: &Value,
    ) -> Result<TransportResponse, FetchError> {
        // json() also sets Content-Type: application/json
        let response = self
            .client
            .post(url)
            .bearer_auth(credential.expose())
            .header(ACCEPT, "application/json")
            .json(body)
            .send()?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {}", e)))?;

        Ok(TransportResponse { status, body })
    }
}

/// Queries the catalog for its top-voted products.
pub struct Fetcher<T = HttpTransport> {
    transport: T,
    endpoint: String,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the top `limit` products, or an empty list on any failure.
    ///
    /// The failure kind and message go to the log, never to the caller.
    pub fn fetch(&self, limit: NonZeroU32, credential: Option<&str>) -> Vec<Record> {
        match self.try_fetch(limit, credential) {
            Ok(records) => {
                info!(
                    limit = limit.get(),
                    count = records.len(),
                    "Retrieved products"
                );
                records
            }
            Err(e) => {
                error!(
                    kind = e.kind(),
                    limit = limit.get(),
                    error = %e,
                    "Catalog fetch failed"
                );
                Vec::new()
            }
        }
    }

    /// Fetch the top `limit` products, reporting the failure cause.
    ///
    /// Fewer than `limit` records is not an error; the service decides how
    /// many it has.
    pub fn try_fetch(
        &self,
        limit: NonZeroU32,
        credential: Option<&str>,
    ) -> Result<Vec<Record>, FetchError> {
        let credential = Credential::resolve(credential)?;
        let payload = json!({ "query": top_posts_query(limit) });

        debug!(endpoint = %self.endpoint, limit = limit.get(), "Querying catalog API");

        let response = self
            .transport
            .post_json(&self.endpoint, &credential, &payload)?;

        if !response.is_success() {
            return Err(FetchError::status(response.status, &response.body));
        }

        parse_posts(&response.body)
    }
}
