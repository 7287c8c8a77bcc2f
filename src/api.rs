// API client module: a small blocking HTTP client for the GitHub user keys
// endpoints. Every operation sends exactly one request authenticated with
// HTTP Basic auth and hands the raw response back to the caller.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::KeysError;
use crate::logging::Logger;

pub const API_URL: &str = "https://api.github.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Username and token sent as Basic auth on every request. Empty values are
/// sent as-is; the server answers 401.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub token: String,
}

/// Payload for `POST /user/keys`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyRecord {
    pub title: String,
    pub key: String,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: API_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Raw response: status plus body text, nothing interpreted yet.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Json(Value),
    /// Nothing to parse, e.g. `204 No Content` after a delete.
    Empty,
}

/// Response classified by status. Both arms carry the parsed body because
/// the API explains failures in JSON (`{"message": ...}`).
#[derive(Clone, Debug, PartialEq)]
pub enum ApiOutcome {
    Success { status: StatusCode, payload: Payload },
    Failure { status: StatusCode, payload: Payload },
}

impl ApiResponse {
    pub fn payload(&self) -> Result<Payload, KeysError> {
        if self.body.trim().is_empty() {
            return Ok(Payload::Empty);
        }
        serde_json::from_str(&self.body)
            .map(Payload::Json)
            .map_err(|source| KeysError::Parse {
                status: self.status,
                source,
            })
    }

    pub fn outcome(&self) -> Result<ApiOutcome, KeysError> {
        let status = self.status;
        let payload = self.payload()?;
        if status.is_success() {
            Ok(ApiOutcome::Success { status, payload })
        } else {
            Ok(ApiOutcome::Failure { status, payload })
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    logger: Logger,
}

impl ApiClient {
    pub fn new(config: ClientConfig, logger: Logger) -> Result<Self, KeysError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(ApiClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            logger,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("gh-keys/", env!("CARGO_PKG_VERSION"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET /user, only useful to check that the credentials are accepted.
    pub fn test_access(&self, creds: &Credentials) -> Result<ApiResponse, KeysError> {
        self.send(self.client.get(self.url("user")), creds)
    }

    /// POST /user/keys with `{"title": ..., "key": ...}`.
    pub fn create_key(
        &self,
        record: &PublicKeyRecord,
        creds: &Credentials,
    ) -> Result<ApiResponse, KeysError> {
        self.logger.scope(|| {
            if let Ok(data) = serde_json::to_string_pretty(record) {
                debug!("POST data: {}", data);
            }
        });
        self.send(self.client.post(self.url("user/keys")).json(record), creds)
    }

    /// GET /user/keys. Only the first page is returned.
    pub fn list_keys(&self, creds: &Credentials) -> Result<ApiResponse, KeysError> {
        self.send(self.client.get(self.url("user/keys")), creds)
    }

    /// DELETE /user/keys/{id}.
    pub fn delete_key(&self, id: &str, creds: &Credentials) -> Result<ApiResponse, KeysError> {
        self.send(self.client.delete(self.key_url(id)?), creds)
    }

    // The id is pushed as a single path segment, so `/`, `?` and `#` are
    // percent-encoded instead of reaching other endpoints.
    fn key_url(&self, id: &str) -> Result<Url, KeysError> {
        let mut url = Url::parse(&self.url("user/keys"))?;
        url.path_segments_mut()
            .map_err(|_| KeysError::BaseUrl(self.base_url.clone()))?
            .push(id);
        Ok(url)
    }

    fn send(&self, req: RequestBuilder, creds: &Credentials) -> Result<ApiResponse, KeysError> {
        self.logger.scope(|| -> Result<ApiResponse, KeysError> {
            let res = req
                .basic_auth(&creds.user, Some(&creds.token))
                .send()?;
            let status = res.status();
            debug!("{} -> {}", res.url(), status);
            let body = res.text()?;
            Ok(ApiResponse { status, body })
        })
    }
}
