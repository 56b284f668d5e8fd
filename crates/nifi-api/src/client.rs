// Generic JSON call layer.
//
// Every resource operation funnels through `dispatch`: one request, one
// classification, no retries. Resource modules (process_groups, processors,
// connections) add inherent methods on `Client` in their own files.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::Revision;
use crate::transport::TransportConfig;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const BODY_PREVIEW_CHARS: usize = 200;

// ── Configuration ────────────────────────────────────────────────────

/// URL scheme for the API endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Where the API lives: `<scheme>://<host>/<api_path>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Host and optional port, e.g. `localhost:8080`.
    pub host: String,
    /// API path prefix, e.g. `nifi-api`.
    pub api_path: String,
    pub scheme: Scheme,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, api_path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_path: api_path.into(),
            scheme: Scheme::Http,
        }
    }

    /// The API root, always ending in `/`.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = self.host.trim_end_matches('/');
        let api_path = self.api_path.trim_matches('/');
        let raw = if api_path.is_empty() {
            format!("{}://{host}/", self.scheme.as_str())
        } else {
            format!("{}://{host}/{api_path}/", self.scheme.as_str())
        };
        Ok(Url::parse(&raw)?)
    }
}

// ── Outcome ──────────────────────────────────────────────────────────

/// Result of a call that reached the server and was not a failure.
///
/// A 404 is reported as [`Outcome::NotFound`] rather than an error so that
/// callers can tell "absent" apart from "broken" by pattern matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success { status: u16, body: T },
    NotFound { status: u16 },
}

impl<T> Outcome<T> {
    pub fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } | Self::NotFound { status } => *status,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// `Some(body)` on success, `None` on 404.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Success { body, .. } => Some(body),
            Self::NotFound { .. } => None,
        }
    }

    /// The body, treating 404 as an API error. For operations whose target
    /// must exist (create under a parent, update, state changes).
    pub fn found(self) -> Result<T, Error> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::NotFound { status } => Err(Error::Api {
                status,
                message: "resource not found".into(),
            }),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success { status, body } => Outcome::Success {
                status,
                body: f(body),
            },
            Self::NotFound { status } => Outcome::NotFound { status },
        }
    }
}

/// Classified response before the body is consumed.
enum Dispatched {
    Success(reqwest::Response),
    NotFound(u16),
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the flow-management REST API.
///
/// Holds the injected transport and endpoint config only; every call
/// carries its own request/response pair, so one instance can be shared.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    // ── Constructors ─────────────────────────────────────────────────

    /// Wrap an existing `reqwest::Client` (caller owns timeouts, TLS, auth headers).
    pub fn new(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    /// Build the transport from a `TransportConfig`.
    pub fn from_config(config: ClientConfig, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::new(config, http))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the API root. Segments are percent-encoded,
    /// so ids cannot escape their position in the path.
    pub fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.config.base_url()?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.config.host.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// [`url`](Self::url) plus the `version` query parameter deletes require.
    pub(crate) fn versioned_url(&self, segments: &[&str], revision: Revision) -> Result<Url, Error> {
        let mut url = self.url(segments)?;
        url.query_pairs_mut()
            .append_pair("version", &revision.version.to_string());
        Ok(url)
    }

    // ── Call primitive ───────────────────────────────────────────────

    /// Issue one request and decode a successful response body into `T`.
    ///
    /// `body`, when present, is sent as JSON. A 404 yields
    /// [`Outcome::NotFound`] without touching the body; any other status
    /// at or above 300 is an [`Error::Api`].
    pub async fn json_call<B, T>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Outcome<T>, Error>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        match self.dispatch(method, url, body).await? {
            Dispatched::NotFound(status) => Ok(Outcome::NotFound { status }),
            Dispatched::Success(resp) => {
                let status = resp.status().as_u16();
                let raw = resp.text().await?;
                let decoded = serde_json::from_str(&raw).map_err(|e| Error::Deserialization {
                    message: format!("{e} (body preview: {:?})", preview(&raw)),
                    body: raw.clone(),
                })?;
                Ok(Outcome::Success {
                    status,
                    body: decoded,
                })
            }
        }
    }

    /// Like [`json_call`](Self::json_call) but ignores the response body.
    pub async fn json_call_discard<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Outcome<()>, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        match self.dispatch(method, url, body).await? {
            Dispatched::NotFound(status) => Ok(Outcome::NotFound { status }),
            Dispatched::Success(resp) => {
                let status = resp.status().as_u16();
                // Drain so the connection goes back to the pool.
                resp.bytes().await?;
                Ok(Outcome::Success { status, body: () })
            }
        }
    }

    /// Like [`json_call`](Self::json_call) but returns the successful body
    /// as text, leaving interpretation (or tolerance of an empty body) to
    /// the caller.
    pub async fn text_call<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Outcome<String>, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        match self.dispatch(method, url, body).await? {
            Dispatched::NotFound(status) => Ok(Outcome::NotFound { status }),
            Dispatched::Success(resp) => {
                let status = resp.status().as_u16();
                let raw = resp.text().await?;
                Ok(Outcome::Success { status, body: raw })
            }
        }
    }

    async fn dispatch<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Dispatched, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!("{method} {url}");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(Error::Encode)?;
            request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(encoded);
        }

        let resp = request.send().await?;
        let status = resp.status();
        trace!(status = status.as_u16(), "response received");

        if status == StatusCode::NOT_FOUND {
            return Ok(Dispatched::NotFound(status.as_u16()));
        }

        if status.as_u16() >= 300 {
            let raw = resp.text().await.unwrap_or_default();
            let message = if raw.is_empty() {
                status.to_string()
            } else {
                preview(&raw)
            };
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(Dispatched::Success(resp))
    }

    // ── Verb helpers ─────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Outcome<T>, Error> {
        self.json_call(Method::GET, url, None::<&()>).await
    }

    pub(crate) async fn post<T, B>(&self, url: Url, body: &B) -> Result<Outcome<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        self.json_call(Method::POST, url, Some(body)).await
    }

    pub(crate) async fn put<T, B>(&self, url: Url, body: &B) -> Result<Outcome<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        self.json_call(Method::PUT, url, Some(body)).await
    }

    pub(crate) async fn put_text<B>(&self, url: Url, body: &B) -> Result<Outcome<String>, Error>
    where
        B: Serialize + Sync,
    {
        self.text_call(Method::PUT, url, Some(body)).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<Outcome<()>, Error> {
        self.json_call_discard(Method::DELETE, url, None::<&()>).await
    }
}

/// First few hundred characters of a body, cut on a char boundary.
fn preview(raw: &str) -> String {
    raw.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new(
            ClientConfig::new("localhost:8080", "/nifi-api/"),
            reqwest::Client::new(),
        )
    }

    #[test]
    fn base_url_trims_slashes() {
        let url = client().config().base_url().unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/nifi-api/");
    }

    #[test]
    fn https_scheme_is_honoured() {
        let config = ClientConfig {
            scheme: Scheme::Https,
            ..ClientConfig::new("nifi.example.com", "nifi-api")
        };
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://nifi.example.com/nifi-api/"
        );
    }

    #[test]
    fn url_joins_segments() {
        let url = client()
            .url(&["process-groups", "root", "process-groups"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/nifi-api/process-groups/root/process-groups"
        );
    }

    #[test]
    fn url_encodes_ids() {
        let url = client().url(&["processors", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/nifi-api/processors/a%2Fb%20c"
        );
    }

    #[test]
    fn empty_api_path_is_allowed() {
        let config = ClientConfig::new("localhost:8080", "");
        let client = Client::new(config, reqwest::Client::new());
        assert_eq!(
            client.url(&["connections", "c1"]).unwrap().as_str(),
            "http://localhost:8080/connections/c1"
        );
    }

    #[test]
    fn outcome_helpers() {
        let ok: Outcome<u32> = Outcome::Success {
            status: 200,
            body: 7,
        };
        assert_eq!(ok.status(), 200);
        assert_eq!(ok.clone().map(|n| n * 2).into_option(), Some(14));
        assert_eq!(ok.found().unwrap(), 7);

        let missing: Outcome<u32> = Outcome::NotFound { status: 404 };
        assert!(missing.is_not_found());
        assert_eq!(missing.clone().into_option(), None);
        assert!(missing.found().unwrap_err().is_not_found());
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let raw = "é".repeat(BODY_PREVIEW_CHARS + 10);
        assert_eq!(preview(&raw).chars().count(), BODY_PREVIEW_CHARS);
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        // Grab a free port, then close it so nothing is listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = Client::new(
            ClientConfig::new(format!("127.0.0.1:{port}"), "nifi-api"),
            reqwest::Client::new(),
        );
        let url = client.url(&["processors", "p1"]).unwrap();

        let result: Result<Outcome<serde_json::Value>, Error> =
            tokio_test::block_on(client.get(url));

        let err = result.unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
        assert_eq!(err.status(), None);
    }
}
