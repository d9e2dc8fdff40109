//! CMCI transport: session handle and REST dispatcher.
//!
//! The dispatcher is the pipeline's only side-effecting collaborator. It takes
//! a session (connection parameters, opaque to the request-building core), a
//! resolved resource path, optional query parameters, and — for mutating verbs
//! — a request envelope, and performs exactly one HTTP round trip. No retries,
//! no caching; cancellation and timeout policy live here and nowhere else.

use crate::error::CmciError;
use crate::request::RequestEnvelope;
use crate::response::CmciResponse;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

const CMCI_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const CMCI_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport scheme for the CMCI connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn parse(s: &str) -> Result<Protocol, CmciError> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(CmciError::Config(format!(
                "Invalid protocol: {} (must be 'http' or 'https')",
                other
            ))),
        }
    }
}

/// Connection parameters for a CMCI endpoint.
///
/// Opaque to the request-building core: nothing in here ever reaches a
/// request envelope's attribute map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmciSession {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub protocol: Protocol,
    /// When false, invalid TLS certificates are accepted (self-signed test
    /// regions).
    pub reject_unauthorized: bool,
}

impl CmciSession {
    /// Scheme, host, and port as a URL prefix without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol.as_str(), self.host, self.port)
    }
}

/// The transport collaborator: one HTTP round trip per call.
#[async_trait]
pub trait CmciDispatcher: Send + Sync {
    async fn get(
        &self,
        session: &CmciSession,
        resource_path: &str,
        query: &[(String, String)],
    ) -> Result<CmciResponse, CmciError>;

    async fn post(
        &self,
        session: &CmciSession,
        resource_path: &str,
        query: &[(String, String)],
        envelope: &RequestEnvelope,
    ) -> Result<CmciResponse, CmciError>;

    async fn put(
        &self,
        session: &CmciSession,
        resource_path: &str,
        query: &[(String, String)],
        envelope: &RequestEnvelope,
    ) -> Result<CmciResponse, CmciError>;

    async fn delete(
        &self,
        session: &CmciSession,
        resource_path: &str,
        query: &[(String, String)],
    ) -> Result<CmciResponse, CmciError>;
}

/// reqwest-backed dispatcher.
pub struct CmciRestClient;

impl CmciRestClient {
    pub fn new() -> Self {
        CmciRestClient
    }

    fn http_client(session: &CmciSession) -> Result<Client, CmciError> {
        Client::builder()
            .connect_timeout(CMCI_CONNECT_TIMEOUT)
            .timeout(CMCI_REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!session.reject_unauthorized)
            .build()
            .map_err(|e| CmciError::Transport(format!("Failed to create HTTP client: {}", e)))
    }

    fn request(
        session: &CmciSession,
        method: Method,
        resource_path: &str,
        query: &[(String, String)],
    ) -> Result<RequestBuilder, CmciError> {
        let client = Self::http_client(session)?;
        let url = format!("{}{}", session.base_url(), resource_path);
        let mut builder = client
            .request(method, &url)
            .basic_auth(&session.user, Some(&session.password));
        if !query.is_empty() {
            builder = builder.query(query);
        }
        Ok(builder)
    }

    async fn dispatch(builder: RequestBuilder) -> Result<CmciResponse, CmciError> {
        let response = builder.send().await.map_err(map_http_error)?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CmciError::Transport(format!("Failed to read response body: {}", e)))?;
        trace!("CMCI response status={} body_bytes={}", status, text.len());

        if !status.is_success() {
            return Err(CmciError::Transport(format!(
                "CMCI request failed with status {}: {}",
                status,
                text.trim()
            )));
        }

        CmciResponse::from_xml(&text)?.into_result()
    }
}

impl Default for CmciRestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CmciDispatcher for CmciRestClient {
    async fn get(
        &self,
        session: &CmciSession,
        resource_path: &str,
        query: &[(String, String)],
    ) -> Result<CmciResponse, CmciError> {
        debug!("GET {}", resource_path);
        let builder = Self::request(session, Method::GET, resource_path, query)?;
        Self::dispatch(builder).await
    }

    async fn post(
        &self,
        session: &CmciSession,
        resource_path: &str,
        query: &[(String, String)],
        envelope: &RequestEnvelope,
    ) -> Result<CmciResponse, CmciError> {
        debug!("POST {}", resource_path);
        let builder = Self::request(session, Method::POST, resource_path, query)?
            .header("Content-Type", "application/xml")
            .body(envelope.to_xml());
        Self::dispatch(builder).await
    }

    async fn put(
        &self,
        session: &CmciSession,
        resource_path: &str,
        query: &[(String, String)],
        envelope: &RequestEnvelope,
    ) -> Result<CmciResponse, CmciError> {
        debug!("PUT {}", resource_path);
        let builder = Self::request(session, Method::PUT, resource_path, query)?
            .header("Content-Type", "application/xml")
            .body(envelope.to_xml());
        Self::dispatch(builder).await
    }

    async fn delete(
        &self,
        session: &CmciSession,
        resource_path: &str,
        query: &[(String, String)],
    ) -> Result<CmciResponse, CmciError> {
        debug!("DELETE {}", resource_path);
        let builder = Self::request(session, Method::DELETE, resource_path, query)?;
        Self::dispatch(builder).await
    }
}

/// Map reqwest failures to the transport error category.
fn map_http_error(error: reqwest::Error) -> CmciError {
    if error.is_timeout() {
        CmciError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        CmciError::Transport(format!("Connection error: {}", error))
    } else {
        CmciError::Transport(format!("HTTP error: {}", error))
    }
}
