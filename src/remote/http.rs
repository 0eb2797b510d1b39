//! reqwest-backed collaborator for the marketplace REST API.
//!
//! # Security Note - Logging
//!
//! The session token travels in the `Authorization` header. It is wrapped in
//! `RedactedHeader` and marked sensitive so that neither our own `tracing`
//! output nor reqwest's request logging prints it.

use std::fmt;
use std::time::Duration;

use reqwest::header;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{RentalError, Result};
use crate::record::Record;
use crate::session::Session;

use super::envelope::{error_message, parse_list_response, parse_write_response};
use super::{Collaborator, WriteMethod, WriteOutcome};

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn bearer(token: &str) -> Self {
        Self {
            value: format!("Bearer {token}"),
        }
    }

    fn as_header_value(&self) -> Result<header::HeaderValue> {
        let mut value = header::HeaderValue::from_str(&self.value).map_err(|_| {
            RentalError::Config("session token contains invalid header characters".to_string())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Collaborator that talks to the marketplace API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCollaborator {
    client: Client,
    base: Url,
}

impl HttpCollaborator {
    /// Create a client for `base_url` with a total request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self { client, base })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for an endpoint path relative to the base.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, url: Url, session: &Session) -> Result<RequestBuilder> {
        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = session.token() {
            let auth = RedactedHeader::bearer(token);
            builder = builder.header(header::AUTHORIZATION, auth.as_header_value()?);
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = read_body(response).await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = error_message(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        warn!(status = status.as_u16(), %message, "collaborator request failed");
        if status == StatusCode::NOT_FOUND {
            return Err(RentalError::NotFound(message));
        }
        Err(RentalError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn transport_error(err: reqwest::Error) -> RentalError {
    if err.is_timeout() {
        RentalError::Network("request timed out".to_string())
    } else if err.is_connect() {
        RentalError::Network(format!("could not connect: {err}"))
    } else {
        RentalError::Http(err)
    }
}

async fn read_body(response: Response) -> Result<Value> {
    let text = response.text().await.map_err(transport_error)?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(_) => Ok(Value::String(text)),
    }
}

impl Collaborator for HttpCollaborator {
    async fn fetch_list(
        &self,
        path: &str,
        query: &[(String, String)],
        session: &Session,
    ) -> Result<Vec<Record>> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        debug!(%url, "fetching list");

        let body = self
            .send(self.request(Method::GET, url, session)?)
            .await?;
        if let Value::String(_) = body {
            return Err(RentalError::Envelope("response is not JSON".to_string()));
        }
        let records = parse_list_response(body)?;
        debug!(count = records.len(), "list fetched");
        Ok(records)
    }

    async fn write(
        &self,
        method: WriteMethod,
        path: &str,
        body: Option<&Value>,
        session: &Session,
    ) -> Result<WriteOutcome> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "sending write");

        let http_method = match method {
            WriteMethod::Post => Method::POST,
            WriteMethod::Put => Method::PUT,
            WriteMethod::Delete => Method::DELETE,
        };
        let mut builder = self.request(http_method, url, session)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.send(builder).await?;
        parse_write_response(response)
    }
}
