//! reqwest-backed [`Transport`]
//!
//! One request per call: no retries, no sniffing, no failover.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::{HttpMethod, Request, Response, Transport, TransportError};
use crate::utils::pathify;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::trace;
use url::Url;

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .default_headers(header_map(&config.headers)?)
            .build()
            .map_err(|e| Error::Config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
        })
    }

    /// Absolute URL for a request path, keeping any path prefix of the base URL
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = pathify(&[self.base_url.path(), path]);
        url.set_path(&format!("/{}", joined));
        url
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::invalid_shape("headers", format!("'{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_shape("headers", format!("'{}': {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
    }
}

/// JSON when it parses, a JSON string otherwise, `null` when empty.
pub(crate) fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform_request(&self, request: Request) -> std::result::Result<Response, TransportError> {
        let url = self.url_for(&request.path);
        trace!(%url, method = %request.method, "sending request");

        let headers = header_map(&request.headers).map_err(TransportError::custom)?;
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url)
            .query(&request.params)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = decode_body(&response.text().await?);

        // HEAD callers read the status themselves
        if !(200..300).contains(&status) && request.method != HttpMethod::Head {
            return Err(TransportError::Status { status, body });
        }

        Ok(Response {
            status,
            headers: response_headers,
            body,
        })
    }
}
