use crate::services::errors::RelayError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }
}

/// Sends one call to the assessment API.
///
/// A non-2xx status is returned as a normal response; only transport
/// failures come back as `Err`.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn send(&self, req: UpstreamRequest) -> Result<UpstreamResponse, RelayError>;
}

pub struct ReqwestUpstreamClient {
    client: Client,
}

impl ReqwestUpstreamClient {
    pub fn new(token: &SecretString, timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder()
            .default_headers(upstream_headers(token)?)
            .timeout(timeout)
            .user_agent(concat!("assessment-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

/// Headers sent on every upstream call.
pub fn upstream_headers(token: &SecretString) -> Result<HeaderMap, RelayError> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[async_trait]
impl UpstreamClient for ReqwestUpstreamClient {
    async fn send(&self, req: UpstreamRequest) -> Result<UpstreamResponse, RelayError> {
        let resp = self
            .client
            .request(req.method, req.url)
            .json(&req.body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let mut headers = BTreeMap::new();
        for (name, value) in resp.headers().iter() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), value_str.to_string());
            }
        }
        let body = resp.text().await?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_bearer_and_json_headers() {
        let headers = upstream_headers(&SecretString::from("abc123".to_string())).unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer abc123");
        assert!(auth.is_sensitive());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn rejects_token_with_newline() {
        let err = upstream_headers(&SecretString::from("abc\n123".to_string())).unwrap_err();
        assert!(matches!(err, RelayError::InvalidHeader(_)));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let resp = UpstreamResponse {
            status: 201,
            headers: BTreeMap::from([("location".to_string(), "/a/b".to_string())]),
            body: String::new(),
        };
        assert!(resp.is_success());
        assert_eq!(resp.header("Location"), Some("/a/b"));
    }
}
