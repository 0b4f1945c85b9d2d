// HTTP transport for the VVP REST API
//
// The pipeline only ever looks at the status code and the raw body text, so
// the transport hands back exactly those two things and leaves JSON decoding
// to the caller.
use crate::error::{Result, VvpError};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Status code and raw body of an HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub text: String,
}

impl HttpResponse {
    pub fn new(status_code: u16, text: impl Into<String>) -> Self {
        Self {
            status_code,
            text: text.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    /// Decode the body as JSON
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.text).map_err(|e| {
            VvpError::InvalidResponse(format!("Failed to parse response body as JSON: {}", e))
        })
    }
}

/// Transport abstraction used by the session registry and the SQL pipeline
#[async_trait::async_trait]
pub trait VvpTransport: Send + Sync {
    /// POST a JSON body to `url`
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse>;

    /// GET `url`
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| VvpError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn into_http_response(response: reqwest::Response) -> Result<HttpResponse> {
        let status_code = response.status().as_u16();
        let text = response.text().await?;

        Ok(HttpResponse { status_code, text })
    }
}

#[async_trait::async_trait]
impl VvpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse> {
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| VvpError::Http(format!("POST {} failed: {}", url, e)))?;

        let response = Self::into_http_response(response).await?;
        tracing::debug!("POST {} returned {}", url, response.status_code);
        Ok(response)
    }

    async fn get(&self, url: &str) -> Result<HttpResponse> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VvpError::Http(format!("GET {} failed: {}", url, e)))?;

        let response = Self::into_http_response(response).await?;
        tracing::debug!("GET {} returned {}", url, response.status_code);
        Ok(response)
    }
}
