use std::time::Duration;

use log::debug;
use repvoice_domain::GatewayError;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError>;
}

/// Sends requests as JSON `POST`s.
#[derive(Debug, Clone)]
pub struct ReqwestSendRequest {
    client: reqwest::Client,
}

impl ReqwestSendRequest {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

impl SendRequest for ReqwestSendRequest {
    async fn send_request(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError> {
        debug!("POST {}", redact(&request.url));
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let response = builder
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.without_url().to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| GatewayError::Transport(err.without_url().to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

/// URL without its query, which may carry a credential.
fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}
