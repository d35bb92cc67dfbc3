use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use ureq::Agent;

use super::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// 一次 HTTP 交互，非 2xx 状态也是响应而不是错误
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// 在 tokio 阻塞线程池上运行的 `ureq` agent
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    fn send_sync(agent: &Agent, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            Method::Get => with_headers(agent.get(&url), &headers).call(),
            Method::Delete => with_headers(agent.delete(&url), &headers).call(),
            Method::Post => {
                let req = with_headers(agent.post(&url), &headers);
                match body {
                    Some(bytes) => req.send(&bytes[..]),
                    None => req.send_empty(),
                }
            }
            Method::Put => {
                let req = with_headers(agent.put(&url), &headers);
                match body {
                    Some(bytes) => req.send(&bytes[..]),
                    None => req.send_empty(),
                }
            }
        };

        let response = result.map_err(|e| {
            warn!("{} {} failed: {}", method.as_str(), url, e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_vec()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        debug!("{} {} -> {}", method.as_str(), url, status);
        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

#[async_trait]
impl Transport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        // Agent 内部是 Arc，clone 代价很低
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || Self::send_sync(&agent, request))
            .await
            .map_err(|e| ClientError::Network(format!("request task failed: {}", e)))?
    }
}
