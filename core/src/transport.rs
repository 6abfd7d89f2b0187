//! Blocking transport built on `ureq`.
//!
//! Disables ureq's status-code-as-error behavior so 4xx/5xx responses come
//! back as data and the services decide what a status means.

use std::time::Duration;

use ureq::typestate::WithBody;
use ureq::{Agent, Body, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

const USER_AGENT: &str = concat!("telnyx-core/", env!("CARGO_PKG_VERSION"));

/// Sends requests with `ureq` and injects the bearer token.
pub struct UreqTransport {
    agent: Agent,
    authorization: String,
}

impl UreqTransport {
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            authorization: format!("Bearer {api_key}"),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_key, config.timeout)
    }

    fn prepare<B>(&self, builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
        request
            .headers
            .iter()
            .fold(builder, |builder, (key, value)| builder.header(key, value))
            .header("authorization", &self.authorization)
            .header("user-agent", USER_AGENT)
            .header("accept", "application/json")
    }
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let body = request.body.as_deref();
        let mut response = match request.method {
            HttpMethod::Get => self.prepare(self.agent.get(url), request).call(),
            HttpMethod::Delete => self.prepare(self.agent.delete(url), request).call(),
            HttpMethod::Post => send(self.prepare(self.agent.post(url), request), body),
            HttpMethod::Put => send(self.prepare(self.agent.put(url), request), body),
            HttpMethod::Patch => send(self.prepare(self.agent.patch(url), request), body),
        }
        .map_err(TransportError::new)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(TransportError::new)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
