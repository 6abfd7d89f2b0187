//! Request building, execution and response parsing shared by all services.
//!
//! # Design
//! `TelnyxClient` holds the base URL and a shared `Transport`, and carries no
//! mutable state between calls. Every operation is split into a pure build
//! step that produces an `HttpRequest` and a parse step that consumes an
//! `HttpResponse`; `execute` runs the transport in between. The resource
//! services in `crate::resources` only describe endpoints and models.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{query_pairs, HttpMethod, HttpRequest, HttpResponse, PathTemplate, Transport};
use crate::model::{self, Model};
use crate::resources::calls::Calls;
use crate::resources::messages::Messages;
use crate::resources::number_orders::NumberOrders;
use crate::resources::phone_numbers::PhoneNumbers;
use crate::resources::shared::ErrorResponse;
use crate::resources::webhooks::Webhooks;
use crate::transport::UreqTransport;

/// One API operation: verb, route and the status a success answers with.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: PathTemplate,
    pub expected_status: u16,
}

impl Endpoint {
    pub const fn new(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path: PathTemplate(path),
            expected_status: 200,
        }
    }
}

/// Entry point of the SDK.
#[derive(Clone)]
pub struct TelnyxClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for TelnyxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelnyxClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl TelnyxClient {
    /// Client using the bundled `ureq` transport.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_transport(&config.base_url, UreqTransport::from_config(config))
    }

    pub fn with_transport(
        base_url: &str,
        transport: impl Transport + 'static,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            transport: Arc::new(transport),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn calls(&self) -> Calls<'_> {
        Calls::new(self)
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    pub fn phone_numbers(&self) -> PhoneNumbers<'_> {
        PhoneNumbers::new(self)
    }

    pub fn number_orders(&self) -> NumberOrders<'_> {
        NumberOrders::new(self)
    }

    pub fn webhooks(&self) -> Webhooks {
        Webhooks
    }

    fn url(&self, endpoint: &Endpoint, args: &[&str]) -> Result<Url, ApiError> {
        endpoint.path.expand(&self.base_url, args)
    }

    /// Request without query or body.
    pub fn build(&self, endpoint: &Endpoint, args: &[&str]) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: endpoint.method,
            url: self.url(endpoint, args)?.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Request whose params model is flattened into the query string.
    pub fn build_query<Q: Model>(
        &self,
        endpoint: &Endpoint,
        args: &[&str],
        params: &Q,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = self.url(endpoint, args)?;
        let pairs = query_pairs(&model::encode_map(params));
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(HttpRequest {
            method: endpoint.method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Request whose params model is sent as the JSON body.
    pub fn build_json<B: Model>(
        &self,
        endpoint: &Endpoint,
        args: &[&str],
        params: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&model::encode(params))?;
        Ok(HttpRequest {
            method: endpoint.method,
            url: self.url(endpoint, args)?.into(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Check the status and decode the body as `R`.
    pub fn parse<R: Model>(&self, endpoint: &Endpoint, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response, endpoint.expected_status)?;
        let raw: Value = serde_json::from_str(&response.body)?;
        Ok(model::decode(&raw)?)
    }

    /// Run `request` through the transport and parse the answer.
    pub fn execute<R: Model>(&self, endpoint: &Endpoint, request: HttpRequest) -> Result<R, ApiError> {
        let response = self.transport.execute(&request)?;
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            status = response.status,
            "telnyx request completed"
        );
        self.parse(endpoint, response)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Status {
        status: response.status,
        errors: error_details(&response.body),
        body: response.body.clone(),
    })
}

fn error_details(body: &str) -> Vec<crate::resources::shared::ErrorDetail> {
    if body.trim().is_empty() {
        return Vec::new();
    }
    let parsed = serde_json::from_str::<Value>(body)
        .map_err(ApiError::from)
        .and_then(|raw| model::decode::<ErrorResponse>(&raw).map_err(ApiError::from));
    match parsed {
        Ok(document) => document.errors,
        Err(err) => {
            warn!(error = %err, "error response is not a Telnyx error document");
            Vec::new()
        }
    }
}
