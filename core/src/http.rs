//! HTTP request/response types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. Services build `HttpRequest`
//! values and parse `HttpResponse` values; the actual network round-trip is
//! delegated to a `Transport`, which also owns authentication, timeouts,
//! connection reuse and retries. Keeping the I/O behind one trait method
//! leaves every build and parse step deterministic and testable without a
//! network.
//!
//! All fields use owned types (`String`, `Vec`) so values can be recorded,
//! replayed and compared in tests.

use serde_json::{Map, Value};
use url::Url;

use crate::error::{ApiError, TransportError};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by the `build_*` methods of the resource services. `url` is absolute
/// and already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Executes requests against the network.
///
/// Implementations inject credentials and must return 4xx/5xx responses as
/// data; only failures to complete the round-trip are errors.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// A route with positional `{name}` placeholders, e.g.
/// `calls/{call_control_id}/actions/answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTemplate(pub &'static str);

impl PathTemplate {
    pub fn placeholders(&self) -> usize {
        self.segments().filter(|segment| is_placeholder(segment)).count()
    }

    fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// Append the expanded template to `base`. Each argument fills one
    /// placeholder in order and is percent-encoded as a single path segment.
    pub fn expand(&self, base: &Url, args: &[&str]) -> Result<Url, ApiError> {
        if args.len() != self.placeholders() {
            return Err(ApiError::InvalidUrl(format!(
                "{} expects {} path arguments, got {}",
                self.0,
                self.placeholders(),
                args.len()
            )));
        }
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(format!("{base} cannot be a base url")))?;
            path.pop_if_empty();
            let mut args = args.iter();
            for segment in self.segments() {
                if is_placeholder(segment) {
                    if let Some(arg) = args.next() {
                        path.push(arg);
                    }
                } else {
                    path.push(segment);
                }
            }
        }
        Ok(url)
    }
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Flatten an encoded params object into deepObject query pairs:
/// `{"filter": {"status": "active"}}` becomes `filter[status]=active`.
/// Arrays are joined with commas and `null` values are dropped.
pub fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        flatten_query(key.clone(), value, &mut pairs);
    }
    pairs
}

fn flatten_query(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Object(entries) => {
            for (child, value) in entries {
                flatten_query(format!("{key}[{child}]"), value, pairs);
            }
        }
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(scalar_text)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push((key, joined));
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                pairs.push((key, text));
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
