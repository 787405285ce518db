//! CORS handling.
//!
//! # Design
//! The allow-list is parsed once into a [`CorsPolicy`] and shared with the
//! middleware as router state. Preflight (`OPTIONS`) requests are answered
//! here and never reach the router. A preflight from an origin the policy
//! rejects still gets `204`; the browser blocks it because the response
//! carries no `Access-Control-Allow-Origin`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOWED_METHODS: &str = "GET,POST,PATCH,PUT,DELETE,OPTIONS";
const DEFAULT_ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const VARY_HEADERS: [&str; 3] = [
    "Origin",
    "Access-Control-Request-Method",
    "Access-Control-Request-Headers",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    wildcard: bool,
    origins: Vec<HeaderValue>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::allow_any()
    }
}

impl CorsPolicy {
    pub fn allow_any() -> Self {
        Self {
            wildcard: true,
            origins: Vec::new(),
        }
    }

    /// Parse a comma-separated allow-list.
    ///
    /// An empty entry or `*` switches on wildcard mode, so an empty string
    /// allows every origin.
    pub fn from_list(raw: &str) -> Self {
        let mut policy = Self {
            wildcard: false,
            origins: Vec::new(),
        };
        for entry in raw.trim().split(',').map(str::trim) {
            if entry.is_empty() || entry == "*" {
                policy.wildcard = true;
                continue;
            }
            match HeaderValue::from_str(entry) {
                Ok(value) => policy.origins.push(value),
                Err(_) => tracing::warn!(origin = entry, "ignoring unusable CORS origin"),
            }
        }
        policy
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn origins(&self) -> &[HeaderValue] {
        &self.origins
    }

    /// Value for `Access-Control-Allow-Origin`, if `origin` may see the response.
    pub fn allowed_origin(&self, origin: &str) -> Option<HeaderValue> {
        if self.wildcard {
            return Some(HeaderValue::from_static("*"));
        }
        self.origins
            .iter()
            .find(|allowed| allowed.as_bytes().eq_ignore_ascii_case(origin.as_bytes()))
            .cloned()
    }
}

pub async fn cors(State(policy): State<Arc<CorsPolicy>>, req: Request, next: Next) -> Response {
    let allow_origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|origin| origin.to_str().ok())
        .filter(|origin| !origin.is_empty())
        .and_then(|origin| policy.allowed_origin(origin));

    let mut response = if *req.method() == Method::OPTIONS {
        preflight(req.headers())
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    if let Some(value) = allow_origin {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    for vary in VARY_HEADERS {
        headers.append(VARY, HeaderValue::from_static(vary));
    }
    response
}

fn preflight(request_headers: &HeaderMap) -> Response {
    let allow_headers = request_headers
        .get(ACCESS_CONTROL_REQUEST_HEADERS)
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));

    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS)),
            (ACCESS_CONTROL_ALLOW_HEADERS, allow_headers),
        ],
    )
        .into_response()
}
