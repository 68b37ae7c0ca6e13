//! HTTP middleware for the Skylane service.
//!
//! This module provides:
//! - [`RequestId`]: Correlation ID, also usable as an axum extractor
//! - [`extract_or_generate_request_id`]: Extract X-Request-ID header or generate UUID v7
//! - [`MetricsLayer`]: Tower middleware for recording HTTP metrics
//!
//! # Request ID Propagation
//!
//! The middleware extracts the `X-Request-ID` header if present, otherwise
//! generates a new UUID v7. The ID is stored in the request extensions, so
//! handlers see the same value that the request span logs.
//!
//! # Metrics Recording
//!
//! The `MetricsLayer` records:
//! - `http_requests_total`: Counter by method, path, status bucket
//! - `http_request_duration_seconds`: Histogram by method, path
//! - `http_request_size_bytes`: Histogram by method, path
//! - `http_response_size_bytes`: Histogram by method, path

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{request::Parts, HeaderMap, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Header carrying the correlation ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Create a new request ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the request ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Handlers take `RequestId` directly. Without [`MetricsLayer`] in front the
/// ID falls back to the header or a fresh UUID.
impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| extract_or_generate_request_id(&parts.headers)))
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// Looks for the `X-Request-ID` header (case-insensitive). If not present
/// or invalid UTF-8, generates a new UUID v7 (time-sortable).
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Normalize a request path for metric labels.
///
/// Strips the query string. `/routes-by-plane/{code}` collapses to one label
/// so aircraft codes do not each create a series.
pub fn normalize_path(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or(path);
    if path.starts_with("/routes-by-plane/") {
        "/routes-by-plane/{code}"
    } else {
        path
    }
}

/// Convert HTTP status code to bucket label.
fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

fn content_length(headers: &HeaderMap) -> Option<f64> {
    headers
        .get(http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<f64>().ok())
}

// =============================================================================
// MetricsLayer - Tower middleware for HTTP metrics
// =============================================================================

/// Tower layer for request correlation and HTTP metrics.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

/// Middleware service that records HTTP metrics.
#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: http_body::Body + Send + 'static,
    ResBody: http_body::Body + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = MetricsFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();

        let method = req.method().to_string();
        let path = normalize_path(req.uri().path()).to_string();

        if let Some(size) = content_length(req.headers()) {
            metrics::histogram!(
                "http_request_size_bytes",
                "method" => method.clone(),
                "path" => path.clone()
            )
            .record(size);
        }

        let request_id = extract_or_generate_request_id(req.headers());
        req.extensions_mut().insert(request_id.clone());

        let remote_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = %path,
            remote_addr = remote_addr.as_deref().unwrap_or("-"),
        );

        {
            let _enter = span.enter();
            tracing::debug!("handling request");
        }

        let future = self.inner.call(req);

        MetricsFuture {
            inner: future,
            start,
            method,
            path,
            request_id,
            span,
        }
    }
}

pin_project! {
    /// Future wrapper that records metrics on completion.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        path: String,
        request_id: RequestId,
        span: Span,
    }
}

impl<F, ResBody, E> Future for MetricsFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
    ResBody: http_body::Body,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        match this.inner.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(mut result) => {
                let duration_secs = this.start.elapsed().as_secs_f64();
                let latency_ms = duration_secs * 1000.0;

                metrics::histogram!(
                    "http_request_duration_seconds",
                    "method" => this.method.clone(),
                    "path" => this.path.clone()
                )
                .record(duration_secs);

                match &mut result {
                    Ok(response) => {
                        let status = response.status().as_u16();

                        metrics::counter!(
                            "http_requests_total",
                            "method" => this.method.clone(),
                            "path" => this.path.clone(),
                            "status" => status_bucket(status)
                        )
                        .increment(1);

                        if let Some(size) = content_length(response.headers()) {
                            metrics::histogram!(
                                "http_response_size_bytes",
                                "method" => this.method.clone(),
                                "path" => this.path.clone()
                            )
                            .record(size);
                        }

                        if let Ok(value) = HeaderValue::from_str(this.request_id.as_str()) {
                            response.headers_mut().insert(REQUEST_ID_HEADER, value);
                        }

                        tracing::info!(status, latency_ms, "request completed");
                    }
                    Err(_) => {
                        metrics::counter!(
                            "http_requests_total",
                            "method" => this.method.clone(),
                            "path" => this.path.clone(),
                            "status" => "5xx"
                        )
                        .increment(1);

                        tracing::error!(latency_ms, "request failed");
                    }
                }

                Poll::Ready(result)
            }
        }
    }
}
