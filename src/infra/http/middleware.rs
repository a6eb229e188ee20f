//! Request ids and failure logging shared by the HTML and JSON routers.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{Level, event};
use uuid::Uuid;

use crate::application::error::ErrorReport;

const LOG_TARGET: &str = "tintero::http::response";
const MAX_FORWARDED_ID_LEN: usize = 128;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    /// Reuse a well-formed id from a fronting proxy, otherwise mint one.
    fn from_request(request: &Request<Body>) -> Self {
        let forwarded = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| is_acceptable_id(id));

        Self {
            request_id: forwarded
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }
}

fn is_acceptable_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_FORWARDED_ID_LEN
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext::from_request(&request);
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }
    response.extensions_mut().insert(ctx);
    response
}

/// Log 4xx/5xx responses with the diagnostic the handler attached.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let started = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let report = response.extensions_mut().remove::<ErrorReport>();
        log_failure(&method, &path, status, &request_id, started, report);
    }

    response
}

fn log_failure(
    method: &Method,
    path: &str,
    status: StatusCode,
    request_id: &str,
    started: Instant,
    report: Option<ErrorReport>,
) {
    let (source, chain) = report
        .map(|report| (report.source, report.messages))
        .unwrap_or(("unknown", Vec::new()));
    let detail = chain
        .first()
        .map(String::as_str)
        .unwrap_or("no diagnostic available");
    let elapsed_ms = started.elapsed().as_millis();

    macro_rules! emit {
        ($level:expr, $message:literal) => {
            event!(
                target: LOG_TARGET,
                $level,
                status = status.as_u16(),
                method = %method,
                path,
                elapsed_ms,
                source,
                detail,
                chain = ?chain,
                request_id,
                $message,
            )
        };
    }

    if status.is_server_error() {
        emit!(Level::ERROR, "request failed");
    } else {
        emit!(Level::WARN, "client request error");
    }
}
