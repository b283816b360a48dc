//! Snapshot HTTP server.
//!
//! `GET /api/metrics[?at=MS]` returns the JSON snapshot, `GET /api/status`
//! the screen-reader sentence and `GET /healthz` a liveness check.

use crate::CliError;
use livepulse_core::{summary, synthesize, Bucket, Clock, Snapshot, SystemClock, TickerConfig};
use serde::Serialize;
use tiny_http::{Header, Method, Response, Server};

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// Body of `GET /api/metrics`.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub summary: String,
}

impl MetricsResponse {
    /// Synthesize the response for the bucket containing `at_ms`.
    pub fn at(config: &TickerConfig, at_ms: i64) -> Result<Self, CliError> {
        let bucket = Bucket::containing(at_ms, config.bucket_ms)?;
        let snapshot = synthesize(&config.seed_namespace, &bucket);
        let summary = summary(&snapshot.items);
        Ok(Self { snapshot, summary })
    }
}

/// Routed response before it is handed to `tiny_http`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: TEXT,
            body: body.into(),
        }
    }

    fn json(body: String) -> Self {
        Self {
            status: 200,
            content_type: JSON,
            body,
        }
    }
}

/// Value of `at` in a query string, if present.
fn parse_at(query: Option<&str>) -> Result<Option<i64>, String> {
    let Some(query) = query else {
        return Ok(None);
    };
    for pair in query.split('&') {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if name == "at" {
            return value
                .parse::<i64>()
                .map(Some)
                .map_err(|_| format!("invalid at: {value:?}"));
        }
    }
    Ok(None)
}

/// Route one request. Pure apart from reading `now_ms`.
pub fn route(method: &Method, url: &str, config: &TickerConfig, now_ms: i64) -> Reply {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };

    if !matches!(path, "/api/metrics" | "/api/status" | "/healthz") {
        return Reply::text(404, "404 Not Found");
    }
    if *method != Method::Get {
        return Reply::text(405, "405 Method Not Allowed");
    }
    if path == "/healthz" {
        return Reply::text(200, "ok");
    }

    let at_ms = match parse_at(query) {
        Ok(at) => at.unwrap_or(now_ms),
        Err(message) => return Reply::text(400, message),
    };
    let response = match MetricsResponse::at(config, at_ms) {
        Ok(response) => response,
        Err(e) => return Reply::text(400, e.to_string()),
    };

    if path == "/api/status" {
        return Reply::text(200, response.summary);
    }
    match serde_json::to_string(&response) {
        Ok(body) => Reply::json(body),
        Err(e) => Reply::text(500, e.to_string()),
    }
}

/// Serve until the process is stopped.
pub fn serve(host: &str, port: u16, config: &TickerConfig) -> Result<(), CliError> {
    let addr = format!("{host}:{port}");
    let server = Server::http(&addr).map_err(|e| CliError::Server(e.to_string()))?;
    tracing::info!(%addr, bucket_ms = config.bucket_ms, "snapshot server listening");
    eprintln!("Serving live metrics on http://{addr}/api/metrics (Ctrl+C to stop)");

    for request in server.incoming_requests() {
        let reply = route(request.method(), request.url(), config, SystemClock.now_ms());
        tracing::debug!(
            method = %request.method(),
            url = request.url(),
            status = reply.status,
            "request"
        );

        let mut response = Response::from_string(reply.body).with_status_code(reply.status);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
            response = response.with_header(header);
        }
        if let Ok(header) = Header::from_bytes(&b"Cache-Control"[..], &b"no-store"[..]) {
            response = response.with_header(header);
        }
        if reply.status == 405 {
            if let Ok(header) = Header::from_bytes(&b"Allow"[..], &b"GET"[..]) {
                response = response.with_header(header);
            }
        }

        if let Err(e) = request.respond(response) {
            tracing::warn!(error = %e, "failed to send response");
        }
    }
    Ok(())
}
