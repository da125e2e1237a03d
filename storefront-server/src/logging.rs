use axum::{
    extract::{MatchedPath, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub path: String,
    pub matched_path: Option<String>,
    pub query_string: Option<String>,
    pub status_code: u16,
    pub duration_ms: u64,
    pub request_headers: Value,
    pub response_headers: Value,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub service: String,
    pub version: String,
}

// Logs every API request once the response is ready
pub async fn api_logging_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();

    let method = request.method().clone();
    let uri = request.uri().clone();
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());

    let request_headers = headers_to_json(request.headers());
    let client_ip = extract_client_ip(request.headers());
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(request).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();

    let log_entry = ApiLogEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        method: method.to_string(),
        path: uri.path().to_string(),
        matched_path,
        query_string: uri.query().map(|q| q.to_string()),
        status_code,
        duration_ms: duration.as_millis() as u64,
        request_headers,
        response_headers: headers_to_json(response.headers()),
        client_ip,
        user_agent,
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if response.status().is_server_error() {
        warn!(
            "📡 API Call: {} {} -> {} ({} ms)",
            log_entry.method, log_entry.path, status_code, log_entry.duration_ms
        );
    } else {
        info!(
            "📡 API Call: {} {} -> {} ({} ms)",
            log_entry.method, log_entry.path, status_code, log_entry.duration_ms
        );
    }
    debug!(
        "📊 Detailed Log: {}",
        serde_json::to_string(&log_entry).unwrap_or_default()
    );

    response
}

/// Headers worth keeping in the log for a JSON document API.
const LOGGED_HEADERS: [&str; 5] = ["content-type", "content-length", "accept", "user-agent", "origin"];

fn headers_to_json(headers: &HeaderMap) -> Value {
    let map = LOGGED_HEADERS
        .iter()
        .filter_map(|name| {
            let value = headers.get(*name)?.to_str().ok()?;
            Some((name.to_string(), Value::String(value.to_string())))
        })
        .collect();

    Value::Object(map)
}

fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    ["x-forwarded-for", "x-real-ip"].iter().find_map(|name| {
        let value = headers.get(*name)?.to_str().ok()?;
        // First hop of a proxy chain
        let first = value.split(',').next()?.trim();
        (!first.is_empty()).then(|| first.to_string())
    })
}
