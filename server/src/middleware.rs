//! Request middleware: client IP resolution and access logging.
//!
//! Both are stateless `from_fn` layers. `resolve_client_ip` must run first so
//! the logger can read the `ClientIp` extension.

use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

const TRUE_CLIENT_IP: &str = "true-client-ip";
const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Best-known address of the client that sent the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

/// Client address as reported by proxy headers.
///
/// Headers are consulted in order `True-Client-IP`, `X-Real-IP`, then the
/// first hop of `X-Forwarded-For`. The first header present wins; its value
/// is only used if it parses as an IP address.
pub fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    };

    let candidate = if let Some(ip) = header(TRUE_CLIENT_IP) {
        ip
    } else if let Some(ip) = header(X_REAL_IP) {
        ip
    } else {
        let xff = header(X_FORWARDED_FOR)?;
        xff.split(',').next().unwrap_or(xff)
    };
    candidate.trim().parse().ok()
}

pub async fn resolve_client_ip(mut req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    if let Some(ip) = forwarded_ip(req.headers()).or(peer) {
        req.extensions_mut().insert(ClientIp(ip));
    }
    next.run(req).await
}

pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let client_ip = req
        .extensions()
        .get::<ClientIp>()
        .map_or_else(|| "-".to_string(), |ClientIp(ip)| ip.to_string());
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        %client_ip,
        "request"
    );
    response
}
