use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use moka::future::Cache;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Keys tracked at once; older windows are evicted first
const MAX_TRACKED_CLIENTS: u64 = 100_000;

#[derive(Debug, Serialize)]
struct RateLimitError {
    error: String,
    message: String,
    retry_after: u64,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after: u64 },
}

/// Fixed-window request counter keyed by client
#[derive(Clone)]
pub struct RateLimiter {
    windows: Cache<String, Window>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        let windows = Cache::builder()
            .name("rate-limit-windows")
            .max_capacity(MAX_TRACKED_CLIENTS)
            .time_to_live(window)
            .build();

        Self {
            windows,
            max_requests,
            window,
        }
    }

    /// Count a request for `key` and decide whether it may proceed
    pub async fn check_rate_limit(&self, key: &str) -> RateLimitDecision {
        let window_len = self.window;
        let entry = self
            .windows
            .entry(key.to_string())
            .and_upsert_with(|existing| {
                let now = Instant::now();
                let next = match existing.map(|e| e.into_value()) {
                    Some(w) if now.duration_since(w.started) < window_len => Window {
                        started: w.started,
                        count: w.count.saturating_add(1),
                    },
                    _ => Window {
                        started: now,
                        count: 1,
                    },
                };
                std::future::ready(next)
            })
            .await;

        let window = entry.into_value();
        if window.count <= self.max_requests {
            return RateLimitDecision::Allowed;
        }

        let remaining = self.window.saturating_sub(window.started.elapsed());
        RateLimitDecision::Limited {
            retry_after: remaining.as_secs().max(1),
        }
    }
}

/// Client address: proxy headers first, then the socket peer
fn extract_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|h| h.to_str().ok()))
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limit for everything under `/api`
pub async fn rate_limit_api(
    State(state): State<Arc<crate::AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = extract_ip(request.headers(), peer);

    match state.rate_limiter.check_rate_limit(&format!("api:{}", ip)).await {
        RateLimitDecision::Allowed => Ok(next.run(request).await),
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!("Rate limit exceeded for IP: {}", ip);
            Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitError {
                    error: "rate_limit_exceeded".to_string(),
                    message: format!(
                        "Too many requests. Please try again in {} seconds.",
                        retry_after
                    ),
                    retry_after,
                }),
            )
                .into_response())
        }
    }
}
