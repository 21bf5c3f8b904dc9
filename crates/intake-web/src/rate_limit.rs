//! Per-client request rate limiting.
//!
//! Each client address gets a budget of `max_requests` per `window`. The
//! budget refills gradually over the window rather than resetting at once.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::Clock;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::debug;

use crate::config::RateLimitConfig;
use crate::error::ApiError;

/// Number of tracked clients above which idle entries are dropped.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Shared limiter keyed by client IP.
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    trust_proxy: bool,
}

impl ClientRateLimiter {
    /// Build a limiter from configuration. `None` when limiting is disabled.
    pub fn new(config: &RateLimitConfig) -> Option<Self> {
        let burst = NonZeroU32::new(config.max_requests)?;
        let quota = Quota::with_period(config.window / config.max_requests)?.allow_burst(burst);

        Some(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            trust_proxy: config.trust_proxy,
        })
    }

    /// Address the request is accounted against.
    ///
    /// Forwarding headers are only read when the server sits behind a trusted
    /// proxy. Requests with no known peer share one bucket.
    fn client_ip(&self, request: &Request) -> IpAddr {
        if self.trust_proxy {
            if let Some(ip) = forwarded_ip(request.headers()) {
                return ip;
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    /// Spend one request from `ip`'s budget, or report how long to wait.
    fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        if self.limiter.len() >= MAX_TRACKED_CLIENTS {
            self.limiter.retain_recent();
        }

        self.limiter
            .check_key(&ip)
            .map_err(|not_until| not_until.wait_time_from(self.limiter.clock().now()))
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header_ip = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|ip| ip.trim().parse().ok())
    };

    header_ip("x-forwarded-for").or_else(|| header_ip("x-real-ip"))
}

/// Middleware rejecting clients that exhausted their budget with 429.
pub async fn limit_requests(
    State(limiter): State<ClientRateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = limiter.client_ip(&request);

    match limiter.check(ip) {
        Ok(()) => next.run(request).await,
        Err(wait) => {
            debug!(%ip, path = %request.uri().path(), "Rate limit exceeded");
            ApiError::RateLimited {
                retry_after_secs: wait.as_secs().max(1),
            }
            .into_response()
        }
    }
}
