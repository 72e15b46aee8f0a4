use std::{
    num::NonZeroU32,
    sync::{Arc, LazyLock},
    time::Instant,
};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::InMemoryState,
    Quota, RateLimiter,
};
use poem::{
    http::header, web::RealIp, Endpoint, FromRequest, IntoResponse, Middleware, Request, Response,
    Result,
};
use poem_openapi::OperationId;
use tracing::{error, info, warn, Instrument};

pub type GovRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    InMemoryState,
    QuantaClock,
    NoOpMiddleware<QuantaInstant>,
>;

static RATE_LIMITER: LazyLock<LogRateLimiter> = LazyLock::new(LogRateLimiter::new);

/// Caps how many request-completion lines are written per second. Errors are the
/// cheapest to log, successes the most expensive.
pub struct LogRateLimiter {
    limiter: Arc<GovRateLimiter>,
}

impl LogRateLimiter {
    pub fn new() -> Self {
        let quota = Quota::per_second(NonZeroU32::new(10).unwrap());
        let limiter = RateLimiter::direct(quota);
        Self {
            limiter: Arc::new(limiter),
        }
    }

    pub fn should_log(&self, status: u16) -> bool {
        let cost = match status {
            500_u16.. => NonZeroU32::new(1).unwrap(),         // ERROR
            400_u16..=499_u16 => NonZeroU32::new(3).unwrap(), // WARN
            _ => NonZeroU32::new(5).unwrap(),                 // INFO
        };

        matches!(self.limiter.check_n(cost), Ok(Ok(())))
    }
}

#[derive(Default)]
pub struct Tracing;

impl<E: Endpoint> Middleware<E> for Tracing {
    type Output = TracingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        TracingEndpoint { inner: ep }
    }
}

/// Endpoint for the `Tracing` middleware.
pub struct TracingEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Endpoint for TracingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let remote_addr = RealIp::from_request_without_body(&req)
            .await
            .ok()
            .and_then(|real_ip| real_ip.0)
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| req.remote_addr().to_string());
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(|q| q.to_string());
        let referer = req
            .headers()
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok().map(|v| v.to_string()));
        let content_length = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok().map(|v| v.to_string()));

        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok().map(|v| v.to_string()));

        let span = tracing::info_span!(
            "request",
            remote_addr = %remote_addr,
            method = %method,
            path = %path,
            query = ?query,
            referer = ?referer,
            user_agent = ?user_agent,
            content_length = ?content_length,
        );

        async move {
            let now = Instant::now();
            let res = self.inner.call(req).await;
            let duration = now.elapsed();

            match res {
                Ok(resp) => {
                    let resp = resp.into_response();
                    let status = resp.status().as_u16();
                    let operation = resp.data::<OperationId>().map(|id| id.0);
                    log_response(status, duration, operation);
                    Ok(resp)
                }
                Err(err) => {
                    let status = err.status().as_u16();
                    log_response(status, duration, None);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[inline]
fn log_response(status: u16, duration: std::time::Duration, operation: Option<&str>) {
    if RATE_LIMITER.should_log(status) {
        match status {
            500.. => {
                error!(
                    status = %status,
                    operation = ?operation,
                    duration = ?duration,
                    "request completed with server error"
                );
            }
            400..=499 => {
                warn!(
                    status = %status,
                    operation = ?operation,
                    duration = ?duration,
                    "request completed with client error"
                );
            }
            _ => {
                info!(
                    status = %status,
                    operation = ?operation,
                    duration = ?duration,
                    "request completed successfully"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LogRateLimiter;

    #[test]
    fn successes_exhaust_the_budget_before_errors() {
        let limiter = LogRateLimiter::new();
        assert!(limiter.should_log(200));
        assert!(limiter.should_log(204));
        // Ten units per second: two successes spend them all.
        assert!(!limiter.should_log(200));
    }

    #[test]
    fn errors_are_cheap() {
        let limiter = LogRateLimiter::new();
        for _ in 0..10 {
            assert!(limiter.should_log(503));
        }
        assert!(!limiter.should_log(503));
    }
}
