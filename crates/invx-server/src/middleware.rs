use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter guarding the processing endpoint, which fans out to
/// the paid extraction API. At least one request per window is always allowed.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct RejectionBody {
    success: bool,
    error: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

impl RateLimitState {
    /// Counts one request against the current window, or returns the time
    /// left until the window resets when the budget is spent.
    async fn acquire(&self) -> Result<(), Duration> {
        let mut window = self.state.lock().await;
        if window.started_at.elapsed() >= self.window {
            window.started_at = Instant::now();
            window.count = 0;
        }
        if window.count >= self.max_requests {
            return Err(self.window.saturating_sub(window.started_at.elapsed()));
        }
        window.count += 1;
        Ok(())
    }
}

/// Rejects processing requests over the window budget with `429` and a
/// `Retry-After` header in whole seconds.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let Err(remaining) = rate_limit.acquire().await else {
        return next.run(req).await;
    };

    let retry_after = remaining.as_secs().max(1);
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or("-", |id| id.0.as_str());
    tracing::warn!(
        request_id,
        max_requests = rate_limit.max_requests,
        retry_after_secs = retry_after,
        "processing rate limit exceeded"
    );

    let mut res = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(RejectionBody {
            success: false,
            error: "Too many processing requests, please wait and try again",
        }),
    )
        .into_response();
    res.headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(retry_after));
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use tower::ServiceExt;

    fn limited_router(max_requests: usize) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn_with_state(
                RateLimitState::new(max_requests, Duration::from_secs(60)),
                enforce_rate_limit,
            ))
            .layer(axum::middleware::from_fn(request_id))
    }

    fn get_root() -> Request {
        Request::builder()
            .uri("/")
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let response = limited_router(10).oneshot(get_root()).await.expect("response");
        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("x-request-id header");
        assert!(Uuid::parse_str(id).is_ok(), "expected a UUID, got {id}");
    }

    #[tokio::test]
    async fn request_id_is_echoed_when_present() {
        let request = Request::builder()
            .uri("/")
            .header("x-request-id", "req-abc")
            .body(Body::empty())
            .expect("request");
        let response = limited_router(10).oneshot(request).await.expect("response");
        assert_eq!(
            response.headers().get("x-request-id").map(HeaderValue::as_bytes),
            Some(b"req-abc".as_slice())
        );
    }

    #[tokio::test]
    async fn requests_over_the_limit_are_rejected() {
        let app = limited_router(2);

        for _ in 0..2 {
            let response = app.clone().oneshot(get_root()).await.expect("response");
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(get_root()).await.expect("response");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .expect("retry-after header");
        assert!((1..=60).contains(&retry_after), "got {retry_after}");
    }

    #[tokio::test]
    async fn zero_limit_still_admits_one_request_per_window() {
        let app = limited_router(0);

        let first = app.clone().oneshot(get_root()).await.expect("response");
        assert_eq!(first.status(), StatusCode::OK);
        let second = app.oneshot(get_root()).await.expect("response");
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn window_resets_after_it_elapses() {
        let state = RateLimitState::new(1, Duration::from_millis(20));
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                enforce_rate_limit,
            ));

        let first = app.clone().oneshot(get_root()).await.expect("response");
        assert_eq!(first.status(), StatusCode::OK);
        let second = app.clone().oneshot(get_root()).await.expect("response");
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        tokio::time::sleep(Duration::from_millis(40)).await;
        let third = app.oneshot(get_root()).await.expect("response");
        assert_eq!(third.status(), StatusCode::OK);
    }
}
