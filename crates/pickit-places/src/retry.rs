//! Exponential back-off for transient Places failures.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

/// Upper bound on a single back-off sleep.
const MAX_DELAY: Duration = Duration::from_secs(10);

/// Whether a failed request may succeed if sent again.
///
/// Timeouts, refused connections, HTTP 429/5xx and the legacy
/// `OVER_QUERY_LIMIT` status qualify. Key or request rejections and
/// unparseable bodies do not.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => {
            let transient_status = e.status().is_some_and(|s| {
                s.is_server_error() || s == reqwest::StatusCode::TOO_MANY_REQUESTS
            });
            e.is_timeout() || e.is_connect() || transient_status
        }
        PlacesError::ApiError { status, .. } => status == "OVER_QUERY_LIMIT",
        PlacesError::Deserialize { .. } | PlacesError::InvalidBaseUrl { .. } => false,
    }
}

/// Sleep before retry number `retry` (1-based): `base_ms * 2^(retry-1)`,
/// scaled by `jitter` and capped at [`MAX_DELAY`].
///
/// `jitter` is expected in `[0.75, 1.25)`.
fn backoff_delay(retry: u32, base_ms: u64, jitter: f64) -> Duration {
    let exponent = retry.saturating_sub(1).min(10);
    let nominal = Duration::from_millis(base_ms.saturating_mul(1 << exponent));
    nominal.min(MAX_DELAY).mul_f64(jitter).min(MAX_DELAY)
}

/// Run `operation`, retrying transient failures up to `max_retries` times.
///
/// The first non-retriable error, or the last error once retries run out, is
/// returned to the caller.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut retry = 0;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retry < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };
        retry += 1;
        let delay = backoff_delay(retry, backoff_base_ms, 0.75 + rand::random::<f64>() * 0.5);
        tracing::warn!(
            retry,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "Places request failed, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn api_error(status: &str) -> PlacesError {
        PlacesError::ApiError {
            status: status.to_owned(),
            message: None,
        }
    }

    /// Runs `retry_with_backoff` over an operation that fails with
    /// `failure()` for the first `failures` calls and then returns `7`.
    /// Returns the outcome and how many times the operation ran.
    async fn run(
        max_retries: u32,
        failures: u32,
        failure: fn() -> PlacesError,
    ) -> (Result<u32, PlacesError>, u32) {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(max_retries, 0, || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call < failures {
                    Err(failure())
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[test]
    fn quota_status_is_retriable_but_denial_is_not() {
        assert!(is_retriable(&api_error("OVER_QUERY_LIMIT")));
        assert!(!is_retriable(&api_error("REQUEST_DENIED")));
        assert!(!is_retriable(&api_error("INVALID_REQUEST")));
    }

    #[test]
    fn malformed_body_is_not_retriable() {
        let source = serde_json::from_str::<()>("{").unwrap_err();
        assert!(!is_retriable(&PlacesError::Deserialize {
            context: "nearby search".to_owned(),
            source,
        }));
    }

    #[test]
    fn delay_doubles_and_is_capped() {
        assert_eq!(backoff_delay(1, 500, 1.0), Duration::from_millis(500));
        assert_eq!(backoff_delay(2, 500, 1.0), Duration::from_millis(1000));
        assert_eq!(backoff_delay(3, 500, 1.0), Duration::from_millis(2000));
        assert_eq!(backoff_delay(9, 500, 1.0), MAX_DELAY);
        assert_eq!(backoff_delay(40, u64::MAX, 1.2), MAX_DELAY);
    }

    #[test]
    fn jitter_scales_the_delay() {
        assert_eq!(backoff_delay(1, 400, 0.75), Duration::from_millis(300));
        assert_eq!(backoff_delay(1, 400, 1.25), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retry() {
        let (result, calls) = run(3, 0, || api_error("OVER_QUERY_LIMIT")).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let (result, calls) = run(3, 2, || api_error("OVER_QUERY_LIMIT")).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn permanent_failure_is_returned_at_once() {
        let (result, calls) = run(3, 5, || api_error("REQUEST_DENIED")).await;
        assert!(matches!(result, Err(PlacesError::ApiError { .. })));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (result, calls) = run(2, 5, || api_error("OVER_QUERY_LIMIT")).await;
        assert!(matches!(result, Err(PlacesError::ApiError { .. })));
        assert_eq!(calls, 3, "one attempt plus two retries");
    }
}
