//! Bounded retry for the one read that needs it: the first document fetch
//! after registration, whose write may not have landed yet.
//!
//! Policy: miss, wait 1s, retry; miss, wait 2s, retry; then give up and let
//! the caller decide what "not found" means. Worst case ~3s of waiting plus
//! three round-trips.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

const RETRY_DELAYS: [Duration; 2] = [Duration::from_secs(1), Duration::from_secs(2)];

/// Runs `fetch` until it yields `Some`, sleeping between attempts per the
/// fixed delay schedule. `Ok(None)` means every attempt came up empty;
/// errors abort immediately.
pub async fn retry_until_found<T, E, F, Fut>(mut fetch: F) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    if let Some(found) = fetch().await? {
        return Ok(Some(found));
    }

    for (attempt, delay) in RETRY_DELAYS.iter().enumerate() {
        debug!(
            "document not found, retrying in {:?} (attempt {})",
            delay,
            attempt + 1
        );
        tokio::time::sleep(*delay).await;
        if let Some(found) = fetch().await? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_immediate_hit_does_not_sleep() {
        let result: Result<Option<u32>, ()> = retry_until_found(|| async { Ok(Some(7)) }).await;
        assert_eq!(result, Ok(Some(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_attempt_after_one_second() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let result: Result<Option<u32>, ()> = retry_until_found(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok((n >= 1).then_some(42)) }
        })
        .await;
        assert_eq!(result, Ok(Some(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_three_attempts_and_three_seconds() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let result: Result<Option<u32>, ()> = retry_until_found(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(None) }
        })
        .await;
        assert_eq!(result, Ok(None));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_aborts_without_further_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<Option<u32>, &str> = retry_until_found(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 1 {
                    Err("boom")
                } else {
                    Ok(None)
                }
            }
        })
        .await;
        assert_eq!(result, Err("boom"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
