//! Request throttling for the YouTube Data API

use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::trace;

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Process-wide limiter shared by every endpoint
#[derive(Clone)]
pub struct ApiRateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl ApiRateLimiter {
    /// Create a new limiter allowing `requests_per_second`
    pub fn new(requests_per_second: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(nonzero!(1u32));
        let quota = Quota::per_second(rps).allow_burst(nonzero!(1u32));

        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Wait until a request is allowed
    pub async fn wait(&self) {
        if self.limiter.check().is_err() {
            trace!("Rate limiting API request");
            self.limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_rate_limiter_spaces_requests() {
        let limiter = ApiRateLimiter::new(10);

        let start = Instant::now();
        for _ in 0..3 {
            limiter.wait().await;
        }

        // Burst of one, then 100ms per permit
        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_zero_rate_falls_back_to_one() {
        let limiter = ApiRateLimiter::new(0);
        limiter.wait().await;
    }
}
