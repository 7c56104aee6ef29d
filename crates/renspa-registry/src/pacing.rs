//! Fixed spacing between registry requests.
//!
//! The registry publishes no rate limit. Half a second after every call is
//! tolerated in practice and is the default. A zero delay turns pacing off.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RequestPacer {
    delay: Duration,
}

impl RequestPacer {
    #[must_use]
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the configured delay.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn zero_delay_returns_immediately() {
        let pacer = RequestPacer::new(0);
        let start = Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn pause_waits_at_least_the_delay() {
        let pacer = RequestPacer::new(30);
        let start = Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
