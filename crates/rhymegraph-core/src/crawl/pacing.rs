//! Request pacing for polite crawling.

use std::time::Duration;

use rand::Rng;

/// Delays successive requests and takes a longer breather at a fixed
/// cadence. Owns its own request counter; callers sharing a pacer share
/// its budget.
pub struct Pacer {
    min_delay: Duration,
    max_delay: Duration,
    long_pause_every: u64,
    long_pause: Duration,
    requests: u64,
}

impl Pacer {
    pub fn new(
        min_delay: Duration,
        max_delay: Duration,
        long_pause_every: u64,
        long_pause: Duration,
    ) -> Self {
        Self {
            min_delay,
            // Inverted bounds from a bad config degrade to a fixed delay.
            max_delay: max_delay.max(min_delay),
            long_pause_every,
            long_pause,
            requests: 0,
        }
    }

    /// A pacer that never sleeps, for tests.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, 0, Duration::ZERO)
    }

    /// Wait before the next request: a jittered short delay every time,
    /// plus the long pause at the configured cadence.
    pub async fn wait(&mut self) {
        if self.max_delay > Duration::ZERO {
            let millis = {
                let mut rng = rand::thread_rng();
                rng.gen_range(self.min_delay.as_millis() as u64..=self.max_delay.as_millis() as u64)
            };
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }

        self.requests += 1;
        if self.long_pause_every > 0 && self.requests % self.long_pause_every == 0 {
            println!(
                "  Pausing {}s after {} requests...",
                self.long_pause.as_secs(),
                self.requests
            );
            tokio::time::sleep(self.long_pause).await;
        }
    }

    /// Requests paced so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counter_advances_per_wait() {
        let mut pacer = Pacer::none();
        assert_eq!(pacer.requests(), 0);
        pacer.wait().await;
        pacer.wait().await;
        assert_eq!(pacer.requests(), 2);
    }

    #[tokio::test]
    async fn test_inverted_bounds_degrade_to_fixed_delay() {
        let mut pacer = Pacer::new(
            Duration::from_millis(2),
            Duration::ZERO,
            0,
            Duration::ZERO,
        );
        pacer.wait().await;
        assert_eq!(pacer.requests(), 1);
    }

    #[tokio::test]
    async fn test_two_pacers_do_not_share_state() {
        let mut a = Pacer::none();
        let mut b = Pacer::none();
        a.wait().await;
        assert_eq!(a.requests(), 1);
        assert_eq!(b.requests(), 0);
        b.wait().await;
        assert_eq!(b.requests(), 1);
    }
}
