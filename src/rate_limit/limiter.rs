//! Sliding-window admission gate

use super::config::RateLimitConfig;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Permission to issue one outbound request
///
/// Permits are not returned to a pool; the limiter tracks admission times
/// instead, so dropping a permit has no effect.
#[derive(Debug, Clone, Copy)]
#[must_use = "a permit should be held for the request it admits"]
pub struct RateLimitPermit {
    acquired_at: Instant,
    waited: Duration,
}

impl RateLimitPermit {
    /// Instant the permit was granted
    pub fn acquired_at(&self) -> Instant {
        self.acquired_at
    }

    /// Time spent waiting for admission
    pub fn waited(&self) -> Duration {
        self.waited
    }
}

/// Process-wide request rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,

    /// Admission instants within the current window, oldest first
    admitted: Mutex<VecDeque<Instant>>,

    /// Total permits granted since creation
    total_admitted: AtomicU64,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(mut config: RateLimitConfig) -> Self {
        config.max_requests = config.max_requests.max(1);
        config.window_ms = config.window_ms.max(1);
        let capacity = config.max_requests as usize;

        Self {
            config,
            admitted: Mutex::new(VecDeque::with_capacity(capacity)),
            total_admitted: AtomicU64::new(0),
        }
    }

    /// Create a limiter that admits everything (for testing)
    pub fn disabled() -> Self {
        Self::new(RateLimitConfig::disabled())
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Wait until a request slot is free, then take it
    ///
    /// Never drops a caller. Cancel-safe: dropping the future before it
    /// resolves consumes no slot.
    pub async fn acquire(&self) -> RateLimitPermit {
        let requested_at = Instant::now();

        if !self.config.enabled {
            return self.grant(requested_at, requested_at);
        }

        let window = self.config.window();
        let mut admitted = self.admitted.lock().await;

        loop {
            let now = Instant::now();
            prune(&mut admitted, now, window);

            if admitted.len() < self.config.max_requests as usize {
                admitted.push_back(now);
                return self.grant(requested_at, now);
            }

            let Some(&oldest) = admitted.front() else {
                continue;
            };
            let wake_at = oldest + window;
            tracing::debug!(
                wait_ms = wake_at.saturating_duration_since(now).as_millis() as u64,
                "rate limit reached, waiting for a free slot"
            );
            // The lock stays held so later callers queue behind this one.
            tokio::time::sleep_until(wake_at).await;
        }
    }

    /// Take a slot only if one is free right now
    pub fn try_acquire(&self) -> Option<RateLimitPermit> {
        let now = Instant::now();

        if !self.config.enabled {
            return Some(self.grant(now, now));
        }

        let mut admitted = self.admitted.try_lock().ok()?;
        prune(&mut admitted, now, self.config.window());

        if admitted.len() < self.config.max_requests as usize {
            admitted.push_back(now);
            Some(self.grant(now, now))
        } else {
            None
        }
    }

    /// Total permits granted since creation
    pub fn total_admitted(&self) -> u64 {
        self.total_admitted.load(Ordering::SeqCst)
    }

    fn grant(&self, requested_at: Instant, now: Instant) -> RateLimitPermit {
        self.total_admitted.fetch_add(1, Ordering::SeqCst);
        RateLimitPermit {
            acquired_at: now,
            waited: now.saturating_duration_since(requested_at),
        }
    }
}

fn prune(admitted: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = admitted.front() {
        if now.saturating_duration_since(oldest) >= window {
            admitted.pop_front();
        } else {
            break;
        }
    }
}
