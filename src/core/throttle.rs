use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

/// Kind of external call being spaced out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Search,
    Enrichment,
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallKind::Search => write!(f, "search"),
            CallKind::Enrichment => write!(f, "enrichment"),
        }
    }
}

/// Fixed-interval throttle shared by the whole process
///
/// Each call kind has its own minimum spacing, measured from the moment the
/// previous call of that kind completed. A single async mutex gates every
/// kind, so concurrent callers are serialized globally rather than per task.
#[derive(Debug)]
pub struct RateLimiter {
    search_interval: Duration,
    enrichment_interval: Duration,
    last_completed: Mutex<HashMap<CallKind, Instant>>,
}

impl RateLimiter {
    pub fn new(search_interval: Duration, enrichment_interval: Duration) -> Self {
        Self {
            search_interval,
            enrichment_interval,
            last_completed: Mutex::new(HashMap::new()),
        }
    }

    /// No spacing at all; used by tests and dry runs
    pub fn unthrottled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn interval(&self, kind: CallKind) -> Duration {
        match kind {
            CallKind::Search => self.search_interval,
            CallKind::Enrichment => self.enrichment_interval,
        }
    }

    /// Wait until the interval since the last `kind` call has elapsed
    ///
    /// The returned permit keeps the gate closed; the call counts as
    /// completed when the permit is dropped, so hold it across the request.
    pub async fn throttle(&self, kind: CallKind) -> ThrottlePermit<'_> {
        let last = self.last_completed.lock().await;
        self.wait_locked(&last, kind).await;
        ThrottlePermit { last, kind }
    }

    /// Throttle, run `call`, then stamp its completion time
    ///
    /// The gate stays held for the whole call, so no other caller can slip
    /// in between the wait and the request.
    pub async fn call<F, T>(&self, kind: CallKind, call: F) -> T
    where
        F: Future<Output = T>,
    {
        let permit = self.throttle(kind).await;
        let output = call.await;
        drop(permit);
        output
    }

    async fn wait_locked(&self, last: &HashMap<CallKind, Instant>, kind: CallKind) {
        let interval = self.interval(kind);
        if interval.is_zero() {
            return;
        }
        if let Some(previous) = last.get(&kind) {
            let ready_at = *previous + interval;
            if ready_at > Instant::now() {
                tracing::trace!(
                    "Throttling {} call for {:?}",
                    kind,
                    ready_at.saturating_duration_since(Instant::now())
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
    }
}

/// Exclusive slot on the rate limiter, returned by [`RateLimiter::throttle`]
///
/// Dropping it records the call as completed.
#[must_use = "the call is stamped as completed when the permit drops"]
pub struct ThrottlePermit<'a> {
    last: MutexGuard<'a, HashMap<CallKind, Instant>>,
    kind: CallKind,
}

impl Drop for ThrottlePermit<'_> {
    fn drop(&mut self) {
        self.last.insert(self.kind, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_call_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(5), Duration::from_secs(5));
        let start = std::time::Instant::now();
        drop(limiter.throttle(CallKind::Search).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_spacing_between_same_kind() {
        let limiter = RateLimiter::new(Duration::from_millis(80), Duration::ZERO);
        let start = std::time::Instant::now();
        drop(limiter.throttle(CallKind::Search).await);
        drop(limiter.throttle(CallKind::Search).await);
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_kinds_are_spaced_independently() {
        let limiter = RateLimiter::new(Duration::from_secs(5), Duration::ZERO);
        let start = std::time::Instant::now();
        drop(limiter.throttle(CallKind::Search).await);
        drop(limiter.throttle(CallKind::Enrichment).await);
        drop(limiter.throttle(CallKind::Enrichment).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_interval_measured_from_completion() {
        let limiter = RateLimiter::new(Duration::ZERO, Duration::from_millis(60));
        let start = std::time::Instant::now();
        limiter
            .call(CallKind::Enrichment, tokio::time::sleep(Duration::from_millis(40)))
            .await;
        limiter.call(CallKind::Enrichment, async {}).await;
        // 40ms for the first call plus the full 60ms gap after it finished
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_permit_stamps_when_released() {
        let limiter = RateLimiter::new(Duration::from_millis(60), Duration::ZERO);
        let start = std::time::Instant::now();

        let permit = limiter.throttle(CallKind::Search).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        drop(permit);

        drop(limiter.throttle(CallKind::Search).await);
        // The gap starts when the first permit was released, not when it was granted
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_gate_is_global_across_tasks() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(50), Duration::ZERO));
        let start = std::time::Instant::now();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    drop(limiter.throttle(CallKind::Search).await);
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // Three calls need two full gaps between them
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
