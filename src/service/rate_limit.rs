use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Per-email limit on verification attempts.
pub struct VerifyLimiter {
    inner: DefaultKeyedRateLimiter<String>,
}

impl VerifyLimiter {
    pub fn new(quota: Quota) -> Self {
        Self {
            inner: RateLimiter::keyed(quota),
        }
    }

    pub fn per_minute(attempts: u32) -> Self {
        let attempts = NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN);
        Self::new(Quota::per_minute(attempts))
    }

    /// Consume one attempt for `email`; false once the budget is spent.
    pub fn check(&self, email: &str) -> bool {
        self.inner.check_key(&email.to_ascii_lowercase()).is_ok()
    }

    /// Forget keys whose budget has fully replenished.
    pub fn prune(&self) {
        self.inner.retain_recent();
        self.inner.shrink_to_fit();
    }

    /// Number of emails currently tracked.
    pub fn tracked(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn budget_is_per_email() {
        let limiter = VerifyLimiter::per_minute(2);
        assert!(limiter.check("a@x.org"));
        assert!(limiter.check("A@x.org"));
        assert!(!limiter.check("a@x.org"));
        assert!(limiter.check("b@x.org"));
        assert_eq!(limiter.tracked(), 2);
    }

    #[test]
    fn prune_drops_replenished_keys() {
        let quota = Quota::with_period(Duration::from_millis(5)).unwrap();
        let limiter = VerifyLimiter::new(quota);
        for i in 0..50 {
            assert!(limiter.check(&format!("x{i}@nowhere.org")));
        }
        assert_eq!(limiter.tracked(), 50);

        std::thread::sleep(Duration::from_millis(50));
        limiter.prune();
        assert_eq!(limiter.tracked(), 0);
    }

    #[test]
    fn prune_keeps_limited_keys() {
        let limiter = VerifyLimiter::per_minute(1);
        assert!(limiter.check("busy@x.org"));
        limiter.prune();
        assert_eq!(limiter.tracked(), 1);
        assert!(!limiter.check("busy@x.org"));
    }
}
