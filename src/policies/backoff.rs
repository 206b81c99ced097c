//! # Retry delay for starved consumers.
//!
//! When a consumer finds too little of an ingredient it releases the stockpile
//! lock and waits before looking again. [`BackoffPolicy`] decides how long:
//! - [`BackoffPolicy::first`] the delay after the first failed look;
//! - [`BackoffPolicy::factor`] the multiplicative growth per further failure;
//! - [`BackoffPolicy::max`] the cap.
//!
//! The delay for retry `n` (0-indexed) is `first × factor^n`, clamped to `max`,
//! then jittered. The base is derived from `n` alone, so jitter output never feeds
//! back into later delays.
//!
//! The default is a constant 1ms poll, the cadence of the classic sleep-and-retry loop.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use pantry::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(1),
//!     max: Duration::from_millis(20),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(1));
//! assert_eq!(backoff.next(3), Duration::from_millis(8));
//! // 1ms × 2^10 → capped
//! assert_eq!(backoff.next(10), Duration::from_millis(20));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Consumer retry delay policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay after the first failed attempt.
    pub first: Duration,
    /// Upper bound on any single delay.
    pub max: Duration,
    /// Multiplicative growth factor (`1.0` = constant polling).
    pub factor: f64,
    /// Randomization applied to each delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Constant 1ms polling: `first = 1ms`, `factor = 1.0`, `max = 50ms`, no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(1),
            max: Duration::from_millis(50),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Constant delay of `every`, no jitter.
    pub fn constant(every: Duration) -> Self {
        Self {
            first: every,
            max: every,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Computes the delay before retry `attempt` (0-indexed).
    ///
    /// - `factor < 1.0` shrinks delays (unusual),
    /// - `factor == 1.0` keeps them at `first` (up to `max`),
    /// - `factor > 1.0` grows them exponentially up to `max`.
    ///
    /// Non-finite or negative intermediate values clamp to `max`.
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let raw = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !raw.is_finite() || raw < 0.0 || raw > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(raw)
        };

        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            _ => self.jitter.apply(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubling(jitter: JitterPolicy) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(2),
            max: Duration::from_millis(500),
            factor: 2.0,
            jitter,
        }
    }

    #[test]
    fn default_polls_every_millisecond() {
        let p = BackoffPolicy::default();
        for attempt in [0, 1, 7, 1_000] {
            assert_eq!(p.next(attempt), Duration::from_millis(1));
        }
    }

    #[test]
    fn doubles_until_capped() {
        let p = doubling(JitterPolicy::None);
        assert_eq!(p.next(0), Duration::from_millis(2));
        assert_eq!(p.next(1), Duration::from_millis(4));
        assert_eq!(p.next(4), Duration::from_millis(32));
        assert_eq!(p.next(8), Duration::from_millis(500));
    }

    #[test]
    fn first_above_max_is_clamped() {
        let p = BackoffPolicy {
            first: Duration::from_millis(80),
            max: Duration::from_millis(10),
            factor: 1.0,
            jitter: JitterPolicy::None,
        };
        assert_eq!(p.next(0), Duration::from_millis(10));
    }

    #[test]
    fn overflowing_exponent_clamps_to_max() {
        let p = doubling(JitterPolicy::None);
        assert_eq!(p.next(u32::MAX), Duration::from_millis(500));
    }

    #[test]
    fn constant_helper_never_grows() {
        let p = BackoffPolicy::constant(Duration::from_millis(3));
        assert_eq!(p.next(0), Duration::from_millis(3));
        assert_eq!(p.next(50), Duration::from_millis(3));
    }

    #[test]
    fn full_jitter_stays_under_base() {
        let p = doubling(JitterPolicy::Full);
        for attempt in 0..12 {
            let base = doubling(JitterPolicy::None).next(attempt);
            assert!(p.next(attempt) <= base, "attempt {attempt}");
        }
    }

    #[test]
    fn equal_jitter_keeps_at_least_half() {
        let p = doubling(JitterPolicy::Equal);
        for attempt in 0..12 {
            let base = doubling(JitterPolicy::None).next(attempt);
            let d = p.next(attempt);
            assert!(d >= base / 2 - Duration::from_millis(1), "attempt {attempt}: {d:?}");
            assert!(d <= base, "attempt {attempt}: {d:?}");
        }
    }

    #[test]
    fn decorrelated_jitter_respects_floor_and_cap() {
        let p = doubling(JitterPolicy::Decorrelated);
        for _ in 0..100 {
            let d = p.next(6);
            assert!(d >= Duration::from_millis(2));
            assert!(d <= Duration::from_millis(500));
        }
    }
}
