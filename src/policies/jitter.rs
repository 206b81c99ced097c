//! # Jitter for retry delays.
//!
//! Many consumers starved on the same ingredient would otherwise re-check the
//! stockpile in lock-step and contend for the mutex together. [`JitterPolicy`]
//! spreads them out:
//!
//! - [`JitterPolicy::None`] exact delay
//! - [`JitterPolicy::Full`] random in `[0, delay]`
//! - [`JitterPolicy::Equal`] `delay/2 + random[0, delay/2]`
//! - [`JitterPolicy::Decorrelated`] random in `[base, prev * 3]`, capped

use rand::Rng;
use std::time::Duration;

/// Randomization strategy applied to each backoff delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Use the computed delay as is.
    #[default]
    None,
    /// Uniform in `[0, delay]`.
    Full,
    /// Half the delay plus uniform in `[0, delay/2]`.
    Equal,
    /// Uniform in `[base, prev * 3]`, capped at `max`.
    ///
    /// Needs context; see [`apply_decorrelated`](Self::apply_decorrelated).
    Decorrelated,
}

impl JitterPolicy {
    /// Applies jitter to `delay`.
    ///
    /// `Decorrelated` returns `delay` unchanged here.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None | JitterPolicy::Decorrelated => delay,
            JitterPolicy::Full => full(delay),
            JitterPolicy::Equal => equal(delay),
        }
    }

    /// Decorrelated jitter with its context; other policies fall back to `apply(prev)`.
    pub fn apply_decorrelated(&self, base: Duration, prev: Duration, max: Duration) -> Duration {
        if !matches!(self, JitterPolicy::Decorrelated) {
            return self.apply(prev);
        }

        let base_us = base.as_micros() as u64;
        let max_us = max.as_micros() as u64;
        let upper = (prev.as_micros() as u64).saturating_mul(3).min(max_us).max(base_us);
        if base_us >= upper {
            return base;
        }
        Duration::from_micros(rand::rng().random_range(base_us..=upper))
    }
}

fn full(delay: Duration) -> Duration {
    let us = delay.as_micros() as u64;
    if us == 0 {
        return Duration::ZERO;
    }
    Duration::from_micros(rand::rng().random_range(0..=us))
}

fn equal(delay: Duration) -> Duration {
    let us = delay.as_micros() as u64;
    let half = us / 2;
    if half == 0 {
        return delay;
    }
    Duration::from_micros(half + rand::rng().random_range(0..=half))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let d = Duration::from_millis(7);
        assert_eq!(JitterPolicy::None.apply(d), d);
        assert_eq!(JitterPolicy::default(), JitterPolicy::None);
    }

    #[test]
    fn zero_delay_stays_zero() {
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
        assert_eq!(JitterPolicy::Equal.apply(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn equal_is_within_upper_half() {
        let d = Duration::from_millis(10);
        for _ in 0..200 {
            let j = JitterPolicy::Equal.apply(d);
            assert!(j >= Duration::from_millis(5) && j <= d, "{j:?}");
        }
    }

    #[test]
    fn decorrelated_falls_back_for_other_policies() {
        let prev = Duration::from_millis(4);
        let j = JitterPolicy::None.apply_decorrelated(Duration::from_millis(1), prev, Duration::from_secs(1));
        assert_eq!(j, prev);
    }
}
