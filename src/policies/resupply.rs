//! # When a supplier is asked to restock.
//!
//! [`ResupplyPolicy`] decides which observations post to an ingredient's
//! replenishment signal and when a woken supplier actually credits.
//!
//! - [`ResupplyPolicy::OnDepletion`] (default): a debit that leaves exactly zero
//!   posts, and a starved consumer posts while the stock is zero. The supplier
//!   credits only when its stock is zero.
//! - [`ResupplyPolicy::OnShortfall`]: additionally, a starved consumer that finds
//!   a positive but insufficient quantity flags a shortfall and posts. The
//!   supplier credits when the stock is zero or a shortfall is flagged.
//!
//! Under `OnDepletion` a batch smaller than a pending request can leave the
//! stock positive and short forever (the waiting consumers never drive it to
//! zero); `OnShortfall` keeps such a pantry moving.

/// Restock trigger policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResupplyPolicy {
    /// Restock only depleted ingredients (default).
    #[default]
    OnDepletion,
    /// Also restock ingredients a consumer is waiting on.
    OnShortfall,
}

impl ResupplyPolicy {
    /// True if a starved consumer who saw `available` should post to the supplier.
    #[inline]
    pub fn wakes_on_short(&self, available: u32) -> bool {
        available == 0 || matches!(self, ResupplyPolicy::OnShortfall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depletion_only_wakes_on_empty_stock() {
        assert!(ResupplyPolicy::OnDepletion.wakes_on_short(0));
        assert!(!ResupplyPolicy::OnDepletion.wakes_on_short(2));
        assert!(ResupplyPolicy::OnShortfall.wakes_on_short(2));
    }
}
