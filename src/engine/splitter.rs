//! Integer remainder splitter.
//!
//! Divides an integer amount among `n` ordered peers as evenly as possible.
//! Every peer gets `amount / n`; the first `amount % n` peers in list order
//! get one extra unit. This is the only rounding rule in the crate.
//!
//! ```
//! use spread_matcher::engine::splitter::split;
//! use spread_matcher::types::Volume;
//!
//! let parts = split(Volume::new(149), 2);
//! assert_eq!(parts, vec![Volume::new(75), Volume::new(74)]);
//! ```

use crate::types::Volume;

/// Split `amount` into `peers` parts.
///
/// Returns an empty vector when `peers == 0`.
pub fn split(amount: Volume, peers: usize) -> Vec<Volume> {
    if peers == 0 {
        return Vec::new();
    }
    let (base, extra) = quotient(amount, peers);
    (0..peers)
        .map(|i| if (i as u128) < extra { Volume::new(base + 1) } else { Volume::new(base) })
        .collect()
}

/// The smallest part `split` would hand out: `amount / peers`.
///
/// Returns `amount` unchanged when `peers == 0`.
#[inline]
pub fn floor_share(amount: Volume, peers: usize) -> Volume {
    if peers == 0 {
        return amount;
    }
    Volume::new(quotient(amount, peers).0)
}

#[inline]
fn quotient(amount: Volume, peers: usize) -> (u128, u128) {
    let n = peers as u128;
    (amount.get() / n, amount.get() % n)
}
