//! The domino tile value type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest pip count on a double-six tile.
pub const MAX_PIPS: u8 = 6;

/// Number of tiles in the double-six set.
pub const SET_SIZE: usize = 28;

/// A domino tile: an unordered pair of pip counts.
///
/// The constructor normalizes pip order, so the derived equality and hash
/// are symmetric: `Bone::new(1, 2) == Bone::new(2, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bone {
    low: u8,
    high: u8,
}

impl Bone {
    /// Create a bone from two pip counts.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPip`] if either count exceeds [`MAX_PIPS`].
    pub fn new(a: u8, b: u8) -> Result<Self, crate::Error> {
        for pips in [a, b] {
            if pips > MAX_PIPS {
                return Err(crate::Error::InvalidPip { pips });
            }
        }
        Ok(Bone {
            low: a.min(b),
            high: a.max(b),
        })
    }

    /// The smaller pip count.
    pub fn low(&self) -> u8 {
        self.low
    }

    /// The larger pip count.
    pub fn high(&self) -> u8 {
        self.high
    }

    /// Sum of the two pip counts.
    pub fn weight(&self) -> u32 {
        u32::from(self.low) + u32::from(self.high)
    }

    /// Whether either side of the bone shows the given pip count.
    pub fn has_end(&self, pips: u8) -> bool {
        self.low == pips || self.high == pips
    }

    /// The pip count opposite to `pips`.
    ///
    /// For a double both sides are equal, so the same value comes back.
    /// Meaningful only when [`has_end`](Self::has_end) holds for `pips`.
    pub fn other_end(&self, pips: u8) -> u8 {
        debug_assert!(self.has_end(pips), "bone {self} has no {pips} end");
        if self.low == pips { self.high } else { self.low }
    }

    /// The complete double-six set, in ascending order.
    pub fn all() -> Vec<Bone> {
        let mut bones = Vec::with_capacity(SET_SIZE);
        for high in 0..=MAX_PIPS {
            for low in 0..=high {
                bones.push(Bone { low, high });
            }
        }
        bones
    }
}

impl fmt::Display for Bone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}|{}]", self.low, self.high)
    }
}
