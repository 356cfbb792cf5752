//! Card ranks on the 13-value ring.
//!
//! Ranks run 1..=13 and wrap: 13 and 1 are neighbours. Two ranks are
//! adjacent when their cyclic distance is exactly 1.

use serde::{Deserialize, Serialize};

/// A card rank in `1..=13`.
///
/// ```
/// use peak_balance::cards::Rank;
///
/// let king = Rank::new(13).unwrap();
/// let ace = Rank::new(1).unwrap();
/// assert!(king.is_adjacent(ace));
/// assert_eq!(king.cyclic_distance(Rank::new(2).unwrap()), 2);
/// assert!(Rank::new(0).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 13;
    /// Number of distinct ranks.
    pub const COUNT: usize = 13;

    /// Create a rank, returning `None` outside `1..=13`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a rank from a value the caller guarantees is in range.
    pub(crate) const fn new_unchecked(value: u8) -> Self {
        debug_assert!(value >= Self::MIN && value <= Self::MAX);
        Self(value)
    }

    /// Create a rank from a wide integer, returning `None` when out of range.
    #[must_use]
    pub fn from_i64(value: i64) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::new)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Distance around the ring, in `0..=6`.
    #[must_use]
    pub fn cyclic_distance(self, other: Rank) -> u8 {
        let diff = self.0.abs_diff(other.0);
        diff.min(Self::COUNT as u8 - diff)
    }

    /// True if the ranks are one step apart on the ring.
    #[must_use]
    pub fn is_adjacent(self, other: Rank) -> bool {
        self.cyclic_distance(other) == 1
    }

    /// The two ring neighbours, lower first.
    #[must_use]
    pub fn neighbors(self) -> [Rank; 2] {
        let down = if self.0 == Self::MIN { Self::MAX } else { self.0 - 1 };
        let up = if self.0 == Self::MAX { Self::MIN } else { self.0 + 1 };
        [Self(down), Self(up)]
    }

    /// Iterate over every rank in ascending order.
    pub fn all() -> impl Iterator<Item = Rank> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Zero-based index, for per-rank tables.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::new(value).ok_or_else(|| format!("rank {value} is outside 1..=13"))
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.0
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            1 => write!(f, "A"),
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            n => write!(f, "{n}"),
        }
    }
}
