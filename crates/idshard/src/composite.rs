use crate::DigitGroup;
use core::fmt;

/// Positional weight of the leading segment.
pub const FIRST_WEIGHT: u32 = 1_000_000;

/// Positional weight of the middle segment.
pub const MIDDLE_WEIGHT: u32 = 1_000;

/// Bytes occupied by one serialized ID (native byte order).
pub const COMPOSITE_ID_SIZE: usize = core::mem::size_of::<u32>();

/// Exclusive upper bound of any composite value.
pub const COMPOSITE_ID_LIMIT: u32 = 1_000 * FIRST_WEIGHT;

/// A 9-digit identifier built from three 3-digit segments.
///
/// ```text
///  id = first * 1_000_000 + middle * 1_000 + last
/// ```
///
/// Each segment must be below 1000 for the encoding to be reversible; the
/// digit groups guarantee this by construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct CompositeId(u32);

impl CompositeId {
    #[inline]
    pub const fn from_parts(first: u32, middle: u32, last: u32) -> Self {
        debug_assert!(first < 1_000 && middle < 1_000 && last < 1_000);
        Self(first * FIRST_WEIGHT + middle * MIDDLE_WEIGHT + last)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn first(self) -> u32 {
        self.0 / FIRST_WEIGHT
    }

    #[inline]
    pub const fn middle(self) -> u32 {
        (self.0 / MIDDLE_WEIGHT) % 1_000
    }

    #[inline]
    pub const fn last(self) -> u32 {
        self.0 % 1_000
    }

    /// Splits the ID back into `(first, middle, last)`.
    #[inline]
    pub const fn parts(self) -> (u32, u32, u32) {
        (self.first(), self.middle(), self.last())
    }

    /// Returns `true` if the leading segment belongs to `first` and the other
    /// two both belong to `rest`.
    pub fn is_well_formed(self, first: &DigitGroup, rest: &DigitGroup) -> bool {
        self.0 < COMPOSITE_ID_LIMIT
            && first.contains(self.first())
            && rest.contains(self.middle())
            && rest.contains(self.last())
    }
}

impl From<CompositeId> for u32 {
    fn from(id: CompositeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:09}", self.0)
    }
}
