use core::ops::Range;

/// Digit triples that never appear in any segment of a composite ID.
pub const BLACKLIST: [u32; 8] = [111, 222, 333, 444, 555, 666, 777, 888];

/// Range of the leading segment. The hundreds place is never zero.
pub const FIRST_RANGE: Range<u32> = 100..999;

/// Range shared by the middle and trailing segments.
pub const REST_RANGE: Range<u32> = 1..999;

/// Exclusive upper bound of any segment value. A segment occupies three
/// decimal digits of the composite.
pub const SEGMENT_LIMIT: u32 = 1_000;

/// Returns `true` if `value` is not blacklisted.
///
/// The same blacklist applies to all three segments regardless of their
/// range.
#[inline]
pub fn is_permitted(value: u32) -> bool {
    !BLACKLIST.contains(&value)
}

/// An ascending, immutable sequence of permitted values for one ID segment.
///
/// The middle and trailing segments share a single `DigitGroup`: callers bind
/// it once and iterate it in both roles rather than building a second copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitGroup {
    values: Box<[u32]>,
}

impl DigitGroup {
    /// Collects every value in `range` that is not blacklisted, in ascending
    /// order.
    ///
    /// The range is clamped to `[0, SEGMENT_LIMIT)`: values with more than
    /// three digits cannot be encoded in a composite and are never included.
    ///
    /// # Example
    ///
    /// ```
    /// use idshard::DigitGroup;
    ///
    /// let group = DigitGroup::from_range(100..115);
    /// assert_eq!(group.len(), 14);
    /// assert!(!group.contains(111));
    /// ```
    pub fn from_range(range: Range<u32>) -> Self {
        Self {
            values: (range.start..range.end.min(SEGMENT_LIMIT))
                .filter(|&v| is_permitted(v))
                .collect(),
        }
    }

    /// The leading segment, `[100, 999)` minus the blacklist.
    pub fn first() -> Self {
        Self::from_range(FIRST_RANGE)
    }

    /// The middle/trailing segment, `[1, 999)` minus the blacklist.
    pub fn rest() -> Self {
        Self::from_range(REST_RANGE)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        self.values.iter().copied()
    }

    /// Binary search; the sequence is sorted by construction.
    pub fn contains(&self, value: u32) -> bool {
        self.values.binary_search(&value).is_ok()
    }
}
