//! Page range comparison
//!
//! Page ranges are written `"N"` or `"N-M"`. Bounds are page *labels*, which
//! are usually numbers but may be anything the document uses (e.g. `"iv"`).

use serde::{Deserialize, Serialize};

/// How two page ranges relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeOverlap {
    /// The ranges share at least one page
    Overlap,
    /// The ranges are disjoint
    NoOverlap,
    /// The labels could not be compared
    Unknown,
}

/// A parsed `start-end` page range with trimmed labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

impl<'a> PageRange<'a> {
    /// Parse `"N"` or `"N-M"`. Returns `None` if either side is empty.
    pub fn parse(range: &'a str) -> Option<Self> {
        let (start, end) = match range.split_once('-') {
            Some((start, end)) => (start.trim(), end.trim()),
            None => (range.trim(), range.trim()),
        };
        if start.is_empty() || end.is_empty() {
            return None;
        }
        Some(Self { start, end })
    }

    fn numeric(&self) -> Option<(i64, i64)> {
        Some((self.start.parse().ok()?, self.end.parse().ok()?))
    }
}

/// Compare two page ranges.
///
/// Identical ranges overlap regardless of what their labels look like.
/// Otherwise both ranges must be numeric; inclusive intervals that
/// intersect give [`RangeOverlap::Overlap`].
pub fn page_range_overlap(range_a: &str, range_b: &str) -> RangeOverlap {
    let (Some(a), Some(b)) = (PageRange::parse(range_a), PageRange::parse(range_b)) else {
        return RangeOverlap::Unknown;
    };

    if a == b {
        return RangeOverlap::Overlap;
    }

    match (a.numeric(), b.numeric()) {
        (Some((start_a, end_a)), Some((start_b, end_b))) => {
            if start_a <= end_b && start_b <= end_a {
                RangeOverlap::Overlap
            } else {
                RangeOverlap::NoOverlap
            }
        }
        _ => RangeOverlap::Unknown,
    }
}
