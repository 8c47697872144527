//! Numeric ranges for revenue and quantity bucketing
//!
//! A partition is a sequence of closed integer ranges where
//! `ranges[i + 1].min == ranges[i].max + 1`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed numeric bucket `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Range partition errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("Range {index} is inverted: min {min} > max {max}")]
    Inverted { index: usize, min: f64, max: f64 },

    #[error("Gap or overlap between range {index} (max {max}) and the next (min {next_min})")]
    NotContiguous { index: usize, max: f64, next_min: f64 },

    #[error("Bucket count must be > 0")]
    ZeroBuckets,

    #[error("Invalid span: {min} to {max}")]
    InvalidSpan { min: f64, max: f64 },
}

/// Build `count` contiguous integer ranges covering `[floor(min), ceil(max)]`.
///
/// Widths are spread as evenly as possible; if the span holds fewer integers
/// than `count`, fewer ranges are returned (one per integer).
pub fn partition_ranges(min: f64, max: f64, count: usize) -> Result<Vec<Range>, RangeError> {
    if count == 0 {
        return Err(RangeError::ZeroBuckets);
    }
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(RangeError::InvalidSpan { min, max });
    }

    let (lo, hi) = (min.floor(), max.ceil());
    if lo < i64::MIN as f64 || hi >= i64::MAX as f64 {
        return Err(RangeError::InvalidSpan { min, max });
    }
    let (lo, hi) = (lo as i64, hi as i64);
    let integers = hi
        .checked_sub(lo)
        .and_then(|span| span.checked_add(1))
        .ok_or(RangeError::InvalidSpan { min, max })? as u64;
    let buckets = (count as u64).min(integers);

    let base = integers / buckets;
    let extra = integers % buckets;

    let mut ranges = Vec::with_capacity(buckets as usize);
    let mut start = lo;
    for i in 0..buckets {
        let width = base + u64::from(i < extra);
        let end = start + width as i64 - 1;
        ranges.push(Range::new(start as f64, end as f64));
        start = end + 1;
    }

    Ok(ranges)
}

/// Check that ranges form a contiguous integer partition
pub fn validate_partition(ranges: &[Range]) -> Result<(), RangeError> {
    for (index, range) in ranges.iter().enumerate() {
        if range.min > range.max {
            return Err(RangeError::Inverted {
                index,
                min: range.min,
                max: range.max,
            });
        }
    }

    for (index, pair) in ranges.windows(2).enumerate() {
        if pair[1].min != pair[0].max + 1.0 {
            return Err(RangeError::NotContiguous {
                index,
                max: pair[0].max,
                next_min: pair[1].min,
            });
        }
    }

    Ok(())
}

/// Index of the range holding `value`.
///
/// Values in the gap between `max` and the next `min` (e.g. 10.5 between
/// 0-10 and 11-20) go to the lower range, so every value in the partition's
/// span is counted exactly once.
pub fn locate(ranges: &[Range], value: f64) -> Option<usize> {
    let first = ranges.first()?;
    let last = ranges.last()?;
    if value < first.min || value > last.max {
        return None;
    }
    ranges
        .iter()
        .rposition(|range| value >= range.min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_even_split() {
        let ranges = partition_ranges(0.0, 99.0, 4).unwrap();
        assert_eq!(
            ranges,
            vec![
                Range::new(0.0, 24.0),
                Range::new(25.0, 49.0),
                Range::new(50.0, 74.0),
                Range::new(75.0, 99.0),
            ]
        );
        assert!(validate_partition(&ranges).is_ok());
    }

    #[test]
    fn test_partition_uneven_split_is_contiguous() {
        let ranges = partition_ranges(3.2, 47.9, 7).unwrap();
        assert_eq!(ranges.len(), 7);
        assert_eq!(ranges[0].min, 3.0);
        assert_eq!(ranges[6].max, 48.0);
        assert!(validate_partition(&ranges).is_ok());
    }

    #[test]
    fn test_partition_narrow_span() {
        let ranges = partition_ranges(5.0, 7.0, 10).unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[1], Range::new(6.0, 6.0));
    }

    #[test]
    fn test_partition_rejects_bad_input() {
        assert_eq!(partition_ranges(0.0, 1.0, 0), Err(RangeError::ZeroBuckets));
        assert!(partition_ranges(5.0, 1.0, 3).is_err());
        assert!(partition_ranges(f64::NAN, 1.0, 3).is_err());
    }

    #[test]
    fn test_partition_rejects_span_wider_than_integers() {
        assert_eq!(
            partition_ranges(-1e19, 1e19, 10),
            Err(RangeError::InvalidSpan { min: -1e19, max: 1e19 })
        );
        assert!(partition_ranges(1e19, 1e19, 10).is_err());
        assert!(partition_ranges(-9.2e18, 9.2e18, 10).is_err());
    }

    #[test]
    fn test_partition_wide_span_that_fits() {
        let ranges = partition_ranges(-1e18, 1e18, 10).unwrap();
        assert_eq!(ranges.len(), 10);
        assert_eq!(ranges[0].min, -1e18);
        assert_eq!(ranges[9].max, 1e18);
    }

    #[test]
    fn test_validate_detects_gap_and_overlap() {
        let gap = [Range::new(0.0, 10.0), Range::new(12.0, 20.0)];
        assert!(matches!(
            validate_partition(&gap),
            Err(RangeError::NotContiguous { index: 0, .. })
        ));

        let overlap = [Range::new(0.0, 10.0), Range::new(10.0, 20.0)];
        assert!(validate_partition(&overlap).is_err());

        let inverted = [Range::new(5.0, 1.0)];
        assert!(matches!(
            validate_partition(&inverted),
            Err(RangeError::Inverted { .. })
        ));
    }

    #[test]
    fn test_locate() {
        let ranges = [Range::new(0.0, 10.0), Range::new(11.0, 20.0)];
        assert_eq!(locate(&ranges, 0.0), Some(0));
        assert_eq!(locate(&ranges, 10.0), Some(0));
        assert_eq!(locate(&ranges, 10.5), Some(0));
        assert_eq!(locate(&ranges, 11.0), Some(1));
        assert_eq!(locate(&ranges, 20.0), Some(1));
        assert_eq!(locate(&ranges, 20.5), None);
        assert_eq!(locate(&ranges, -1.0), None);
        assert_eq!(locate(&[], 1.0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Range::new(1.0, 1.0).to_string(), "1");
        assert_eq!(Range::new(2.0, 3.0).to_string(), "2-3");
    }
}
