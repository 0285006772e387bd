use chrono::Duration;

use crate::models::{DateRange, SpanLimits};

/// Result of splitting a requested range into upstream queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Contiguous, non-overlapping sub-ranges in chronological order
    pub sub_ranges: Vec<DateRange>,
    /// Range actually covered after applying the span cap
    pub effective: DateRange,
    /// Whether the requested range was longer than the cap
    pub truncated: bool,
}

/// Split a validated range into sub-ranges no longer than the per-request limit
///
/// The total span is capped at `max_total_span_days` past the start date.
/// Anything beyond the cap is cut off without an error; callers see it via
/// [`Partition::truncated`]. A range whose span fits in one request is
/// returned as a single sub-range.
///
/// # Arguments
/// * `range` - Validated range with `end >= start`
/// * `limits` - Per-request and total span limits
pub fn partition(range: DateRange, limits: SpanLimits) -> Partition {
    let requested = range.span_days().max(0);
    let span = requested.min(i64::from(limits.max_total_span_days));
    let hard_end = range.start + Duration::days(span);
    let effective = DateRange::new(range.start, hard_end);
    let limit = i64::from(limits.max_days_per_request.max(1));

    let sub_ranges = if span <= limit {
        vec![effective]
    } else {
        let mut sub_ranges = Vec::with_capacity((span / limit + 1) as usize);
        let mut cursor = range.start;
        while cursor <= hard_end {
            let end = (cursor + Duration::days(limit - 1)).min(hard_end);
            sub_ranges.push(DateRange::new(cursor, end));
            cursor += Duration::days(limit);
        }
        sub_ranges
    };

    Partition {
        sub_ranges,
        effective,
        truncated: span < requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(date(start), date(end))
    }

    #[test]
    fn test_single_day() {
        let result = partition(range("2023-01-01", "2023-01-01"), SpanLimits::default());
        assert_eq!(result.sub_ranges, vec![range("2023-01-01", "2023-01-01")]);
        assert!(!result.truncated);
    }

    #[test]
    fn test_span_of_limit_stays_single() {
        // end - start == 7 still fits one NeoWs query
        let result = partition(range("2023-01-01", "2023-01-08"), SpanLimits::default());
        assert_eq!(result.sub_ranges, vec![range("2023-01-01", "2023-01-08")]);
    }

    #[test]
    fn test_three_weeks() {
        let result = partition(range("2023-01-01", "2023-01-20"), SpanLimits::default());
        assert_eq!(
            result.sub_ranges,
            vec![
                range("2023-01-01", "2023-01-07"),
                range("2023-01-08", "2023-01-14"),
                range("2023-01-15", "2023-01-20"),
            ]
        );
    }

    #[test]
    fn test_last_sub_range_single_day() {
        let result = partition(range("2023-01-01", "2023-01-15"), SpanLimits::default());
        assert_eq!(result.sub_ranges.len(), 3);
        assert_eq!(result.sub_ranges[2], range("2023-01-15", "2023-01-15"));
    }

    #[test]
    fn test_truncated_to_cap() {
        let result = partition(range("2020-01-01", "2023-01-01"), SpanLimits::default());
        assert!(result.truncated);
        assert_eq!(result.effective, range("2020-01-01", "2020-12-31"));
        assert_eq!(result.sub_ranges.first().unwrap().start, date("2020-01-01"));
        assert_eq!(result.sub_ranges.last().unwrap().end, date("2020-12-31"));
        assert_eq!(result.sub_ranges.len(), 53);
    }

    #[test]
    fn test_custom_limits() {
        let limits = SpanLimits {
            max_days_per_request: 3,
            max_total_span_days: 5,
        };
        let result = partition(range("2023-03-01", "2023-03-31"), limits);
        assert_eq!(
            result.sub_ranges,
            vec![range("2023-03-01", "2023-03-03"), range("2023-03-04", "2023-03-06")]
        );
        assert!(result.truncated);
    }
}
