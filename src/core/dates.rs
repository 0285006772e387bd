use chrono::NaiveDate;
use thiserror::Error;

use crate::models::DateRange;

/// Date format accepted on input and sent upstream
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejected date arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing argument start_date")]
    MissingStartDate,

    #[error("missing argument end_date")]
    MissingEndDate,

    #[error("invalid start_date")]
    InvalidStartDate(String),

    #[error("invalid end_date")]
    InvalidEndDate(String),

    #[error("end_date before start_date")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl ValidationError {
    /// Human-readable explanation for the error response body
    pub fn detail(&self) -> String {
        match self {
            Self::MissingStartDate => "start_date is required, use format yyyy-mm-dd".to_string(),
            Self::MissingEndDate => "end_date is required, use format yyyy-mm-dd".to_string(),
            Self::InvalidStartDate(value) => {
                format!("start_date '{}' is not a calendar date in format yyyy-mm-dd", value)
            }
            Self::InvalidEndDate(value) => {
                format!("end_date '{}' is not a calendar date in format yyyy-mm-dd", value)
            }
            Self::EndBeforeStart { start, end } => {
                format!("end_date {} is before start_date {}", end, start)
            }
        }
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date
///
/// Zero padding is required and the date must exist on the calendar, so
/// `2023-02-30` and `2023-13-01` are both rejected.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Validate a start/end pair and build the requested range
pub fn validate_range(start_date: &str, end_date: &str) -> Result<DateRange, ValidationError> {
    let start = parse_date(start_date)
        .ok_or_else(|| ValidationError::InvalidStartDate(start_date.to_string()))?;
    let end = parse_date(end_date)
        .ok_or_else(|| ValidationError::InvalidEndDate(end_date.to_string()))?;

    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }

    Ok(DateRange::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_calendar_validity() {
        assert!(parse_date("2024-02-29").is_some());
        assert!(parse_date("2023-02-29").is_none());
        assert!(parse_date("2023-02-30").is_none());
        assert!(parse_date("2023-13-01").is_none());
        assert!(parse_date("2023-00-10").is_none());
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("2023/01/01").is_none());
        assert!(parse_date("01-01-2023").is_none());
        assert!(parse_date("2023-1-1").is_none());
        assert!(parse_date("").is_none());
        assert!(parse_date("not-a-date").is_none());
    }

    #[test]
    fn test_validate_range_checks_start_first() {
        assert_eq!(
            validate_range("2023-02-30", "garbage"),
            Err(ValidationError::InvalidStartDate("2023-02-30".to_string()))
        );
        assert_eq!(
            validate_range("2023-01-01", "2023-13-01"),
            Err(ValidationError::InvalidEndDate("2023-13-01".to_string()))
        );
    }

    #[test]
    fn test_validate_range_inverted() {
        let err = validate_range("2023-01-10", "2023-01-09").unwrap_err();
        assert!(matches!(err, ValidationError::EndBeforeStart { .. }));
        assert_eq!(err.to_string(), "end_date before start_date");
    }

    #[test]
    fn test_validate_range_zero_span() {
        let range = validate_range("2023-01-01", "2023-01-01").unwrap();
        assert_eq!(range.span_days(), 0);
        assert_eq!(range.day_count(), 1);
    }
}
