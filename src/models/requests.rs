use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::core::dates::{validate_range, ValidationError};
use crate::models::DateRange;

/// Query arguments for `GET /space_objects`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SpaceObjectsQuery {
    #[validate(
        required(message = "missing argument start_date"),
        length(equal = 10, message = "invalid start_date, use format yyyy-mm-dd")
    )]
    pub start_date: Option<String>,
    #[validate(
        required(message = "missing argument end_date"),
        length(equal = 10, message = "invalid end_date, use format yyyy-mm-dd")
    )]
    pub end_date: Option<String>,
}

impl SpaceObjectsQuery {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }

    /// Validate both arguments and build the requested range
    ///
    /// Violations are reported in argument order: a missing argument wins
    /// over a malformed one, and `start_date` wins over `end_date`.
    pub fn date_range(&self) -> Result<DateRange, ValidationError> {
        if let Err(errors) = self.validate() {
            return Err(self.first_violation(&errors));
        }

        match (self.start_date.as_deref(), self.end_date.as_deref()) {
            (Some(start), Some(end)) => validate_range(start, end),
            (None, _) => Err(ValidationError::MissingStartDate),
            (_, None) => Err(ValidationError::MissingEndDate),
        }
    }

    fn first_violation(&self, errors: &ValidationErrors) -> ValidationError {
        let fields = errors.field_errors();
        let is_missing = |field: &str| {
            fields
                .get(field)
                .is_some_and(|errs| errs.iter().any(|e| e.code == "required"))
        };

        if is_missing("start_date") {
            ValidationError::MissingStartDate
        } else if is_missing("end_date") {
            ValidationError::MissingEndDate
        } else if fields.contains_key("start_date") {
            ValidationError::InvalidStartDate(self.start_date.clone().unwrap_or_default())
        } else {
            ValidationError::InvalidEndDate(self.end_date.clone().unwrap_or_default())
        }
    }
}
