//! Operation inputs and their validation.
//!
//! Request structs arrive loosely typed (dates as strings, required fields possibly
//! blank) and are turned into checked values here before any row is touched.

use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// Input for creating a plan. `parent_plan` links the new plan under an existing one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    /// Plan title, required
    pub title: String,
    /// Optional body text; blank text is stored as `NULL`
    #[serde(default)]
    pub text: Option<String>,
    /// Start timestamp (`2024-01-01` or RFC 3339)
    pub start_date: String,
    /// End timestamp (`2024-01-07` or RFC 3339)
    pub end_date: String,
    /// Initial completion flag, defaults to `false`
    #[serde(default)]
    pub done: Option<bool>,
    /// Display color, required
    pub color: String,
    /// Id of the parent plan, if this is a child
    #[serde(default)]
    pub parent_plan: Option<i64>,
}

/// Input for updating a plan's title and color, cascading the color to its children.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateParentPlanRequest {
    /// Plan to update
    pub id: i64,
    /// New color, also applied to every child
    pub color: String,
    /// New title
    pub title: String,
    /// New text; left untouched when absent
    #[serde(default)]
    pub text: Option<String>,
}

/// Input for moving a plan under a (possibly different) parent.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChildPlanRequest {
    /// Plan to update
    pub id: i64,
    /// Id of the parent to attach to
    pub parent: i64,
    /// New title
    pub title: String,
    /// New text; left untouched when absent
    #[serde(default)]
    pub text: Option<String>,
}

/// Raw `[start_date, end_date]` bounds as received from a caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// Inclusive lower bound on a plan's start date
    #[serde(default)]
    pub start_date: Option<String>,
    /// Inclusive upper bound on a plan's start date
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Checked, inclusive timestamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Lower bound
    pub start: DateTime<Utc>,
    /// Upper bound
    pub end: DateTime<Utc>,
}

/// Field values for a new plan after validation, parent not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlan {
    /// Plan title
    pub title: String,
    /// Optional body text
    pub text: Option<String>,
    /// Start timestamp
    pub start_date: DateTime<Utc>,
    /// End timestamp
    pub end_date: DateTime<Utc>,
    /// Completion flag
    pub done: bool,
    /// Display color
    pub color: String,
    /// Parent plan id
    pub parent_plan_id: Option<i64>,
}

impl DateRangeQuery {
    /// Builds a query from two bounds.
    #[must_use]
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }

    /// Both bounds are required and must parse as timestamps.
    pub fn parse(&self) -> Result<DateRange> {
        let (Some(start), Some(end)) = (
            non_blank(self.start_date.as_deref()),
            non_blank(self.end_date.as_deref()),
        ) else {
            return Err(Error::bad_request("startDate and endDate are required"));
        };

        Ok(DateRange {
            start: parse_timestamp(start)?,
            end: parse_timestamp(end)?,
        })
    }
}

impl CreatePlanRequest {
    /// Checks required fields and parses the dates.
    pub fn validate(&self) -> Result<NewPlan> {
        let title = non_blank(Some(self.title.as_str()));
        let color = non_blank(Some(self.color.as_str()));
        let start = non_blank(Some(self.start_date.as_str()));
        let end = non_blank(Some(self.end_date.as_str()));

        let (Some(title), Some(color), Some(start), Some(end)) = (title, color, start, end) else {
            return Err(Error::bad_request(
                "title, startDate, endDate and color are required",
            ));
        };

        Ok(NewPlan {
            title: title.to_string(),
            text: self
                .text
                .as_deref()
                .and_then(|text| non_blank(Some(text)))
                .map(str::to_string),
            start_date: parse_timestamp(start)?,
            end_date: parse_timestamp(end)?,
            done: self.done.unwrap_or(false),
            color: color.to_string(),
            parent_plan_id: self.parent_plan,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a timestamp given as RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.
///
/// Values without an offset are read as UTC; a bare date means midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| Error::bad_request(format!("Invalid timestamp: {value}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::TimeZone;

    fn create_request() -> CreatePlanRequest {
        CreatePlanRequest {
            title: "Study".to_string(),
            text: None,
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-07".to_string(),
            done: None,
            color: "#FF5733".to_string(),
            parent_plan: None,
        }
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-05").unwrap(), midnight);

        let nine = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-05T09:00:00.000Z").unwrap(), nine);
        assert_eq!(parse_timestamp("2024-01-05T18:00:00+09:00").unwrap(), nine);
        assert_eq!(parse_timestamp("2024-01-05 09:00:00").unwrap(), nine);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("next tuesday").unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_date_range_requires_both_bounds() {
        let missing_end = DateRangeQuery {
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        };
        assert!(missing_end.parse().unwrap_err().is_bad_request());

        let blank_start = DateRangeQuery::new("  ", "2024-01-31");
        assert!(blank_start.parse().unwrap_err().is_bad_request());

        assert!(DateRangeQuery::default().parse().unwrap_err().is_bad_request());
    }

    #[test]
    fn test_date_range_parses() {
        let range = DateRangeQuery::new("2024-01-01", "2024-01-31").parse().unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_date_range_does_not_check_ordering() {
        let range = DateRangeQuery::new("2024-02-01", "2024-01-01").parse().unwrap();
        assert!(range.start > range.end);
    }

    #[test]
    fn test_create_validation_defaults() {
        let new_plan = create_request().validate().unwrap();
        assert_eq!(new_plan.title, "Study");
        assert!(!new_plan.done);
        assert_eq!(new_plan.text, None);
        assert_eq!(new_plan.parent_plan_id, None);
    }

    #[test]
    fn test_create_validation_blank_text_is_none() {
        let request = CreatePlanRequest {
            text: Some("   ".to_string()),
            ..create_request()
        };
        assert_eq!(request.validate().unwrap().text, None);
    }

    #[test]
    fn test_create_validation_missing_fields() {
        for request in [
            CreatePlanRequest {
                title: String::new(),
                ..create_request()
            },
            CreatePlanRequest {
                color: " ".to_string(),
                ..create_request()
            },
            CreatePlanRequest {
                start_date: String::new(),
                ..create_request()
            },
            CreatePlanRequest {
                end_date: "not a date".to_string(),
                ..create_request()
            },
        ] {
            assert!(request.validate().unwrap_err().is_bad_request());
        }
    }

    #[test]
    fn test_create_request_from_camel_case() {
        let request: CreatePlanRequest = toml::from_str(
            r##"
                title = "Read"
                startDate = "2024-01-01"
                endDate = "2024-01-02"
                color = "#123456"
                parentPlan = 3
            "##,
        )
        .unwrap();
        assert_eq!(request.parent_plan, Some(3));
        assert_eq!(request.done, None);
    }
}
