use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Inclusive calendar date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Days between `start` and `end` (0 for a single-day range)
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Calendar days covered, both ends included
    pub fn day_count(&self) -> i64 {
        self.span_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One NeoWs feed response, keyed by calendar day (`YYYY-MM-DD`)
///
/// Day keys sort lexically in chronological order, so iterating the map
/// yields days in ascending order regardless of upstream key order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_count: Option<u64>,
    #[serde(deserialize_with = "deserialize_days")]
    pub near_earth_objects: BTreeMap<String, Vec<NearEarthObject>>,
}

/// Near-earth object record as returned by NeoWs
///
/// Only the fields the service projects are kept; everything else in the
/// upstream record is dropped during deserialization. An entry that does not
/// fit this shape still deserializes, with an empty `name` or no close
/// approaches, so ranking can apply the data-shape policy to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearEarthObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub estimated_diameter: Value,
    #[serde(default, deserialize_with = "deserialize_approaches")]
    pub close_approach_data: Vec<CloseApproach>,
}

impl NearEarthObject {
    /// Read one upstream entry, falling back to an empty record when it is malformed
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::debug!("Malformed NeoWs entry: {}", e);
            Self::default()
        })
    }
}

/// Day lists are read entry by entry; a `null` day holds no entries
fn deserialize_days<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<NearEarthObject>>, D::Error>
where
    D: Deserializer<'de>,
{
    let days = BTreeMap::<String, Option<Vec<Value>>>::deserialize(deserializer)?;

    Ok(days
        .into_iter()
        .map(|(day, entries)| {
            let entries = entries
                .unwrap_or_default()
                .into_iter()
                .map(NearEarthObject::from_value)
                .collect();
            (day, entries)
        })
        .collect())
}

/// Anything but an array reads as no close approaches; malformed elements read as empty records
fn deserialize_approaches<'de, D>(deserializer: D) -> Result<Vec<CloseApproach>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(vec![]);
    };

    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Close approach record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseApproach {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_approach_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_approach_date_full: Option<String>,
    /// Distance in every unit NeoWs reports (astronomical, lunar, kilometers, miles).
    /// Values arrive as decimal strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miss_distance: Option<Value>,
}

/// Space object returned to callers, ordered by miss distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceObject {
    pub name: String,
    pub size_estimate: Value,
    pub closest_encounter_time: String,
    pub closest_encounter_distance: Value,
}

/// Limits applied when splitting a date range into upstream queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanLimits {
    /// Longest sub-range sent in one upstream request, in days
    pub max_days_per_request: u32,
    /// Longest total span served, in days past the start date
    pub max_total_span_days: u32,
}

impl Default for SpanLimits {
    fn default() -> Self {
        Self {
            max_days_per_request: 7,
            max_total_span_days: 365,
        }
    }
}

/// What to do with an upstream entry that has no usable miss distance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataShapePolicy {
    /// Leave the entry out and count it
    #[default]
    Drop,
    /// Fail the whole request
    Fail,
}
