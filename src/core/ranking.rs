use serde_json::Value;
use thiserror::Error;

use crate::models::{DataShapePolicy, NearEarthObject, SpaceObject};

/// Upstream entry that cannot be placed in the ranking
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataShapeError {
    #[error("entry without a name")]
    MissingName,

    #[error("{name}: no close approach data")]
    MissingCloseApproach { name: String },

    #[error("{name}: no miss distance")]
    MissingMissDistance { name: String },

    #[error("{name}: miss distance in kilometers is not a finite number: {value}")]
    InvalidKilometers { name: String, value: String },

    #[error("{name}: no close approach date")]
    MissingEncounterTime { name: String },
}

/// Ranked space objects
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub objects: Vec<SpaceObject>,
    /// Entries left out under [`DataShapePolicy::Drop`]
    pub dropped: usize,
}

/// Parse a miss distance value, sent upstream as a decimal string
fn parse_kilometers(value: &Value) -> Option<f64> {
    let km = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    km.filter(|km| km.is_finite())
}

/// Project an entry to its sort key and externally visible shape
///
/// The encounter time is the full-precision `close_approach_date_full`
/// when present, otherwise the short `close_approach_date`. The whole
/// `miss_distance` structure is kept, in every unit.
pub fn project(entry: NearEarthObject) -> Result<(f64, SpaceObject), DataShapeError> {
    let NearEarthObject {
        name,
        estimated_diameter,
        close_approach_data,
    } = entry;

    if name.is_empty() {
        return Err(DataShapeError::MissingName);
    }

    let Some(approach) = close_approach_data.into_iter().next() else {
        return Err(DataShapeError::MissingCloseApproach { name });
    };

    let Some(miss_distance) = approach.miss_distance else {
        return Err(DataShapeError::MissingMissDistance { name });
    };

    let km_value = miss_distance.get("kilometers");
    let Some(km) = km_value.and_then(parse_kilometers) else {
        let value = km_value.map_or_else(|| "missing".to_string(), Value::to_string);
        return Err(DataShapeError::InvalidKilometers { name, value });
    };

    let Some(closest_encounter_time) = approach
        .close_approach_date_full
        .or(approach.close_approach_date)
    else {
        return Err(DataShapeError::MissingEncounterTime { name });
    };

    Ok((
        km,
        SpaceObject {
            name,
            size_estimate: estimated_diameter,
            closest_encounter_time,
            closest_encounter_distance: miss_distance,
        },
    ))
}

/// Sort entries ascending by miss distance in kilometers
///
/// The sort is stable: entries at the same distance keep their input order.
pub fn rank_by_miss_distance(
    entries: Vec<NearEarthObject>,
    policy: DataShapePolicy,
) -> Result<Ranking, DataShapeError> {
    let mut keyed = Vec::with_capacity(entries.len());
    let mut dropped = 0;

    for entry in entries {
        match project(entry) {
            Ok(item) => keyed.push(item),
            Err(e) if policy == DataShapePolicy::Drop => {
                tracing::debug!("Dropping entry: {}", e);
                dropped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    Ok(Ranking {
        objects: keyed.into_iter().map(|(_, object)| object).collect(),
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CloseApproach;
    use serde_json::json;

    fn entry(name: &str, km: Value) -> NearEarthObject {
        NearEarthObject {
            name: name.to_string(),
            estimated_diameter: json!({"meters": {"estimated_diameter_min": 10.0}}),
            close_approach_data: vec![CloseApproach {
                close_approach_date: Some("2023-01-01".to_string()),
                close_approach_date_full: Some("2023-Jan-01 12:00".to_string()),
                miss_distance: Some(json!({"kilometers": km, "lunar": "1.0"})),
            }],
        }
    }

    fn names(ranking: &Ranking) -> Vec<&str> {
        ranking.objects.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn test_sorted_ascending() {
        let entries = vec![
            entry("far", json!("5000000.5")),
            entry("near", json!("12.25")),
            entry("mid", json!("70000")),
        ];

        let ranking = rank_by_miss_distance(entries, DataShapePolicy::Drop).unwrap();

        assert_eq!(names(&ranking), vec!["near", "mid", "far"]);
        assert_eq!(ranking.dropped, 0);
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        let entries = vec![entry("b", json!("900")), entry("a", json!("1000"))];
        let ranking = rank_by_miss_distance(entries, DataShapePolicy::Drop).unwrap();
        assert_eq!(names(&ranking), vec!["b", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let entries = vec![
            entry("first", json!("100")),
            entry("closer", json!("1")),
            entry("second", json!("100.0")),
        ];

        let ranking = rank_by_miss_distance(entries, DataShapePolicy::Drop).unwrap();

        assert_eq!(names(&ranking), vec!["closer", "first", "second"]);
    }

    #[test]
    fn test_projection_keeps_full_structures() {
        let (km, object) = project(entry("x", json!("42.5"))).unwrap();

        assert_eq!(km, 42.5);
        assert_eq!(object.closest_encounter_time, "2023-Jan-01 12:00");
        assert_eq!(object.closest_encounter_distance["lunar"], "1.0");
        assert_eq!(object.size_estimate["meters"]["estimated_diameter_min"], 10.0);
    }

    #[test]
    fn test_short_date_fallback() {
        let mut e = entry("x", json!("1"));
        e.close_approach_data[0].close_approach_date_full = None;

        let (_, object) = project(e).unwrap();

        assert_eq!(object.closest_encounter_time, "2023-01-01");
    }

    #[test]
    fn test_malformed_entries_dropped_and_counted() {
        let mut no_approach = entry("no_approach", json!("1"));
        no_approach.close_approach_data.clear();

        let entries = vec![
            entry("ok", json!("3")),
            no_approach,
            entry("bad_km", json!("n/a")),
            entry("no_km", Value::Null),
            entry("nan", json!("NaN")),
        ];

        let ranking = rank_by_miss_distance(entries, DataShapePolicy::Drop).unwrap();

        assert_eq!(names(&ranking), vec!["ok"]);
        assert_eq!(ranking.dropped, 4);
    }

    #[test]
    fn test_fail_policy() {
        let entries = vec![entry("ok", json!("3")), entry("bad_km", json!("n/a"))];

        let err = rank_by_miss_distance(entries, DataShapePolicy::Fail).unwrap_err();

        assert_eq!(
            err,
            DataShapeError::InvalidKilometers {
                name: "bad_km".to_string(),
                value: "\"n/a\"".to_string(),
            }
        );
    }

    #[test]
    fn test_numeric_kilometers_accepted() {
        let (km, _) = project(entry("x", json!(15.5))).unwrap();
        assert_eq!(km, 15.5);
    }

    #[test]
    fn test_unnamed_entry_rejected() {
        let err = project(entry("", json!("1"))).unwrap_err();
        assert_eq!(err, DataShapeError::MissingName);
    }
}
