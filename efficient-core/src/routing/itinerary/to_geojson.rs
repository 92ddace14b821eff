use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{Value as JsonValue, json};

use super::{Itinerary, Leg, Timing, Waypoint};
use crate::Error;

impl Itinerary {
    /// Converts the itinerary to a `GeoJSON` `FeatureCollection`: one
    /// LineString per walk or ride, one Point per boarding wait.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GeoJsonError`] if a feature cannot be assembled
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let features = self
            .legs
            .iter()
            .enumerate()
            .map(|(idx, leg)| leg_to_feature(leg, idx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    /// # Errors
    ///
    /// Returns [`Error::GeoJsonError`] if serialization fails
    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn timing_properties(timing: Option<Timing>) -> (JsonValue, JsonValue) {
    timing.map_or((JsonValue::Null, JsonValue::Null), |t| {
        (json!(t.departure), json!(t.arrival))
    })
}

fn segment_geometry(from: &Waypoint, to: &Waypoint) -> Geometry {
    let line: LineString<f64> = vec![
        (from.location.x(), from.location.y()),
        (to.location.x(), to.location.y()),
    ]
    .into();
    Geometry::new((&line).into())
}

fn leg_to_feature(leg: &Leg, leg_idx: usize) -> Result<Feature, Error> {
    let value = match leg {
        Leg::Walk {
            from,
            to,
            distance,
            timing,
        } => {
            let (departure, arrival) = timing_properties(*timing);
            json!({
                "type": "Feature",
                "geometry": segment_geometry(from, to),
                "properties": {
                    "leg_type": "walk",
                    "leg_index": leg_idx,
                    "mode": leg.mode().name(),
                    "from_name": from.name,
                    "to_name": to.name,
                    "distance_km": distance,
                    "cost": 0.0,
                    "departure_time": departure,
                    "arrival_time": arrival,
                }
            })
        }
        Leg::Ride {
            mode,
            from,
            to,
            distance,
            cost,
            timing,
        } => {
            let (departure, arrival) = timing_properties(*timing);
            json!({
                "type": "Feature",
                "geometry": segment_geometry(from, to),
                "properties": {
                    "leg_type": "ride",
                    "leg_index": leg_idx,
                    "mode": mode.name(),
                    "from_name": from.name,
                    "to_name": to.name,
                    "distance_km": distance,
                    "cost": cost,
                    "departure_time": departure,
                    "arrival_time": arrival,
                }
            })
        }
        Leg::Waiting { at, mode, timing } => json!({
            "type": "Feature",
            "geometry": Geometry::new((&at.location).into()),
            "properties": {
                "leg_type": "waiting",
                "leg_index": leg_idx,
                "mode": mode.name(),
                "at_name": at.name,
                "departure_time": timing.departure,
                "arrival_time": timing.arrival,
                "duration": timing.duration(),
            }
        }),
    };

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;
    use crate::{model::Mode, routing::itinerary::Totals};

    fn waypoint(name: &str, lon: f64, lat: f64) -> Waypoint {
        Waypoint {
            node: None,
            name: name.to_string(),
            location: Point::new(lon, lat),
        }
    }

    #[test]
    fn one_feature_per_leg() {
        let a = waypoint("Home", 90.4070, 23.7806);
        let b = waypoint("Market", 90.4090, 23.7830);
        let itinerary = Itinerary {
            legs: vec![
                Leg::Waiting {
                    at: a.clone(),
                    mode: Mode::Metro,
                    timing: Timing {
                        departure: 100,
                        arrival: 400,
                    },
                },
                Leg::Ride {
                    mode: Mode::Metro,
                    from: a,
                    to: b,
                    distance: 0.3,
                    cost: 1.5,
                    timing: None,
                },
            ],
            totals: Totals::default(),
            departure: None,
            arrival: None,
        };

        let collection = itinerary.to_geojson().unwrap();
        assert_eq!(collection.features.len(), 2);

        let wait = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(wait["leg_type"], "waiting");
        assert_eq!(wait["duration"], 300);

        let ride = collection.features[1].properties.as_ref().unwrap();
        assert_eq!(ride["mode"], "Metro");
        assert!(ride["departure_time"].is_null());

        let text = itinerary.to_geojson_string().unwrap();
        assert!(text.contains("FeatureCollection"));
    }
}
