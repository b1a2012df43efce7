use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::{haversine_distance, round_to},
    id::HasId,
};

use crate::ExampleData;

/// Number of decimal places distances are reported with.
pub const DISTANCE_DECIMALS: i32 = 2;

/// A recorded location. Either coordinate may be unset, in which case the
/// point does not take part in any distance calculation.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Builds a point from optional coordinates, `None` if both are missing.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (None, None) => None,
            _ => Some(Self {
                latitude,
                longitude,
            }),
        }
    }

    /// Latitude and longitude, if both are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Great-circle distance between two points in kilometers, rounded to two
/// decimal places. `None` if a coordinate of either point is missing.
pub fn distance_between(a: &GeoPoint, b: &GeoPoint) -> Option<f64> {
    let (latitude_1, longitude_1) = a.coordinates()?;
    let (latitude_2, longitude_2) = b.coordinates()?;
    let distance = haversine_distance(latitude_1, longitude_1, latitude_2, longitude_2);
    Some(round_to(distance, DISTANCE_DECIMALS))
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub name: String,
    pub location: Option<GeoPoint>,
}

impl Stop {
    pub fn new<S: Into<String>>(name: S, location: Option<GeoPoint>) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    pub fn latitude(&self) -> Option<f64> {
        self.location.and_then(|location| location.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.location.and_then(|location| location.longitude)
    }

    /// Distance to another stop, `None` unless both have complete locations.
    pub fn distance_to(&self, other: &Stop) -> Option<f64> {
        self.location
            .as_ref()
            .zip(other.location.as_ref())
            .and_then(|(a, b)| distance_between(a, b))
    }
}

impl HasId for Stop {
    type IdType = String;
}

impl ExampleData for Stop {
    fn example_data() -> Self {
        Stop::new("Central Depot", Some(GeoPoint::new(23.8103, 90.4125)))
    }
}
