//! Spherical geometry for radius queries.
//!
//! Points are stored as GeoJSON (`[longitude, latitude]`, degrees). Radii are
//! expressed in radians of arc, i.e. a distance divided by the earth radius.

use serde_json::{json, Value};

/// Earth radius in miles used to convert distances to radians
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// A point on the sphere in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Read the `coordinates` pair of a GeoJSON point
    pub fn from_geojson(value: &Value) -> Option<Self> {
        let coords = value.get("coordinates")?.as_array()?;
        match coords.as_slice() {
            [lng, lat] => Some(Self::new(lng.as_f64()?, lat.as_f64()?)),
            _ => None,
        }
    }

    /// Render as a bare GeoJSON point
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Point",
            "coordinates": [self.longitude, self.latitude],
        })
    }

    /// Great-circle distance to `other` in radians (haversine)
    pub fn angular_distance(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlng = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// Convert a distance in miles to a radius in radians
pub fn radius_from_miles(miles: f64) -> f64 {
    miles / EARTH_RADIUS_MILES
}

/// "Within a spherical cap" predicate
#[derive(Debug, Clone, PartialEq)]
pub struct GeoWithin {
    /// Field holding a GeoJSON point
    pub field: String,
    pub center: GeoPoint,
    /// Cap radius in radians
    pub radius: f64,
}

impl GeoWithin {
    pub fn new(field: impl Into<String>, center: GeoPoint, radius: f64) -> Self {
        Self {
            field: field.into(),
            center,
            radius,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.center.angular_distance(point) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points_have_zero_distance() {
        let p = GeoPoint::new(-71.0589, 42.3601);
        assert_eq!(p.angular_distance(&p), 0.0);
    }

    #[test]
    fn test_boston_to_new_york() {
        let boston = GeoPoint::new(-71.0589, 42.3601);
        let nyc = GeoPoint::new(-74.0060, 40.7128);
        let miles = boston.angular_distance(&nyc) * EARTH_RADIUS_MILES;
        assert!((miles - 190.0).abs() < 5.0, "got {miles}");
    }

    #[test]
    fn test_zero_radius_only_matches_center() {
        let cap = GeoWithin::new("location", GeoPoint::new(0.0, 0.0), 0.0);
        assert!(cap.contains(&GeoPoint::new(0.0, 0.0)));
        assert!(!cap.contains(&GeoPoint::new(0.0001, 0.0)));
    }

    #[test]
    fn test_geojson_roundtrip() {
        let p = GeoPoint::new(-71.1, 42.3);
        assert_eq!(GeoPoint::from_geojson(&p.to_geojson()), Some(p));
        assert_eq!(GeoPoint::from_geojson(&json!({"coordinates": [1.0]})), None);
    }

    #[test]
    fn test_radius_from_miles() {
        assert_eq!(radius_from_miles(3963.0), 1.0);
        assert_eq!(radius_from_miles(0.0), 0.0);
    }
}
