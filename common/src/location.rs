use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Kinshasa city center, the default map position.
pub const KINSHASA: GeoPoint = GeoPoint {
    latitude: -4.4419,
    longitude: 15.2663,
};

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Display label: meters under a kilometer, otherwise one decimal.
    pub fn distance_label(&self, other: &GeoPoint) -> String {
        let km = self.distance_km(other);
        if km < 1.0 {
            format!("{} m", (km * 1000.0).round() as u64)
        } else {
            format!("{km:.1} km")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point() {
        assert!(KINSHASA.distance_km(&KINSHASA).abs() < 0.001);
    }

    #[test]
    fn test_distance_kinshasa_to_lubumbashi() {
        let lubumbashi = GeoPoint::new(-11.6609, 27.4794);
        let dist = KINSHASA.distance_km(&lubumbashi);
        // ~1 560 km as the crow flies.
        assert!((dist - 1560.0).abs() < 50.0);
    }

    #[test]
    fn test_distance_label_units() {
        let near = GeoPoint::new(KINSHASA.latitude + 0.003, KINSHASA.longitude);
        assert!(KINSHASA.distance_label(&near).ends_with(" m"));
        let far = GeoPoint::new(KINSHASA.latitude + 0.1, KINSHASA.longitude);
        assert!(KINSHASA.distance_label(&far).ends_with(" km"));
    }
}
