const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two WGS84 points, in meters.
pub fn haversine_distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_meters() {
        assert_eq!(haversine_distance_meters(-41.3, 174.8, -41.3, 174.8), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_distance_meters(0.0, 0.0, 1.0, 0.0);

        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = haversine_distance_meters(-36.85, 174.76, -41.29, 174.78);
        let b = haversine_distance_meters(-41.29, 174.78, -36.85, 174.76);

        assert!((a - b).abs() < 1e-6);
    }
}
