/// Mean earth radius used for all great-circle calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance in kilometers between two points given in degrees.
///
/// Coordinates are not range checked. The argument of `asin` is clamped to
/// 1.0, so rounding noise on (nearly) antipodal points cannot produce `NaN`.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let h = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Rounds half away from zero to the given number of decimal places.
///
/// Values too large to scale are returned unchanged, they carry no fractional
/// digits at that magnitude anyway.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(haversine_distance(54.32, 10.13, 54.32, 10.13), 0.0);
    }

    #[test]
    fn one_degree_along_equator() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 1.0);
        assert!((distance - 111.195).abs() < 0.001, "got {distance}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 180.0);
        assert!(!distance.is_nan());
        assert!((distance - 20015.086).abs() < 0.01, "got {distance}");

        let distance = haversine_distance(90.0, 0.0, -90.0, 0.0);
        assert!(!distance.is_nan());
        assert!((distance - 20015.086).abs() < 0.01, "got {distance}");
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(111.194_926, 2), 111.19);
    }

    #[test]
    fn rounding_huge_values_stays_finite() {
        assert_eq!(round_to(1e307, 2), 1e307);
        assert_eq!(round_to(f64::MAX, 2), f64::MAX);
        assert_eq!(round_to(-1e307, 2), -1e307);
    }
}
