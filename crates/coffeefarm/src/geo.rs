use crate::models::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// "350m away" below one kilometre, "2.4km away" above.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m away", (km * 1000.0).round() as i64)
    } else {
        format!("{:.1}km away", km)
    }
}

pub fn google_maps_url(point: GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        point.latitude, point.longitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HCMC: GeoPoint = GeoPoint {
        latitude: 10.7769,
        longitude: 106.7009,
    };

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_km(HCMC, HCMC), 0.0);
    }

    #[test]
    fn one_degree_latitude() {
        let north = GeoPoint::new(HCMC.latitude + 1.0, HCMC.longitude);
        let d = haversine_km(HCMC, north);
        assert!((d - 111.19).abs() < 1.2, "got {}", d);
    }

    #[test]
    fn symmetric() {
        let dalat = GeoPoint::new(11.9404, 108.4583);
        let a = haversine_km(HCMC, dalat);
        let b = haversine_km(dalat, HCMC);
        assert!((a - b).abs() < 1e-9);
        assert!(a > 200.0 && a < 250.0);
    }

    #[test]
    fn distance_text() {
        assert_eq!(format_distance(0.3504), "350m away");
        assert_eq!(format_distance(0.0), "0m away");
        assert_eq!(format_distance(1.0), "1.0km away");
        assert_eq!(format_distance(12.345), "12.3km away");
    }

    #[test]
    fn maps_link() {
        assert_eq!(
            google_maps_url(HCMC),
            "https://www.google.com/maps/search/?api=1&query=10.7769,106.7009"
        );
    }
}
