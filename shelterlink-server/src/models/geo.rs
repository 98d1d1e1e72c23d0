//! "Near me" radius search
//!
//! Distances are great-circle kilometres computed with the haversine formula.
//! The same formula is rendered into SQL by [`crate::db::nearby`], so rows
//! filtered in the database agree with [`haversine_km`].

use super::validation::{check_range, ValidationError};

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius used when a search supplies a location but no radius
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Largest accepted search radius
pub const MAX_RADIUS_KM: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            lat: check_range("lat", lat, -90.0, 90.0)?,
            lng: check_range("lng", lng, -180.0, 180.0)?,
        })
    }

    /// Validate a record's optional coordinates; both or neither.
    pub fn from_optional(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Self>, ValidationError> {
        match (lat, lng) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => Self::new(lat, lng).map(Some),
            _ => Err(ValidationError::InvalidFormat {
                field: "latitude/longitude",
                reason: "latitude and longitude must be supplied together",
            }),
        }
    }
}

/// Validated radius filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFilter {
    pub origin: GeoPoint,
    pub radius_km: f64,
}

impl GeoFilter {
    /// Build a filter from optional query parameters.
    ///
    /// Returns `None` when neither `lat` nor `lng` is supplied. Supplying only
    /// one of them is an error.
    pub fn from_params(
        lat: Option<f64>,
        lng: Option<f64>,
        radius: Option<f64>,
    ) -> Result<Option<Self>, ValidationError> {
        match (lat, lng) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => {
                let radius_km = radius.unwrap_or(DEFAULT_RADIUS_KM);
                if !(radius_km > 0.0 && radius_km <= MAX_RADIUS_KM) {
                    return Err(ValidationError::OutOfRange {
                        field: "radius",
                        min: 0.0,
                        max: MAX_RADIUS_KM,
                    });
                }
                Ok(Some(Self {
                    origin: GeoPoint::new(lat, lng)?,
                    radius_km,
                }))
            }
            _ => Err(ValidationError::InvalidFormat {
                field: "lat/lng",
                reason: "lat and lng must be supplied together",
            }),
        }
    }
}

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn zero_distance() {
        let p = pt(51.5, -0.1);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn london_to_paris() {
        // Roughly 343 km
        let d = haversine_km(pt(51.5074, -0.1278), pt(48.8566, 2.3522));
        assert!((d - 343.5).abs() < 2.0, "{d}");
    }

    #[test]
    fn symmetric() {
        let a = pt(53.48, -2.24);
        let b = pt(55.95, -3.19);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn antipodes_do_not_nan() {
        let d = haversine_km(pt(0.0, 0.0), pt(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn no_location_means_no_filter() {
        assert_eq!(GeoFilter::from_params(None, None, Some(5.0)).unwrap(), None);
    }

    #[test]
    fn default_radius() {
        let f = GeoFilter::from_params(Some(51.5), Some(-0.1), None)
            .unwrap()
            .unwrap();
        assert_eq!(f.radius_km, DEFAULT_RADIUS_KM);
    }

    #[test]
    fn half_a_location_is_rejected() {
        assert!(GeoFilter::from_params(Some(51.5), None, None).is_err());
        assert!(GeoFilter::from_params(None, Some(-0.1), None).is_err());
    }

    #[test]
    fn out_of_range_values_rejected() {
        assert!(GeoFilter::from_params(Some(95.0), Some(0.0), None).is_err());
        assert!(GeoFilter::from_params(Some(0.0), Some(-181.0), None).is_err());
        assert!(GeoFilter::from_params(Some(0.0), Some(0.0), Some(0.0)).is_err());
        assert!(GeoFilter::from_params(Some(0.0), Some(0.0), Some(-3.0)).is_err());
        assert!(GeoFilter::from_params(Some(0.0), Some(0.0), Some(10_000.0)).is_err());
    }

    #[test]
    fn record_coordinates_both_or_neither() {
        assert_eq!(GeoPoint::from_optional(None, None).unwrap(), None);
        assert!(GeoPoint::from_optional(Some(53.8), Some(-1.55)).unwrap().is_some());
        assert!(GeoPoint::from_optional(Some(53.8), None).is_err());
    }
}
