//! Earth to map anchoring
//!
//! The map frame is a NED frame placed at the vehicle's position when the
//! first usable geodetic fix arrives. It is computed once and never moves.

use nalgebra::Vector3;

use crate::geometry::{EarthModel, RigidTransform, Wgs84Coordinate};

#[derive(Debug, Clone)]
pub struct GeodeticAnchor {
    earth_model: EarthModel,
    earth_to_map: Option<RigidTransform>,
}

impl GeodeticAnchor {
    pub fn new(earth_model: EarthModel) -> Self {
        Self {
            earth_model,
            earth_to_map: None,
        }
    }

    /// Freeze the map frame at `loc` on first call; afterwards return the frozen value
    pub fn establish(&mut self, loc: &Wgs84Coordinate) -> RigidTransform {
        if let Some(earth_to_map) = self.earth_to_map {
            return earth_to_map;
        }

        let earth_to_map = self.earth_model.ecef_to_ned_from_loc(loc);
        log::info!(
            "Map frame anchored at lat={:.8} lon={:.8} elevation={:.3}",
            loc.lat.to_degrees(),
            loc.lon.to_degrees(),
            loc.elevation
        );
        self.earth_to_map = Some(earth_to_map);
        earth_to_map
    }

    pub fn earth_to_map(&self) -> Option<RigidTransform> {
        self.earth_to_map
    }

    pub fn is_established(&self) -> bool {
        self.earth_to_map.is_some()
    }

    /// Position of a geodetic coordinate within the map frame
    pub fn to_map(&self, loc: &Wgs84Coordinate) -> Option<Vector3<f64>> {
        let earth_to_map = self.earth_to_map?;
        Some(self.earth_model.geodesic_to_cartesian(loc, &earth_to_map.inverse()))
    }

    /// Geodetic coordinate of a point in the map frame
    pub fn to_geodetic(&self, point: &Vector3<f64>) -> Option<Wgs84Coordinate> {
        let earth_to_map = self.earth_to_map?;
        Some(self.earth_model.cartesian_to_geodesic(point, &earth_to_map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEG2RAD;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_establish_is_frozen_after_first_fix() {
        let first = Wgs84Coordinate::new(38.95 * DEG2RAD, -77.15 * DEG2RAD, 80.0, 0.3);
        let second = Wgs84Coordinate::new(39.5 * DEG2RAD, -76.0 * DEG2RAD, 10.0, 1.2);

        let mut once = GeodeticAnchor::new(EarthModel::wgs84());
        let expected = once.establish(&first);

        let mut twice = GeodeticAnchor::new(EarthModel::wgs84());
        twice.establish(&first);
        let again = twice.establish(&second);

        assert_eq!(again, expected);
        assert_eq!(twice.earth_to_map(), Some(expected));
    }

    #[test]
    fn test_unanchored_has_no_conversions() {
        let anchor = GeodeticAnchor::new(EarthModel::wgs84());
        assert!(!anchor.is_established());
        assert!(anchor.to_map(&Wgs84Coordinate::default()).is_none());
        assert!(anchor.to_geodetic(&Vector3::zeros()).is_none());
    }

    #[test]
    fn test_anchor_origin_and_closure() {
        let origin = Wgs84Coordinate::new(10.0 * DEG2RAD, 20.0 * DEG2RAD, 5.0, 0.0);
        let mut anchor = GeodeticAnchor::new(EarthModel::wgs84());
        anchor.establish(&origin);

        assert!(anchor.to_map(&origin).unwrap().norm() < 1e-6);

        let point = Vector3::new(-25.0, 40.0, 1.0);
        let geo = anchor.to_geodetic(&point).unwrap();
        assert_abs_diff_eq!(anchor.to_map(&geo).unwrap(), point, epsilon = 1e-4);
    }
}
