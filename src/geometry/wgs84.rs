//! WGS84 geodetic conversions
//!
//! Geodetic coordinates here are always radians for angles and meters for
//! elevation. Callers holding degrees convert at the boundary with
//! [`DEG2RAD`](crate::core::DEG2RAD).

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::core::{WGS84_FLATTENING, WGS84_SEMI_MAJOR_AXIS};
use crate::geometry::RigidTransform;

const ECEF_TO_GEODETIC_MAX_ITERATIONS: usize = 10;
const ECEF_TO_GEODETIC_TOLERANCE_RAD: f64 = 1e-14;

/// Geodetic coordinate with heading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wgs84Coordinate {
    /// Latitude (radians)
    pub lat: f64,
    /// Longitude (radians)
    pub lon: f64,
    /// Elevation above the ellipsoid (meters)
    pub elevation: f64,
    /// Heading, clockwise from north (radians)
    pub heading: f64,
}

impl Wgs84Coordinate {
    pub fn new(lat: f64, lon: f64, elevation: f64, heading: f64) -> Self {
        Self { lat, lon, elevation, heading }
    }
}

/// Reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthModel {
    /// Semi-major axis (meters)
    pub semi_major_axis: f64,
    /// Flattening factor
    pub flattening: f64,
}

impl Default for EarthModel {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl EarthModel {
    /// WGS84 Earth model parameters
    pub fn wgs84() -> Self {
        Self {
            semi_major_axis: WGS84_SEMI_MAJOR_AXIS,
            flattening: WGS84_FLATTENING,
        }
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Radius of curvature in the prime vertical at `lat`
    fn prime_vertical_radius(&self, lat: f64) -> f64 {
        self.semi_major_axis / (1.0 - self.eccentricity_squared() * lat.sin().powi(2)).sqrt()
    }

    /// Convert a geodetic coordinate to ECEF (Earth-Centered, Earth-Fixed)
    pub fn geodetic_to_ecef(&self, loc: &Wgs84Coordinate) -> Vector3<f64> {
        let n = self.prime_vertical_radius(loc.lat);
        let h = loc.elevation;
        let e2 = self.eccentricity_squared();

        Vector3::new(
            (n + h) * loc.lat.cos() * loc.lon.cos(),
            (n + h) * loc.lat.cos() * loc.lon.sin(),
            (n * (1.0 - e2) + h) * loc.lat.sin(),
        )
    }

    /// Convert ECEF to a geodetic coordinate (heading is zero).
    ///
    /// Fixed-point iteration on latitude; converges to well below a millimeter
    /// for points near the surface.
    pub fn ecef_to_geodetic(&self, ecef: &Vector3<f64>) -> Wgs84Coordinate {
        let e2 = self.eccentricity_squared();
        let p = ecef.x.hypot(ecef.y);
        let lon = ecef.y.atan2(ecef.x);

        let mut lat = ecef.z.atan2(p * (1.0 - e2));
        let mut elevation = 0.0;
        for _ in 0..ECEF_TO_GEODETIC_MAX_ITERATIONS {
            let n = self.prime_vertical_radius(lat);
            elevation = if lat.cos().abs() > 1e-10 {
                p / lat.cos() - n
            } else {
                ecef.z.abs() - n * (1.0 - e2)
            };
            let next = ecef.z.atan2(p * (1.0 - e2 * n / (n + elevation)));
            let converged = (next - lat).abs() < ECEF_TO_GEODETIC_TOLERANCE_RAD;
            lat = next;
            if converged {
                break;
            }
        }

        Wgs84Coordinate::new(lat, lon, elevation, 0.0)
    }

    /// Earth to local NED transform anchored at `loc`.
    ///
    /// The resulting frame has its origin at `loc`, x pointing north, y east
    /// and z down. The heading of `loc` is not applied.
    pub fn ecef_to_ned_from_loc(&self, loc: &Wgs84Coordinate) -> RigidTransform {
        let (sin_lat, cos_lat) = loc.lat.sin_cos();
        let (sin_lon, cos_lon) = loc.lon.sin_cos();

        let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let east = Vector3::new(-sin_lon, cos_lon, 0.0);
        let down = Vector3::new(-cos_lat * cos_lon, -cos_lat * sin_lon, -sin_lat);

        let basis = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[north, east, down]));
        RigidTransform::new(
            UnitQuaternion::from_rotation_matrix(&basis),
            self.geodetic_to_ecef(loc),
        )
    }

    /// Position of `loc` in the frame described by `ecef_in_ned`
    /// (the inverse of an earth to local transform)
    pub fn geodesic_to_cartesian(&self, loc: &Wgs84Coordinate, ecef_in_ned: &RigidTransform) -> Vector3<f64> {
        ecef_in_ned.transform_point(&self.geodetic_to_ecef(loc))
    }

    /// Geodetic coordinate of `point`, given the earth to local transform `ned_in_ecef`
    pub fn cartesian_to_geodesic(&self, point: &Vector3<f64>, ned_in_ecef: &RigidTransform) -> Wgs84Coordinate {
        self.ecef_to_geodetic(&ned_in_ecef.transform_point(point))
    }
}
