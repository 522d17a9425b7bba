//! Map to odom correction
//!
//! Frames involved, with `T_x_y` the pose of `y` expressed in `x`:
//! - `m` map, `o` odom
//! - `p` global position sensor
//! - `b` base_link as placed by odometry, `B` base_link as placed by the fix
//!
//! `T_m_o = T_m_B * inv(T_o_b)`, with `b` and `B` taken to be the same body.
//! The correction is recomputed from scratch on every fix; it is not filtered.

use nalgebra::{UnitQuaternion, Vector3};

use crate::geometry::{EarthModel, RigidTransform, Wgs84Coordinate};

/// Compute `map -> odom` from a fix (with heading), the global sensor mount,
/// the map anchor and the current odometry estimate
pub fn calculate_map_to_odom(
    earth_model: &EarthModel,
    fix: &Wgs84Coordinate,
    base_to_global_sensor: &RigidTransform,
    earth_to_map: &RigidTransform,
    odom_to_base_link: &RigidTransform,
) -> RigidTransform {
    let sensor_in_map = earth_model.geodesic_to_cartesian(fix, &earth_to_map.inverse());

    // Heading is relative to north, so over short distances it is also the yaw in map
    let sensor_rot_in_map = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), fix.heading);

    let t_m_p = RigidTransform::new(sensor_rot_in_map, sensor_in_map).normalized();
    let t_m_b = t_m_p * base_to_global_sensor.inverse();

    t_m_b * odom_to_base_link.inverse()
}

/// Holds the most recent `map -> odom` correction
#[derive(Debug, Clone)]
pub struct MapOdomComposer {
    earth_model: EarthModel,
    map_to_odom: RigidTransform,
    stamp_ns: Option<u64>,
}

impl MapOdomComposer {
    pub fn new(earth_model: EarthModel) -> Self {
        Self {
            earth_model,
            map_to_odom: RigidTransform::identity(),
            stamp_ns: None,
        }
    }

    /// Recompute and store the correction for a new fix
    pub fn update(
        &mut self,
        fix: &Wgs84Coordinate,
        base_to_global_sensor: &RigidTransform,
        earth_to_map: &RigidTransform,
        odom_to_base_link: &RigidTransform,
        stamp_ns: u64,
    ) -> RigidTransform {
        self.map_to_odom = calculate_map_to_odom(
            &self.earth_model,
            fix,
            base_to_global_sensor,
            earth_to_map,
            odom_to_base_link,
        );
        self.stamp_ns = Some(stamp_ns);
        self.map_to_odom
    }

    pub fn map_to_odom(&self) -> RigidTransform {
        self.map_to_odom
    }

    pub fn stamp_ns(&self) -> Option<u64> {
        self.stamp_ns
    }
}
