//! Frame names and geodetic constants

/// Default name of the earth-centered, earth-fixed frame
pub const DEFAULT_EARTH_FRAME: &str = "earth";
/// Default name of the session-anchored NED frame
pub const DEFAULT_MAP_FRAME: &str = "map";
/// Default name of the odometry frame
pub const DEFAULT_ODOM_FRAME: &str = "odom";
/// Default name of the vehicle body frame
pub const DEFAULT_BASE_LINK_FRAME: &str = "base_link";
/// Default name of the global and local position sensor frames
pub const DEFAULT_POSITION_SENSOR_FRAME: &str = "pinpoint";

/// WGS84 semi-major axis (meters)
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6378137.0;
/// WGS84 flattening factor
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;
pub const RAD2DEG: f64 = 180.0 / std::f64::consts::PI;
