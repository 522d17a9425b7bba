//! Inbound message types consumed by the frame maintainer

use serde::{Deserialize, Serialize};

use crate::geometry::RigidTransform;

/// Geodetic position fix as delivered by the global position sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeodeticFix {
    /// Frame the fix was measured in
    pub frame_id: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Elevation above the ellipsoid (meters)
    pub elevation: f64,
    /// Measurement time (nanoseconds)
    pub stamp_ns: u64,
}

/// Vehicle heading in degrees east of north
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingSample {
    /// Heading, clockwise from north (degrees)
    pub heading_deg: f64,
    /// Measurement time (nanoseconds)
    pub stamp_ns: u64,
}

/// Relative motion estimate of `child_frame` expressed in `parent_frame`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdometryUpdate {
    /// Frame the pose is expressed in, normally odom
    pub parent_frame: String,
    /// Frame being tracked: base_link or the local position sensor
    pub child_frame: String,
    /// Pose of `child_frame` in `parent_frame`
    pub pose: RigidTransform,
    /// Measurement time (nanoseconds)
    pub stamp_ns: u64,
}

impl GeodeticFix {
    pub fn new(frame_id: impl Into<String>, latitude: f64, longitude: f64, elevation: f64, stamp_ns: u64) -> Self {
        Self {
            frame_id: frame_id.into(),
            latitude,
            longitude,
            elevation,
            stamp_ns,
        }
    }
}

impl HeadingSample {
    pub fn new(heading_deg: f64, stamp_ns: u64) -> Self {
        Self { heading_deg, stamp_ns }
    }
}

impl OdometryUpdate {
    pub fn new(
        parent_frame: impl Into<String>,
        child_frame: impl Into<String>,
        pose: RigidTransform,
        stamp_ns: u64,
    ) -> Self {
        Self {
            parent_frame: parent_frame.into(),
            child_frame: child_frame.into(),
            pose,
            stamp_ns,
        }
    }
}
