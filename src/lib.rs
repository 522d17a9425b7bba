//! Localization Frame Maintainer
//!
//! Derives and publishes the `earth -> map -> odom -> base_link` transform
//! chain of a ground vehicle from geodetic fixes, heading, and odometry.

pub mod core;
pub mod geometry;
pub mod frames;
pub mod tf;
pub mod validation;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{GeodeticFix, HeadingSample, OdometryUpdate, DEG2RAD, RAD2DEG};
pub use geometry::{EarthModel, RigidTransform, StampedTransform, Wgs84Coordinate};
pub use frames::{
    calculate_map_to_odom, GeodeticAnchor, MapOdomComposer, OdometryReconciler, OdometryTopology,
    StaticMountResolver, TransformMaintainer,
};
pub use tf::{LookupTime, RecordingSink, TransformHistory, TransformLookup, TransformSink};
pub use validation::{MaintainerError, MaintainerResult};
pub use utils::{ConfigError, FrameConfig, MaintainerConfig};
