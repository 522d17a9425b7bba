//! Maintenance of the `earth -> map -> odom -> base_link` chain

pub mod anchor;
pub mod composer;
pub mod maintainer;
pub mod mount;
pub mod odometry;

pub use anchor::GeodeticAnchor;
pub use composer::{calculate_map_to_odom, MapOdomComposer};
pub use maintainer::TransformMaintainer;
pub use mount::{lookup_with_fallback, StaticMountResolver};
pub use odometry::{OdometryReconciler, OdometryTopology};
