//! Geometry primitives: rigid transforms and WGS84 conversions

pub mod rigid;
pub mod wgs84;

pub use rigid::{RigidTransform, StampedTransform};
pub use wgs84::{EarthModel, Wgs84Coordinate};
