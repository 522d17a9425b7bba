//! Error reporting and inbound message checks

pub mod error;
pub mod measurement;

pub use error::{report, MaintainerError, MaintainerResult, MessageKind, Prerequisite};
pub use measurement::{validate_fix, validate_odometry};
