//! Sanity checks on inbound measurements
//!
//! Runs before any handler state is touched.

use crate::core::{GeodeticFix, HeadingSample, OdometryUpdate};
use crate::validation::{MaintainerError, MaintainerResult, MessageKind};

const MAX_LATITUDE_DEG: f64 = 90.0;

fn invalid(kind: MessageKind, reason: String) -> MaintainerError {
    MaintainerError::InvalidMeasurement { kind, reason }
}

/// Check a fix, and the heading it will be paired with, for usable values
pub fn validate_fix(fix: &GeodeticFix, heading: &HeadingSample) -> MaintainerResult<()> {
    let kind = MessageKind::GeodeticFix;

    for (name, value) in [
        ("latitude", fix.latitude),
        ("longitude", fix.longitude),
        ("elevation", fix.elevation),
    ] {
        if !value.is_finite() {
            return Err(invalid(kind, format!("{} is {}", name, value)));
        }
    }

    if fix.latitude.abs() > MAX_LATITUDE_DEG {
        return Err(invalid(
            kind,
            format!("latitude {} outside [-{max}, {max}]", fix.latitude, max = MAX_LATITUDE_DEG),
        ));
    }

    if !heading.heading_deg.is_finite() {
        return Err(invalid(
            kind,
            format!("heading from stamp {} is {}", heading.stamp_ns, heading.heading_deg),
        ));
    }

    Ok(())
}

pub fn validate_odometry(update: &OdometryUpdate) -> MaintainerResult<()> {
    if !update.pose.is_finite() {
        return Err(invalid(
            MessageKind::Odometry,
            format!("non-finite pose {}", update.pose),
        ));
    }
    Ok(())
}
