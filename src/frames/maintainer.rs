//! Callback-driven maintainer for the localization transform chain
//!
//! Owns the per-channel state (latest heading, latest fix, map anchor,
//! static mounts, odometry estimate, map correction) and publishes stamped
//! transforms to the injected sink. Handlers must be invoked one at a time;
//! nothing here locks.

use nalgebra::Vector3;

use crate::core::{GeodeticFix, HeadingSample, OdometryUpdate, DEG2RAD};
use crate::frames::{GeodeticAnchor, MapOdomComposer, OdometryReconciler, StaticMountResolver};
use crate::geometry::{RigidTransform, StampedTransform, Wgs84Coordinate};
use crate::tf::{TransformLookup, TransformSink};
use crate::utils::{ConfigError, FrameConfig, MaintainerConfig};
use crate::validation::{report, validate_fix, MaintainerError, MaintainerResult, MessageKind, Prerequisite};

pub struct TransformMaintainer<L, S> {
    /// Frame names and earth model, validated at construction
    config: MaintainerConfig,
    /// Host transform store, queried for static sensor mounts
    lookup: L,
    /// Receives every published transform batch
    sink: S,
    /// `earth -> map`, frozen at the first accepted fix
    anchor: GeodeticAnchor,
    /// Cached `base_link -> sensor` mounts
    mounts: StaticMountResolver,
    /// Current `odom -> base_link` estimate
    odometry: OdometryReconciler,
    /// Current `map -> odom` correction
    composer: MapOdomComposer,
    /// Most recent heading, paired with the next fix
    latest_heading: Option<HeadingSample>,
    /// Last fix that was accepted and published
    latest_fix: Option<GeodeticFix>,
}

impl<L: TransformLookup, S: TransformSink> TransformMaintainer<L, S> {
    /// Build a maintainer around the host's transform lookup and broadcast sink
    pub fn new(config: MaintainerConfig, lookup: L, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            anchor: GeodeticAnchor::new(config.earth_model),
            mounts: StaticMountResolver::new(),
            odometry: OdometryReconciler::new(&config.frames),
            composer: MapOdomComposer::new(config.earth_model),
            latest_heading: None,
            latest_fix: None,
            config,
            lookup,
            sink,
        })
    }

    /// Record the most recent heading; it is consumed by the next fix
    pub fn handle_heading(&mut self, heading: HeadingSample) {
        log::debug!("Heading {:.3} deg at {}", heading.heading_deg, heading.stamp_ns);
        self.latest_heading = Some(heading);
    }

    /// Process a geodetic fix, publishing `earth -> map` and `map -> odom`.
    ///
    /// The fix is dropped, with nothing published and no state changed, when
    /// any of these checks fails (in order):
    ///
    /// 1. it comes from the configured global sensor frame
    /// 2. a heading has been seen
    /// 3. coordinates and heading are finite, latitude within +/-90 deg
    /// 4. the global sensor mount resolves
    pub fn handle_fix(&mut self, fix: GeodeticFix) -> MaintainerResult<Vec<StampedTransform>> {
        let frames = &self.config.frames;

        if fix.frame_id != frames.global_pos_sensor_frame {
            return Err(report(MaintainerError::UnsupportedFrame {
                kind: MessageKind::GeodeticFix,
                received: format!("'{}'", fix.frame_id),
                expected: format!("'{}'", frames.global_pos_sensor_frame),
            }));
        }

        let heading = self.latest_heading.ok_or_else(|| {
            report(MaintainerError::PrerequisiteMissing {
                missing: Prerequisite::Heading,
            })
        })?;
        validate_fix(&fix, &heading).map_err(report)?;

        let base_to_global_sensor = self
            .mounts
            .resolve(
                &self.lookup,
                &frames.base_link_frame,
                &frames.global_pos_sensor_frame,
                fix.stamp_ns,
            )
            .map_err(report)?;

        let coord = Wgs84Coordinate::new(
            fix.latitude * DEG2RAD,
            fix.longitude * DEG2RAD,
            fix.elevation,
            heading.heading_deg * DEG2RAD,
        );

        let earth_to_map = self.anchor.establish(&coord);
        let map_to_odom = self.composer.update(
            &coord,
            &base_to_global_sensor,
            &earth_to_map,
            &self.odometry.odom_to_base_link(),
            fix.stamp_ns,
        );

        let published = vec![
            StampedTransform::new(&frames.earth_frame, &frames.map_frame, earth_to_map, fix.stamp_ns),
            StampedTransform::new(&frames.map_frame, &frames.odom_frame, map_to_odom, fix.stamp_ns),
        ];
        log::debug!("map -> odom at {}: {}", fix.stamp_ns, map_to_odom);

        self.latest_fix = Some(fix);
        self.sink.send(&published);
        Ok(published)
    }

    /// Process an odometry update, publishing `odom -> base_link`
    pub fn handle_odometry(&mut self, update: OdometryUpdate) -> MaintainerResult<StampedTransform> {
        let frames = &self.config.frames;
        let mounts = &mut self.mounts;
        let lookup = &self.lookup;

        let published = self
            .odometry
            .reconcile(&update, || {
                mounts.resolve(
                    lookup,
                    &frames.base_link_frame,
                    &frames.local_pos_sensor_frame,
                    update.stamp_ns,
                )
            })
            .map_err(report)?;

        self.sink.send(std::slice::from_ref(&published));
        Ok(published)
    }

    pub fn frames(&self) -> &FrameConfig {
        &self.config.frames
    }

    /// `None` until the first accepted fix
    pub fn earth_to_map(&self) -> Option<RigidTransform> {
        self.anchor.earth_to_map()
    }

    pub fn map_to_odom(&self) -> RigidTransform {
        self.composer.map_to_odom()
    }

    pub fn odom_to_base_link(&self) -> RigidTransform {
        self.odometry.odom_to_base_link()
    }

    /// Vehicle pose in the map frame, through the odom chain
    pub fn map_to_base_link(&self) -> RigidTransform {
        self.map_to_odom() * self.odom_to_base_link()
    }

    pub fn latest_heading(&self) -> Option<&HeadingSample> {
        self.latest_heading.as_ref()
    }

    pub fn latest_fix(&self) -> Option<&GeodeticFix> {
        self.latest_fix.as_ref()
    }

    /// Express a geodetic point (degrees, meters) in the map frame, once anchored
    pub fn locate_in_map(&self, latitude_deg: f64, longitude_deg: f64, elevation: f64) -> Option<Vector3<f64>> {
        let coord = Wgs84Coordinate::new(latitude_deg * DEG2RAD, longitude_deg * DEG2RAD, elevation, 0.0);
        self.anchor.to_map(&coord)
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn lookup_mut(&mut self) -> &mut L {
        &mut self.lookup
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
