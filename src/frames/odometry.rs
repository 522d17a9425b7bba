//! Odometry frame reconciliation
//!
//! Odometry arrives either already describing `odom -> base_link`, or
//! describing `odom -> local position sensor`. The second form is moved onto
//! the body frame through the sensor's static mount:
//!
//! `T_o_b = T_o_p * inv(T_b_p)`

use crate::geometry::{RigidTransform, StampedTransform};
use crate::core::OdometryUpdate;
use crate::utils::FrameConfig;
use crate::validation::{validate_odometry, MaintainerError, MaintainerResult, MessageKind};

/// How an odometry message relates to the body frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdometryTopology {
    /// `odom -> base_link`, used as is
    Direct,
    /// `odom -> local position sensor`, needs the sensor mount
    ViaLocalSensor,
}

/// `odom -> base_link` from `odom -> sensor` and `base_link -> sensor`
pub fn odom_to_base_from_sensor(odom_to_sensor: &RigidTransform, base_to_sensor: &RigidTransform) -> RigidTransform {
    odom_to_sensor * &base_to_sensor.inverse()
}

#[derive(Debug, Clone)]
pub struct OdometryReconciler {
    odom_frame: String,
    base_link_frame: String,
    local_pos_sensor_frame: String,
    // odom starts aligned with base_link
    odom_to_base_link: RigidTransform,
    stamp_ns: Option<u64>,
}

impl OdometryReconciler {
    pub fn new(frames: &FrameConfig) -> Self {
        Self {
            odom_frame: frames.odom_frame.clone(),
            base_link_frame: frames.base_link_frame.clone(),
            local_pos_sensor_frame: frames.local_pos_sensor_frame.clone(),
            odom_to_base_link: RigidTransform::identity(),
            stamp_ns: None,
        }
    }

    pub fn classify(&self, update: &OdometryUpdate) -> MaintainerResult<OdometryTopology> {
        if update.parent_frame == self.odom_frame {
            if update.child_frame == self.base_link_frame {
                return Ok(OdometryTopology::Direct);
            }
            if update.child_frame == self.local_pos_sensor_frame {
                return Ok(OdometryTopology::ViaLocalSensor);
            }
        }

        Err(MaintainerError::UnsupportedFrame {
            kind: MessageKind::Odometry,
            received: format!("{} -> {}", update.parent_frame, update.child_frame),
            expected: format!(
                "{odom} -> {base} or {odom} -> {sensor}",
                odom = self.odom_frame,
                base = self.base_link_frame,
                sensor = self.local_pos_sensor_frame
            ),
        })
    }

    /// Fold `update` into the current `odom -> base_link` estimate.
    ///
    /// `base_to_local_sensor` is only invoked for sensor-frame odometry with a
    /// finite pose. On any error the current estimate is left untouched.
    pub fn reconcile<F>(&mut self, update: &OdometryUpdate, base_to_local_sensor: F) -> MaintainerResult<StampedTransform>
    where
        F: FnOnce() -> MaintainerResult<RigidTransform>,
    {
        let topology = self.classify(update)?;
        validate_odometry(update)?;

        let odom_to_base_link = match topology {
            OdometryTopology::Direct => update.pose,
            OdometryTopology::ViaLocalSensor => {
                let mount = base_to_local_sensor()?;
                odom_to_base_from_sensor(&update.pose, &mount)
            }
        };

        self.odom_to_base_link = odom_to_base_link;
        self.stamp_ns = Some(update.stamp_ns);

        Ok(StampedTransform::new(
            self.odom_frame.clone(),
            self.base_link_frame.clone(),
            odom_to_base_link,
            update.stamp_ns,
        ))
    }

    pub fn odom_to_base_link(&self) -> RigidTransform {
        self.odom_to_base_link
    }

    /// Stamp of the last accepted update, `None` before any
    pub fn stamp_ns(&self) -> Option<u64> {
        self.stamp_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Prerequisite;
    use nalgebra::{UnitQuaternion, Vector3};

    fn frames() -> FrameConfig {
        FrameConfig {
            local_pos_sensor_frame: "imu".to_string(),
            ..FrameConfig::default()
        }
    }

    fn pose() -> RigidTransform {
        RigidTransform::new(
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.4),
            Vector3::new(3.0, -1.0, 0.0),
        )
    }

    fn mount() -> RigidTransform {
        RigidTransform::new(
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -0.1),
            Vector3::new(0.5, 0.2, 1.0),
        )
    }

    #[test]
    fn test_direct_topology_stores_pose() {
        let mut reconciler = OdometryReconciler::new(&frames());
        let update = OdometryUpdate::new("odom", "base_link", pose(), 42);

        let published = reconciler
            .reconcile(&update, || panic!("mount not needed for direct odometry"))
            .unwrap();

        assert_eq!(published.parent_frame, "odom");
        assert_eq!(published.child_frame, "base_link");
        assert_eq!(published.stamp_ns, 42);
        assert_eq!(reconciler.odom_to_base_link(), pose());
        assert_eq!(reconciler.stamp_ns(), Some(42));
    }

    #[test]
    fn test_sensor_topology_applies_inverse_mount() {
        let mut reconciler = OdometryReconciler::new(&frames());
        let update = OdometryUpdate::new("odom", "imu", pose(), 7);

        reconciler.reconcile(&update, || Ok(mount())).unwrap();

        let expected = pose() * mount().inverse();
        assert!(reconciler.odom_to_base_link().approx_eq(&expected, 1e-12, 1e-12));

        // composing back with the mount recovers the sensor pose
        let sensor = reconciler.odom_to_base_link() * mount();
        assert!(sensor.approx_eq(&pose(), 1e-12, 1e-12));
    }

    #[test]
    fn test_unsupported_pair_leaves_state_untouched() {
        let mut reconciler = OdometryReconciler::new(&frames());
        reconciler
            .reconcile(&OdometryUpdate::new("odom", "base_link", pose(), 1), || Ok(mount()))
            .unwrap();

        for (parent, child) in [("map", "base_link"), ("odom", "camera"), ("base_link", "odom")] {
            let result = reconciler.reconcile(&OdometryUpdate::new(parent, child, mount(), 2), || Ok(mount()));
            assert!(matches!(
                result,
                Err(MaintainerError::UnsupportedFrame { kind: MessageKind::Odometry, .. })
            ));
        }

        assert_eq!(reconciler.odom_to_base_link(), pose());
        assert_eq!(reconciler.stamp_ns(), Some(1));
    }

    #[test]
    fn test_missing_mount_drops_update() {
        let mut reconciler = OdometryReconciler::new(&frames());
        let result = reconciler.reconcile(&OdometryUpdate::new("odom", "imu", pose(), 3), || {
            Err(MaintainerError::PrerequisiteMissing {
                missing: Prerequisite::LocalSensorMount,
            })
        });

        assert!(result.is_err());
        assert_eq!(reconciler.odom_to_base_link(), RigidTransform::identity());
        assert_eq!(reconciler.stamp_ns(), None);
    }

    #[test]
    fn test_non_finite_pose_dropped_before_mount_lookup() {
        let mut reconciler = OdometryReconciler::new(&frames());
        let broken = RigidTransform::from_translation(Vector3::new(f64::NAN, 0.0, 0.0));

        let result = reconciler.reconcile(&OdometryUpdate::new("odom", "imu", broken, 4), || {
            panic!("mount must not be resolved for a rejected pose")
        });

        assert!(matches!(result, Err(MaintainerError::InvalidMeasurement { .. })));
        assert_eq!(reconciler.odom_to_base_link(), RigidTransform::identity());
        assert_eq!(reconciler.stamp_ns(), None);
    }

    #[test]
    fn test_classify_prefers_direct_when_sensor_is_base_link() {
        let frames = FrameConfig {
            local_pos_sensor_frame: "base_link".to_string(),
            ..FrameConfig::default()
        };
        let reconciler = OdometryReconciler::new(&frames);
        let update = OdometryUpdate::new("odom", "base_link", pose(), 0);
        assert_eq!(reconciler.classify(&update), Ok(OdometryTopology::Direct));
    }
}
