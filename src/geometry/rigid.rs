//! Rigid-body transform value type
//!
//! A `RigidTransform` maps points from a child frame into its parent frame.
//! Composition follows the usual convention: `T_a_c = T_a_b * T_b_c`.

use nalgebra::{Isometry3, Point3, Quaternion, Translation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

/// Rotation plus translation, rotation stored as a unit quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransformRepr", into = "TransformRepr")]
pub struct RigidTransform {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

/// Wire form: `{"translation": [x, y, z], "rotation": [x, y, z, w]}`
#[derive(Serialize, Deserialize)]
struct TransformRepr {
    translation: [f64; 3],
    #[serde(default = "identity_rotation")]
    rotation: [f64; 4],
}

fn identity_rotation() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl TryFrom<TransformRepr> for RigidTransform {
    type Error = String;

    fn try_from(repr: TransformRepr) -> Result<Self, Self::Error> {
        let [x, y, z, w] = repr.rotation;
        let rotation = UnitQuaternion::try_new(Quaternion::new(w, x, y, z), 1e-12)
            .ok_or_else(|| format!("degenerate rotation quaternion {:?}", repr.rotation))?;
        let [tx, ty, tz] = repr.translation;
        Ok(Self::new(rotation, Vector3::new(tx, ty, tz)))
    }
}

impl From<RigidTransform> for TransformRepr {
    fn from(transform: RigidTransform) -> Self {
        let q = transform.rotation.quaternion();
        let t = transform.translation;
        Self {
            translation: [t.x, t.y, t.z],
            rotation: [q.i, q.j, q.k, q.w],
        }
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    pub fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self { rotation, translation }
    }

    pub fn identity() -> Self {
        Self::new(UnitQuaternion::identity(), Vector3::zeros())
    }

    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self::new(UnitQuaternion::identity(), translation)
    }

    /// Pure rotation of `angle` radians about `axis`
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Self {
        let rotation = Unit::try_new(*axis, f64::EPSILON)
            .map(|axis| UnitQuaternion::from_axis_angle(&axis, angle))
            .unwrap_or_else(UnitQuaternion::identity);
        Self::new(rotation, Vector3::zeros())
    }

    /// `self * other`: apply `other` first, then `self`
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        RigidTransform {
            rotation: self.rotation * other.rotation,
            translation: self.translation + self.rotation * other.translation,
        }
    }

    pub fn inverse(&self) -> RigidTransform {
        let rotation = self.rotation.inverse();
        RigidTransform {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Map a point expressed in the child frame into the parent frame
    pub fn transform_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * point + self.translation
    }

    /// Re-normalize the rotation to absorb accumulated floating-point drift
    pub fn normalized(&self) -> RigidTransform {
        RigidTransform {
            rotation: UnitQuaternion::new_normalize(*self.rotation.quaternion()),
            translation: self.translation,
        }
    }

    /// Linear interpolation of translation and spherical interpolation of rotation.
    ///
    /// `t` is clamped to `[0, 1]`. When the two rotations are exactly opposed the
    /// slerp is undefined and the nearer endpoint's rotation is used.
    pub fn interpolate(&self, other: &RigidTransform, t: f64) -> RigidTransform {
        let t = t.clamp(0.0, 1.0);
        let rotation = self
            .rotation
            .try_slerp(&other.rotation, t, 1e-12)
            .unwrap_or(if t < 0.5 { self.rotation } else { other.rotation });
        RigidTransform {
            rotation,
            translation: self.translation.lerp(&other.translation, t),
        }
    }

    /// Rotation within `rot_tol` radians and translation within `trans_tol` meters
    pub fn approx_eq(&self, other: &RigidTransform, rot_tol: f64, trans_tol: f64) -> bool {
        self.rotation_distance(other) <= rot_tol
            && (self.translation - other.translation).norm() <= trans_tol
    }

    /// Angle (radians) of the rotation taking `self.rotation` to `other.rotation`.
    ///
    /// Uses atan2 rather than acos so near-identical rotations stay accurate.
    pub fn rotation_distance(&self, other: &RigidTransform) -> f64 {
        let delta = self.rotation.inverse() * other.rotation;
        let q = delta.quaternion();
        2.0 * q.imag().norm().atan2(q.w.abs())
    }

    /// No NaN or infinite component in either rotation or translation
    pub fn is_finite(&self) -> bool {
        self.rotation.coords.iter().all(|c| c.is_finite()) && self.translation.iter().all(|c| c.is_finite())
    }

    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
    }
}

impl From<Isometry3<f64>> for RigidTransform {
    fn from(iso: Isometry3<f64>) -> Self {
        Self::new(iso.rotation, iso.translation.vector)
    }
}

impl From<RigidTransform> for Isometry3<f64> {
    fn from(transform: RigidTransform) -> Self {
        transform.to_isometry()
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> RigidTransform {
        self.compose(&rhs)
    }
}

impl Mul<&RigidTransform> for &RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: &RigidTransform) -> RigidTransform {
        self.compose(rhs)
    }
}

impl Mul<Point3<f64>> for RigidTransform {
    type Output = Point3<f64>;

    fn mul(self, rhs: Point3<f64>) -> Point3<f64> {
        Point3::from(self.transform_point(&rhs.coords))
    }
}

impl fmt::Display for RigidTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (roll, pitch, yaw) = self.rotation.euler_angles();
        write!(
            f,
            "t=[{:.4}, {:.4}, {:.4}] rpy=[{:.5}, {:.5}, {:.5}]",
            self.translation.x, self.translation.y, self.translation.z, roll, pitch, yaw
        )
    }
}

/// Transform between two named frames at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampedTransform {
    pub parent_frame: String,
    pub child_frame: String,
    pub transform: RigidTransform,
    pub stamp_ns: u64,
}

impl StampedTransform {
    pub fn new(
        parent_frame: impl Into<String>,
        child_frame: impl Into<String>,
        transform: RigidTransform,
        stamp_ns: u64,
    ) -> Self {
        Self {
            parent_frame: parent_frame.into(),
            child_frame: child_frame.into(),
            transform,
            stamp_ns,
        }
    }
}
