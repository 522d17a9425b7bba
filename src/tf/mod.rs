//! Boundary with the host's transform services
//!
//! The maintainer never owns a transform store or broadcaster. It is handed
//! a [`TransformLookup`] for static mounts and a [`TransformSink`] for the
//! transforms it computes.

pub mod history;
pub mod sink;

pub use history::TransformHistory;
pub use sink::RecordingSink;

use crate::geometry::{RigidTransform, StampedTransform};

/// Point in time a lookup is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTime {
    /// Exactly this stamp (nanoseconds)
    At(u64),
    /// Whatever was most recently recorded
    Latest,
}

/// Time-indexed transform store
pub trait TransformLookup {
    /// Transform of `child` expressed in `parent` at `time`, if known
    fn lookup(&self, parent: &str, child: &str, time: LookupTime) -> Option<RigidTransform>;
}

/// Destination for computed transforms
pub trait TransformSink {
    fn send(&mut self, transforms: &[StampedTransform]);
}

impl<T: TransformLookup + ?Sized> TransformLookup for &T {
    fn lookup(&self, parent: &str, child: &str, time: LookupTime) -> Option<RigidTransform> {
        (**self).lookup(parent, child, time)
    }
}

impl<T: TransformSink + ?Sized> TransformSink for &mut T {
    fn send(&mut self, transforms: &[StampedTransform]) {
        (**self).send(transforms)
    }
}
