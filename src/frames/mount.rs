//! Static sensor mounts
//!
//! A mount is the fixed transform from the vehicle body frame to a sensor
//! frame. It is looked up once, cached on success, and never refreshed. A
//! failed lookup caches nothing, so the next caller tries again.

use std::collections::HashMap;

use crate::geometry::RigidTransform;
use crate::tf::{LookupTime, TransformLookup};
use crate::validation::{MaintainerError, MaintainerResult};

/// Look up `parent -> child` at `stamp_ns`, falling back to the latest known value
pub fn lookup_with_fallback<L: TransformLookup + ?Sized>(
    lookup: &L,
    parent: &str,
    child: &str,
    stamp_ns: u64,
) -> MaintainerResult<RigidTransform> {
    if let Some(transform) = lookup.lookup(parent, child, LookupTime::At(stamp_ns)) {
        return Ok(transform);
    }

    if let Some(transform) = lookup.lookup(parent, child, LookupTime::Latest) {
        log::debug!("Using latest transform available for {} -> {}", parent, child);
        return Ok(transform);
    }

    Err(MaintainerError::TransformUnavailable {
        parent: parent.to_string(),
        child: child.to_string(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct StaticMountResolver {
    resolved: HashMap<(String, String), RigidTransform>,
}

impl StaticMountResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached `body -> sensor` mount, resolving it through `lookup` if needed
    pub fn resolve<L: TransformLookup + ?Sized>(
        &mut self,
        lookup: &L,
        body_frame: &str,
        sensor_frame: &str,
        stamp_ns: u64,
    ) -> MaintainerResult<RigidTransform> {
        if let Some(mount) = self.cached(body_frame, sensor_frame) {
            return Ok(mount);
        }

        let mount = lookup_with_fallback(lookup, body_frame, sensor_frame, stamp_ns)?;
        log::info!("Resolved static mount {} -> {}: {}", body_frame, sensor_frame, mount);
        self.resolved
            .insert((body_frame.to_string(), sensor_frame.to_string()), mount);
        Ok(mount)
    }

    pub fn cached(&self, body_frame: &str, sensor_frame: &str) -> Option<RigidTransform> {
        self.resolved
            .get(&(body_frame.to_string(), sensor_frame.to_string()))
            .copied()
    }

    pub fn is_resolved(&self, body_frame: &str, sensor_frame: &str) -> bool {
        self.cached(body_frame, sensor_frame).is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geometry::StampedTransform;
    use crate::tf::TransformHistory;
    use nalgebra::Vector3;
    use std::cell::RefCell;

    /// Lookup wrapper that records every query it serves
    pub(crate) struct CountingLookup<L> {
        pub inner: L,
        pub calls: RefCell<Vec<(String, String, LookupTime)>>,
    }

    impl<L> CountingLookup<L> {
        pub fn new(inner: L) -> Self {
            Self {
                inner,
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl<L: TransformLookup> TransformLookup for CountingLookup<L> {
        fn lookup(&self, parent: &str, child: &str, time: LookupTime) -> Option<RigidTransform> {
            self.calls
                .borrow_mut()
                .push((parent.to_string(), child.to_string(), time));
            self.inner.lookup(parent, child, time)
        }
    }

    fn mount_offset() -> RigidTransform {
        RigidTransform::from_translation(Vector3::new(1.2, 0.0, -0.5))
    }

    #[test]
    fn test_exact_time_lookup() {
        let mut history = TransformHistory::new();
        history.add_transform(StampedTransform::new("base_link", "pinpoint", mount_offset(), 50));
        let lookup = CountingLookup::new(history);

        let mount = lookup_with_fallback(&lookup, "base_link", "pinpoint", 50).unwrap();
        assert_eq!(mount, mount_offset());
        assert_eq!(lookup.call_count(), 1);
    }

    #[test]
    fn test_falls_back_to_latest_and_is_not_requeried() {
        let mut history = TransformHistory::new();
        history.add_transform(StampedTransform::new("base_link", "pinpoint", mount_offset(), 50));
        let lookup = CountingLookup::new(history);
        let mut resolver = StaticMountResolver::new();

        let mount = resolver.resolve(&lookup, "base_link", "pinpoint", 9_000).unwrap();
        assert_eq!(mount, mount_offset());
        {
            let calls = lookup.calls.borrow();
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[0].2, LookupTime::At(9_000));
            assert_eq!(calls[1].2, LookupTime::Latest);
        }

        let again = resolver.resolve(&lookup, "base_link", "pinpoint", 10_000).unwrap();
        assert_eq!(again, mount_offset());
        assert_eq!(lookup.call_count(), 2);
        assert!(resolver.is_resolved("base_link", "pinpoint"));
    }

    #[test]
    fn test_failure_is_not_cached() {
        let lookup = CountingLookup::new(TransformHistory::new());
        let mut resolver = StaticMountResolver::new();

        let result = resolver.resolve(&lookup, "base_link", "pinpoint", 1);
        assert_eq!(
            result,
            Err(MaintainerError::TransformUnavailable {
                parent: "base_link".to_string(),
                child: "pinpoint".to_string(),
            })
        );
        assert!(!resolver.is_resolved("base_link", "pinpoint"));

        let mut history = TransformHistory::new();
        history.add_static("base_link", "pinpoint", mount_offset());
        let lookup = CountingLookup::new(history);
        assert_eq!(resolver.resolve(&lookup, "base_link", "pinpoint", 2), Ok(mount_offset()));
    }

    #[test]
    fn test_mounts_are_cached_per_frame_pair() {
        let mut history = TransformHistory::new();
        history.add_static("base_link", "gnss", mount_offset());
        let mut resolver = StaticMountResolver::new();

        assert!(resolver.resolve(&history, "base_link", "gnss", 0).is_ok());
        assert!(resolver.resolve(&history, "base_link", "wheel_odom", 0).is_err());
        assert!(resolver.is_resolved("base_link", "gnss"));
        assert!(!resolver.is_resolved("base_link", "wheel_odom"));
    }
}
