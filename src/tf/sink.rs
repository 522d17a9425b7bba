use crate::geometry::StampedTransform;
use crate::tf::TransformSink;

/// Sink that keeps every batch it receives, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    batches: Vec<Vec<StampedTransform>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> &[Vec<StampedTransform>] {
        &self.batches
    }

    /// All transforms received, flattened across batches
    pub fn transforms(&self) -> impl Iterator<Item = &StampedTransform> {
        self.batches.iter().flatten()
    }

    /// Most recent transform published for `parent -> child`
    pub fn latest(&self, parent: &str, child: &str) -> Option<&StampedTransform> {
        self.transforms()
            .filter(|t| t.parent_frame == parent && t.child_frame == child)
            .last()
    }

    pub fn len(&self) -> usize {
        self.transforms().count()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(|b| b.is_empty())
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }
}

impl TransformSink for RecordingSink {
    fn send(&mut self, transforms: &[StampedTransform]) {
        if !transforms.is_empty() {
            self.batches.push(transforms.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RigidTransform;

    #[test]
    fn test_records_batches_in_order() {
        let mut sink = RecordingSink::new();
        assert!(sink.is_empty());

        sink.send(&[
            StampedTransform::new("earth", "map", RigidTransform::identity(), 1),
            StampedTransform::new("map", "odom", RigidTransform::identity(), 1),
        ]);
        sink.send(&[]);
        sink.send(&[StampedTransform::new("map", "odom", RigidTransform::identity(), 2)]);

        assert_eq!(sink.batches().len(), 2);
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.latest("map", "odom").map(|t| t.stamp_ns), Some(2));
        assert!(sink.latest("odom", "base_link").is_none());

        sink.clear();
        assert!(sink.is_empty());
    }
}
